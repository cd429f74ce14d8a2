//! The normalized membership relation.
//!
//! Every `(user, container)` tuple is indexed both ways so that "who is in
//! X" and "where is U" are map lookups. Zone-to-group assignments are kept
//! alongside; a zone's effective members are derived from both.

use std::collections::{BTreeMap, BTreeSet};

use gatehouse_core::models::ids::{GroupId, UserId, ZoneId};
use gatehouse_core::models::membership::{Container, Membership};

#[derive(Debug, Clone, Default)]
pub(crate) struct MembershipIndex {
    by_user: BTreeMap<UserId, BTreeSet<Container>>,
    by_container: BTreeMap<Container, BTreeSet<UserId>>,
    zone_groups: BTreeMap<ZoneId, BTreeSet<GroupId>>,
}

impl MembershipIndex {
    pub fn contains(&self, user: UserId, container: Container) -> bool {
        self.by_user
            .get(&user)
            .is_some_and(|set| set.contains(&container))
    }

    /// Returns `false` if the tuple was already present.
    pub fn insert(&mut self, user: UserId, container: Container) -> bool {
        let inserted = self.by_user.entry(user).or_default().insert(container);
        if inserted {
            self.by_container.entry(container).or_default().insert(user);
        }
        inserted
    }

    /// Returns `false` if the tuple was absent.
    pub fn remove(&mut self, user: UserId, container: Container) -> bool {
        let removed = detach(&mut self.by_user, &user, &container);
        if removed {
            detach(&mut self.by_container, &container, &user);
        }
        removed
    }

    pub fn members(&self, container: Container) -> impl Iterator<Item = UserId> + '_ {
        self.by_container
            .get(&container)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn containers_of(&self, user: UserId) -> impl Iterator<Item = Container> + '_ {
        self.by_user
            .get(&user)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn assign_group(&mut self, zone: ZoneId, group: GroupId) -> bool {
        self.zone_groups.entry(zone).or_default().insert(group)
    }

    pub fn is_group_assigned(&self, zone: ZoneId, group: GroupId) -> bool {
        self.zone_groups
            .get(&zone)
            .is_some_and(|set| set.contains(&group))
    }

    pub fn assigned_groups(&self, zone: ZoneId) -> impl Iterator<Item = GroupId> + '_ {
        self.zone_groups
            .get(&zone)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Zones `group` is assigned to.
    pub fn zones_assigned(&self, group: GroupId) -> impl Iterator<Item = ZoneId> + '_ {
        self.zone_groups
            .iter()
            .filter(move |(_, groups)| groups.contains(&group))
            .map(|(zone, _)| *zone)
    }

    /// Direct zone members plus members of every assigned group.
    pub fn effective_zone_members(&self, zone: ZoneId) -> BTreeSet<UserId> {
        let mut members: BTreeSet<UserId> = self.members(Container::Zone(zone)).collect();
        for group in self.assigned_groups(zone) {
            members.extend(self.members(Container::Group(group)));
        }
        members
    }

    /// Drop every tuple of the user. Returns how many were removed.
    pub fn purge_user(&mut self, user: UserId) -> usize {
        let Some(containers) = self.by_user.remove(&user) else {
            return 0;
        };
        for container in &containers {
            detach(&mut self.by_container, container, &user);
        }
        containers.len()
    }

    /// Drop every tuple and zone assignment referencing the container.
    /// Returns how many memberships were removed.
    pub fn purge_container(&mut self, container: Container) -> usize {
        let users = self.by_container.remove(&container).unwrap_or_default();
        for user in &users {
            detach(&mut self.by_user, user, &container);
        }
        match container {
            Container::Zone(zone) => {
                self.zone_groups.remove(&zone);
            }
            Container::Group(group) => {
                self.zone_groups.retain(|_, groups| {
                    groups.remove(&group);
                    !groups.is_empty()
                });
            }
        }
        users.len()
    }

    pub fn memberships(&self) -> impl Iterator<Item = Membership> + '_ {
        self.by_user.iter().flat_map(|(user, containers)| {
            containers.iter().map(|container| Membership {
                user: *user,
                container: *container,
            })
        })
    }
}

/// Remove `value` from the set under `key`, dropping the set once empty.
fn detach<K: Ord, V: Ord>(map: &mut BTreeMap<K, BTreeSet<V>>, key: &K, value: &V) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
