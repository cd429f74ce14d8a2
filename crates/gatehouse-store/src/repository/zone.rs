//! [`ZoneRepository`] for the in-memory store.

use std::collections::BTreeSet;

use gatehouse_core::clock::Clock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::group::Group;
use gatehouse_core::models::ids::{GroupId, UserId, ZoneId};
use gatehouse_core::models::membership::{BatchChange, Container};
use gatehouse_core::models::user::User;
use gatehouse_core::models::zone::{CreateZone, UpdateZone, Zone};
use gatehouse_core::query::MemberQuery;
use gatehouse_core::repository::ZoneRepository;
use tracing::{debug, info};

use crate::store::{MembershipStore, normalize_name};

impl<C: Clock> MembershipStore<C> {
    fn ensure_zone_name_free(&self, name: &str, except: Option<ZoneId>) -> GatehouseResult<()> {
        let taken = self
            .zones
            .values()
            .any(|z| z.name == name && Some(z.id) != except);
        if taken {
            return Err(GatehouseError::AlreadyExists {
                entity: "zone".into(),
                name: name.into(),
            });
        }
        Ok(())
    }

    fn require_groups(&self, ids: &[GroupId]) -> GatehouseResult<()> {
        ids.iter().try_for_each(|id| self.group(*id).map(|_| ()))
    }

    fn assign_groups(&mut self, zone: ZoneId, groups: &[GroupId]) -> BatchChange<GroupId> {
        let mut change = BatchChange::default();
        let mut seen = BTreeSet::new();
        for group in groups.iter().copied().filter(|g| seen.insert(*g)) {
            if self.index.assign_group(zone, group) {
                change.applied.push(group);
            } else {
                change.unchanged.push(group);
            }
        }
        change
    }
}

impl<C: Clock> ZoneRepository for MembershipStore<C> {
    fn create_zone(&mut self, input: CreateZone) -> GatehouseResult<Zone> {
        let name = normalize_name("zone", &input.name)?;
        self.ensure_zone_name_free(&name, None)?;
        self.require_groups(&input.assigned_groups)?;
        self.require_users(&input.assigned_users)?;

        let id = ZoneId(self.allocate_key()?);
        let zone = Zone {
            id,
            name,
            description: input.description,
            locked: false,
        };
        self.zones.insert(id, zone.clone());
        self.assign_groups(id, &input.assigned_groups);
        self.insert_members(Container::Zone(id), &input.assigned_users);

        info!(zone = %id, name = %zone.name, "Zone created");
        Ok(zone)
    }

    fn get_zone(&self, id: ZoneId) -> GatehouseResult<Zone> {
        self.zone(id).cloned()
    }

    fn find_zone_by_name(&self, name: &str) -> GatehouseResult<Zone> {
        self.zones
            .values()
            .find(|z| z.name == name)
            .cloned()
            .ok_or_else(|| GatehouseError::not_found("zone", name))
    }

    fn update_zone(&mut self, id: ZoneId, input: UpdateZone) -> GatehouseResult<Zone> {
        self.zone(id)?;
        let name = input
            .name
            .as_deref()
            .map(|raw| normalize_name("zone", raw))
            .transpose()?;
        if let Some(name) = &name {
            self.ensure_zone_name_free(name, Some(id))?;
        }

        let zone = self
            .zones
            .get_mut(&id)
            .ok_or_else(|| GatehouseError::not_found("zone", id))?;
        if let Some(name) = name {
            zone.name = name;
        }
        if let Some(description) = input.description {
            zone.description = description;
        }

        info!(zone = %id, "Zone updated");
        Ok(zone.clone())
    }

    fn delete_zone(&mut self, id: ZoneId) -> GatehouseResult<()> {
        self.ensure_unlocked(Container::Zone(id))?;
        self.zones.remove(&id);
        let memberships = self.index.purge_container(Container::Zone(id));

        info!(zone = %id, memberships, "Zone deleted");
        Ok(())
    }

    fn list_zones(&self) -> Vec<Zone> {
        self.zones.values().cloned().collect()
    }

    fn zone_members(&self, id: ZoneId, query: &MemberQuery) -> GatehouseResult<Vec<User>> {
        self.zone(id)?;
        let members = self.users_by_id(self.index.effective_zone_members(id));
        Ok(query.apply(members))
    }

    fn user_zones(&self, user: UserId) -> GatehouseResult<Vec<Zone>> {
        self.user(user)?;
        Ok(self
            .index
            .containers_of(user)
            .filter_map(|c| match c {
                Container::Zone(id) => self.zones.get(&id).cloned(),
                Container::Group(_) => None,
            })
            .collect())
    }

    fn assigned_groups(&self, id: ZoneId) -> GatehouseResult<Vec<Group>> {
        self.zone(id)?;
        Ok(self
            .index
            .assigned_groups(id)
            .filter_map(|g| self.groups.get(&g).cloned())
            .collect())
    }

    fn zone_candidates(&self, id: ZoneId) -> GatehouseResult<Vec<User>> {
        self.zone(id)?;
        let members = self.index.effective_zone_members(id);
        Ok(self
            .users
            .values()
            .filter(|u| !members.contains(&u.id))
            .cloned()
            .collect())
    }

    fn add_users_to_zone(
        &mut self,
        id: ZoneId,
        users: &[UserId],
    ) -> GatehouseResult<BatchChange<UserId>> {
        let container = Container::Zone(id);
        self.ensure_unlocked(container)?;
        self.require_users(users)?;
        Ok(self.insert_members(container, users))
    }

    fn add_groups_to_zone(
        &mut self,
        id: ZoneId,
        groups: &[GroupId],
    ) -> GatehouseResult<BatchChange<GroupId>> {
        self.ensure_unlocked(Container::Zone(id))?;
        self.require_groups(groups)?;

        let change = self.assign_groups(id, groups);
        if change.is_unchanged() {
            debug!(zone = %id, "No new groups assigned");
        } else {
            info!(zone = %id, assigned = change.applied.len(), "Groups assigned to zone");
        }
        Ok(change)
    }
}
