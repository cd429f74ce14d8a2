//! The membership store: entity collections plus the membership index.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use gatehouse_core::clock::{Clock, SystemClock};
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::access_rule::AccessRule;
use gatehouse_core::models::group::{Group, validate_schedule};
use gatehouse_core::models::ids::{AccessRuleId, GroupId, ShiftId, UserId, ZoneId};
use gatehouse_core::models::membership::Container;
use gatehouse_core::models::shift::Shift;
use gatehouse_core::models::stats::{ContainerCount, DirectoryStats};
use gatehouse_core::models::user::User;
use gatehouse_core::models::zone::Zone;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::document::{
    AccessRuleRecord, DirectoryDocument, GroupRecord, ShiftRecord, UserRecord, ZoneRecord,
};
use crate::error::StoreError;
use crate::index::MembershipIndex;

/// In-memory directory of users, groups, zones, access rules and shifts.
///
/// Generic over the [`Clock`] so that join dates and statistics can run
/// against simulated time.
#[derive(Debug, Clone)]
pub struct MembershipStore<C: Clock = SystemClock> {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) groups: BTreeMap<GroupId, Group>,
    pub(crate) zones: BTreeMap<ZoneId, Zone>,
    pub(crate) access_rules: BTreeMap<AccessRuleId, AccessRule>,
    pub(crate) shifts: BTreeMap<ShiftId, Shift>,
    pub(crate) index: MembershipIndex,
    next_key: u64,
    pub(crate) clock: C,
}

impl<C: Clock> MembershipStore<C> {
    pub fn empty(clock: C) -> Self {
        Self {
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
            zones: BTreeMap::new(),
            access_rules: BTreeMap::new(),
            shifts: BTreeMap::new(),
            index: MembershipIndex::default(),
            next_key: 1,
            clock,
        }
    }

    pub fn open(config: &StoreConfig, clock: C) -> GatehouseResult<Self> {
        if !config.seed {
            return Ok(Self::empty(clock));
        }
        let document = match &config.seed_path {
            Some(path) => DirectoryDocument::read(path)?,
            None => DirectoryDocument::builtin_seed()?,
        };
        Self::from_document(document, clock)
    }

    /// Build a store from a directory document.
    ///
    /// Duplicate keys or names and invalid group schedules reject the whole
    /// document. References to unknown groups, zones or users are logged
    /// and skipped.
    pub fn from_document(document: DirectoryDocument, clock: C) -> GatehouseResult<Self> {
        let mut store = Self::empty(clock);
        store.next_key = document
            .max_key()
            .checked_add(1)
            .ok_or_else(|| StoreError::Fixture("key space exhausted".into()))?;

        for record in document.groups {
            store.load_group(record)?;
        }
        for record in document.zones.iter() {
            store.load_zone(record)?;
        }

        let group_names: HashMap<String, GroupId> = store
            .groups
            .values()
            .map(|g| (g.name.clone(), g.id))
            .collect();
        let zone_names: HashMap<String, ZoneId> = store
            .zones
            .values()
            .map(|z| (z.name.clone(), z.id))
            .collect();

        for record in document.users {
            store.load_user(record, &group_names, &zone_names)?;
        }
        for record in &document.zones {
            store.load_zone_assignments(record);
        }
        for record in document.access_rules {
            store.load_access_rule(record)?;
        }
        for record in document.shifts {
            store.load_shift(record)?;
        }

        info!(
            users = store.users.len(),
            groups = store.groups.len(),
            zones = store.zones.len(),
            memberships = store.index.memberships().count(),
            "Directory loaded"
        );
        Ok(store)
    }

    fn load_group(&mut self, record: GroupRecord) -> Result<(), StoreError> {
        let id = GroupId(record.key);
        if self.groups.contains_key(&id) {
            return Err(StoreError::Fixture(format!("duplicate group key {id}")));
        }
        if self.groups.values().any(|g| g.name == record.name) {
            return Err(StoreError::Fixture(format!(
                "duplicate group name {:?}",
                record.name
            )));
        }
        let date_range = validate_schedule(record.group_type, record.date_range)
            .map_err(|e| StoreError::Fixture(format!("group {id}: {e}")))?;
        self.groups.insert(
            id,
            Group {
                id,
                name: record.name,
                description: record.description,
                group_type: record.group_type,
                company: record.company,
                date_range,
                locked: record.locked,
            },
        );
        Ok(())
    }

    fn load_zone(&mut self, record: &ZoneRecord) -> Result<(), StoreError> {
        let id = ZoneId(record.key);
        if self.zones.contains_key(&id) {
            return Err(StoreError::Fixture(format!("duplicate zone key {id}")));
        }
        if self.zones.values().any(|z| z.name == record.name) {
            return Err(StoreError::Fixture(format!(
                "duplicate zone name {:?}",
                record.name
            )));
        }
        self.zones.insert(
            id,
            Zone {
                id,
                name: record.name.clone(),
                description: record.description.clone(),
                locked: record.locked,
            },
        );
        Ok(())
    }

    fn load_user(
        &mut self,
        record: UserRecord,
        group_names: &HashMap<String, GroupId>,
        zone_names: &HashMap<String, ZoneId>,
    ) -> Result<(), StoreError> {
        let id = UserId(record.key);
        if self.users.contains_key(&id) {
            return Err(StoreError::Fixture(format!("duplicate user key {id}")));
        }
        for name in &record.groups {
            match group_names.get(name) {
                Some(group) => {
                    self.index.insert(id, Container::Group(*group));
                }
                None => warn!(user = %id, group = %name, "Skipping unknown group reference"),
            }
        }
        for name in &record.zones {
            match zone_names.get(name) {
                Some(zone) => {
                    self.index.insert(id, Container::Zone(*zone));
                }
                None => warn!(user = %id, zone = %name, "Skipping unknown zone reference"),
            }
        }
        self.users.insert(
            id,
            User {
                id,
                name: record.name,
                email: record.email,
                status: record.status,
                avatar: record.avatar,
                company: record.company,
                position: record.position,
                joined: record.joined,
            },
        );
        Ok(())
    }

    fn load_zone_assignments(&mut self, record: &ZoneRecord) {
        let zone = ZoneId(record.key);
        for key in &record.assigned_groups {
            let group = GroupId(*key);
            if self.groups.contains_key(&group) {
                self.index.assign_group(zone, group);
            } else {
                warn!(zone = %zone, group = %group, "Skipping unknown assigned group");
            }
        }
        for key in &record.assigned_users {
            let user = UserId(*key);
            if self.users.contains_key(&user) {
                self.index.insert(user, Container::Zone(zone));
            } else {
                warn!(zone = %zone, user = %user, "Skipping unknown assigned user");
            }
        }
    }

    fn known_users(&self, owner: &str, keys: Vec<u64>) -> BTreeSet<UserId> {
        keys.into_iter()
            .map(UserId)
            .filter(|user| {
                let known = self.users.contains_key(user);
                if !known {
                    warn!(owner, user = %user, "Skipping unknown user reference");
                }
                known
            })
            .collect()
    }

    fn load_access_rule(&mut self, record: AccessRuleRecord) -> Result<(), StoreError> {
        let id = AccessRuleId(record.key);
        if self.access_rules.contains_key(&id) {
            return Err(StoreError::Fixture(format!("duplicate access rule key {id}")));
        }
        let user_ids = self.known_users(&record.name, record.user_keys);
        self.access_rules.insert(
            id,
            AccessRule {
                id,
                name: record.name,
                description: record.description,
                user_ids,
            },
        );
        Ok(())
    }

    fn load_shift(&mut self, record: ShiftRecord) -> Result<(), StoreError> {
        let id = ShiftId(record.key);
        if self.shifts.contains_key(&id) {
            return Err(StoreError::Fixture(format!("duplicate shift key {id}")));
        }
        let user_ids = self.known_users(&record.name, record.user_keys);
        self.shifts.insert(
            id,
            Shift {
                id,
                name: record.name,
                start_time: record.start_time,
                end_time: record.end_time,
                user_ids,
            },
        );
        Ok(())
    }

    /// Export the current state in fixture form.
    ///
    /// Direct zone memberships are written to each user's `zones` list;
    /// `assignedUsers` stays empty so a reload yields the same relation.
    pub fn snapshot(&self) -> DirectoryDocument {
        let users = self
            .users
            .values()
            .map(|user| {
                let mut groups = Vec::new();
                let mut zones = Vec::new();
                for container in self.index.containers_of(user.id) {
                    match container {
                        Container::Group(id) => groups.extend(self.group_name(id)),
                        Container::Zone(id) => zones.extend(self.zone_name(id)),
                    }
                }
                UserRecord {
                    key: user.id.get(),
                    name: user.name.clone(),
                    email: user.email.clone(),
                    groups,
                    zones,
                    status: user.status,
                    avatar: user.avatar.clone(),
                    company: user.company.clone(),
                    position: user.position.clone(),
                    joined: user.joined,
                }
            })
            .collect();

        let groups = self
            .groups
            .values()
            .map(|g| GroupRecord {
                key: g.id.get(),
                name: g.name.clone(),
                description: g.description.clone(),
                group_type: g.group_type,
                company: g.company.clone(),
                date_range: g.date_range,
                locked: g.locked,
            })
            .collect();

        let zones = self
            .zones
            .values()
            .map(|z| ZoneRecord {
                key: z.id.get(),
                name: z.name.clone(),
                description: z.description.clone(),
                assigned_groups: self.index.assigned_groups(z.id).map(GroupId::get).collect(),
                assigned_users: Vec::new(),
                locked: z.locked,
            })
            .collect();

        let access_rules = self
            .access_rules
            .values()
            .map(|r| AccessRuleRecord {
                key: r.id.get(),
                name: r.name.clone(),
                description: r.description.clone(),
                user_keys: r.user_ids.iter().map(|u| u.get()).collect(),
            })
            .collect();

        let shifts = self
            .shifts
            .values()
            .map(|s| ShiftRecord {
                key: s.id.get(),
                name: s.name.clone(),
                start_time: s.start_time,
                end_time: s.end_time,
                user_keys: s.user_ids.iter().map(|u| u.get()).collect(),
            })
            .collect();

        DirectoryDocument {
            users,
            groups,
            zones,
            access_rules,
            shifts,
        }
    }

    /// Counters shown above the user table, evaluated against the store
    /// clock's current date.
    pub fn statistics(&self) -> DirectoryStats {
        let today = self.clock.today();
        let active = self.users.values().filter(|u| u.status.is_active()).count();
        let groups = self
            .groups
            .values()
            .map(|g| ContainerCount {
                key: g.id.get(),
                name: g.name.clone(),
                members: self.index.members(Container::Group(g.id)).count(),
            })
            .collect();
        let zones = self
            .zones
            .values()
            .map(|z| ContainerCount {
                key: z.id.get(),
                name: z.name.clone(),
                members: self.index.effective_zone_members(z.id).len(),
            })
            .collect();

        DirectoryStats {
            total: self.users.len(),
            active,
            inactive: self.users.len() - active,
            joined_today: self.users.values().filter(|u| u.joined == today).count(),
            groups,
            zones,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Shared helpers for the repository implementations
    // -----------------------------------------------------------------------

    /// Next free key. Keys are never reused within a store.
    pub(crate) fn allocate_key(&mut self) -> GatehouseResult<u64> {
        let key = self.next_key;
        self.next_key = key
            .checked_add(1)
            .ok_or_else(|| GatehouseError::Internal("key space exhausted".into()))?;
        Ok(key)
    }

    pub(crate) fn user(&self, id: UserId) -> GatehouseResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| GatehouseError::not_found("user", id))
    }

    pub(crate) fn group(&self, id: GroupId) -> GatehouseResult<&Group> {
        self.groups
            .get(&id)
            .ok_or_else(|| GatehouseError::not_found("group", id))
    }

    pub(crate) fn zone(&self, id: ZoneId) -> GatehouseResult<&Zone> {
        self.zones
            .get(&id)
            .ok_or_else(|| GatehouseError::not_found("zone", id))
    }

    pub(crate) fn require_users(&self, ids: &[UserId]) -> GatehouseResult<()> {
        ids.iter().try_for_each(|id| self.user(*id).map(|_| ()))
    }

    /// Lock flag of an existing container.
    pub(crate) fn is_locked(&self, container: Container) -> GatehouseResult<bool> {
        match container {
            Container::Group(id) => self.group(id).map(|g| g.locked),
            Container::Zone(id) => self.zone(id).map(|z| z.locked),
        }
    }

    pub(crate) fn ensure_unlocked(&self, container: Container) -> GatehouseResult<()> {
        if self.is_locked(container)? {
            warn!(container = %container, "Rejected membership change on locked container");
            return Err(GatehouseError::locked(
                container.kind().as_str(),
                container.key(),
            ));
        }
        Ok(())
    }

    pub(crate) fn users_by_id(&self, ids: impl IntoIterator<Item = UserId>) -> Vec<User> {
        ids.into_iter()
            .filter_map(|id| self.users.get(&id).cloned())
            .collect()
    }

    fn group_name(&self, id: GroupId) -> Option<String> {
        self.groups.get(&id).map(|g| g.name.clone())
    }

    fn zone_name(&self, id: ZoneId) -> Option<String> {
        self.zones.get(&id).map(|z| z.name.clone())
    }
}

/// Trim a display name and reject blanks.
pub(crate) fn normalize_name(entity: &str, name: &str) -> GatehouseResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GatehouseError::validation(format!(
            "{entity} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
