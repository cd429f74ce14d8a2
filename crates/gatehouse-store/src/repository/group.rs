//! [`GroupRepository`] for the in-memory store.

use gatehouse_core::clock::Clock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::group::{CreateGroup, Group, UpdateGroup, validate_schedule};
use gatehouse_core::models::ids::{GroupId, UserId, ZoneId};
use gatehouse_core::models::membership::{BatchChange, Container};
use gatehouse_core::models::user::User;
use gatehouse_core::query::MemberQuery;
use gatehouse_core::repository::GroupRepository;
use tracing::info;

use crate::store::{MembershipStore, normalize_name};

impl<C: Clock> MembershipStore<C> {
    fn ensure_group_name_free(&self, name: &str, except: Option<GroupId>) -> GatehouseResult<()> {
        let taken = self
            .groups
            .values()
            .any(|g| g.name == name && Some(g.id) != except);
        if taken {
            return Err(GatehouseError::AlreadyExists {
                entity: "group".into(),
                name: name.into(),
            });
        }
        Ok(())
    }
}

impl<C: Clock> GroupRepository for MembershipStore<C> {
    fn create_group(&mut self, input: CreateGroup) -> GatehouseResult<Group> {
        let name = normalize_name("group", &input.name)?;
        self.ensure_group_name_free(&name, None)?;
        let date_range = validate_schedule(input.group_type, input.date_range)?;

        let id = GroupId(self.allocate_key()?);
        let group = Group {
            id,
            name,
            description: input.description,
            group_type: input.group_type,
            company: input.company,
            date_range,
            locked: false,
        };
        self.groups.insert(id, group.clone());

        info!(group = %id, name = %group.name, "Group created");
        Ok(group)
    }

    fn get_group(&self, id: GroupId) -> GatehouseResult<Group> {
        self.group(id).cloned()
    }

    fn find_group_by_name(&self, name: &str) -> GatehouseResult<Group> {
        self.groups
            .values()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| GatehouseError::not_found("group", name))
    }

    fn update_group(&mut self, id: GroupId, input: UpdateGroup) -> GatehouseResult<Group> {
        let current = self.group(id)?;
        let name = match input.name.as_deref() {
            Some(raw) => {
                let name = normalize_name("group", raw)?;
                self.ensure_group_name_free(&name, Some(id))?;
                name
            }
            None => current.name.clone(),
        };
        let group_type = input.group_type.unwrap_or(current.group_type);
        let date_range = validate_schedule(
            group_type,
            input.date_range.unwrap_or(current.date_range),
        )?;

        let group = self
            .groups
            .get_mut(&id)
            .ok_or_else(|| GatehouseError::not_found("group", id))?;
        group.name = name;
        group.group_type = group_type;
        group.date_range = date_range;
        if let Some(description) = input.description {
            group.description = description;
        }
        if let Some(company) = input.company {
            group.company = company;
        }

        info!(group = %id, "Group updated");
        Ok(group.clone())
    }

    fn delete_group(&mut self, id: GroupId) -> GatehouseResult<()> {
        self.ensure_unlocked(Container::Group(id))?;
        // Deleting drops the group from every zone it is assigned to.
        let zones: Vec<ZoneId> = self.index.zones_assigned(id).collect();
        for zone in zones {
            self.ensure_unlocked(Container::Zone(zone))?;
        }
        self.groups.remove(&id);
        let memberships = self.index.purge_container(Container::Group(id));

        info!(group = %id, memberships, "Group deleted");
        Ok(())
    }

    fn list_groups(&self) -> Vec<Group> {
        self.groups.values().cloned().collect()
    }

    fn group_members(&self, id: GroupId, query: &MemberQuery) -> GatehouseResult<Vec<User>> {
        self.group(id)?;
        let members = self.users_by_id(self.index.members(Container::Group(id)));
        Ok(query.apply(members))
    }

    fn user_groups(&self, user: UserId) -> GatehouseResult<Vec<Group>> {
        self.user(user)?;
        Ok(self
            .index
            .containers_of(user)
            .filter_map(|c| match c {
                Container::Group(id) => self.groups.get(&id).cloned(),
                Container::Zone(_) => None,
            })
            .collect())
    }

    fn group_candidates(&self, id: GroupId) -> GatehouseResult<Vec<User>> {
        self.group(id)?;
        let container = Container::Group(id);
        Ok(self
            .users
            .values()
            .filter(|u| !self.index.contains(u.id, container))
            .cloned()
            .collect())
    }

    fn add_users_to_group(
        &mut self,
        id: GroupId,
        users: &[UserId],
    ) -> GatehouseResult<BatchChange<UserId>> {
        let container = Container::Group(id);
        self.ensure_unlocked(container)?;
        self.require_users(users)?;
        Ok(self.insert_members(container, users))
    }
}
