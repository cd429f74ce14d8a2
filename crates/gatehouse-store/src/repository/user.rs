//! [`UserRepository`] for the in-memory store.

use gatehouse_core::clock::Clock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::ids::UserId;
use gatehouse_core::models::membership::Container;
use gatehouse_core::models::user::{CreateUser, UpdateUser, User};
use gatehouse_core::query::{PaginatedResult, Pagination, UserFilter};
use gatehouse_core::repository::UserRepository;
use tracing::info;

use crate::store::{MembershipStore, normalize_name};

impl<C: Clock> UserRepository for MembershipStore<C> {
    fn create_user(&mut self, input: CreateUser) -> GatehouseResult<User> {
        let name = normalize_name("user", &input.name)?;
        let email = normalize_email(&input.email)?;

        // Validate every initial membership before allocating anything.
        let mut containers: Vec<Container> = input
            .groups
            .iter()
            .copied()
            .map(Container::Group)
            .chain(input.zones.iter().copied().map(Container::Zone))
            .collect();
        containers.sort();
        containers.dedup();
        for container in &containers {
            self.ensure_unlocked(*container)?;
        }

        let id = UserId(self.allocate_key()?);
        let user = User {
            id,
            name,
            email,
            status: input.status,
            avatar: input.avatar,
            company: input.company,
            position: input.position,
            joined: self.clock.today(),
        };
        self.users.insert(id, user.clone());
        for container in containers {
            self.index.insert(id, container);
        }

        info!(user = %id, name = %user.name, "User created");
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> GatehouseResult<User> {
        self.user(id).cloned()
    }

    fn update_user(&mut self, id: UserId, input: UpdateUser) -> GatehouseResult<User> {
        let name = input
            .name
            .as_deref()
            .map(|n| normalize_name("user", n))
            .transpose()?;
        let email = input.email.as_deref().map(normalize_email).transpose()?;

        let user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| GatehouseError::not_found("user", id))?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        if let Some(avatar) = input.avatar {
            user.avatar = avatar;
        }
        if let Some(company) = input.company {
            user.company = company;
        }
        if let Some(position) = input.position {
            user.position = position;
        }

        info!(user = %id, "User updated");
        Ok(user.clone())
    }

    fn delete_user(&mut self, id: UserId) -> GatehouseResult<()> {
        self.users
            .remove(&id)
            .ok_or_else(|| GatehouseError::not_found("user", id))?;
        let memberships = self.index.purge_user(id);
        for rule in self.access_rules.values_mut() {
            rule.user_ids.remove(&id);
        }
        for shift in self.shifts.values_mut() {
            shift.user_ids.remove(&id);
        }

        info!(user = %id, memberships, "User deleted");
        Ok(())
    }

    fn list_users(&self, pagination: Pagination) -> PaginatedResult<User> {
        pagination.apply(self.users.values().cloned().collect())
    }

    fn search_users(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> PaginatedResult<User> {
        let matches = self
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        pagination.apply(matches)
    }
}

fn normalize_email(raw: &str) -> GatehouseResult<String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(GatehouseError::validation("user email must not be empty"));
    }
    Ok(email.to_string())
}
