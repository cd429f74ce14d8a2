//! [`MembershipRepository`] for the in-memory store.
//!
//! Moves and drags share one code path. All checks run before the first
//! write, so a gesture either lands completely or not at all.

use gatehouse_core::clock::Clock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::ids::UserId;
use gatehouse_core::models::membership::{Change, Container, DragEnd};
use gatehouse_core::repository::MembershipRepository;
use tracing::{debug, info};

use crate::store::MembershipStore;

impl<C: Clock> MembershipRepository for MembershipStore<C> {
    fn move_user(
        &mut self,
        user: UserId,
        from: Container,
        to: Container,
    ) -> GatehouseResult<Change> {
        self.user(user)?;
        self.is_locked(from)?;
        self.is_locked(to)?;
        if from == to {
            debug!(user = %user, container = %from, "Move onto itself ignored");
            return Ok(Change::Unchanged);
        }

        let leaves = self.index.contains(user, from);
        let joins = !self.index.contains(user, to);
        if leaves {
            self.ensure_unlocked(from)?;
        }
        if joins {
            self.ensure_unlocked(to)?;
        }
        if !leaves && !joins {
            debug!(user = %user, from = %from, to = %to, "Move changed nothing");
            return Ok(Change::Unchanged);
        }

        if leaves {
            self.index.remove(user, from);
        }
        if joins {
            self.index.insert(user, to);
        }

        info!(user = %user, from = %from, to = %to, "User moved");
        Ok(Change::Applied)
    }

    fn remove_user(&mut self, user: UserId, from: Container) -> GatehouseResult<Change> {
        self.user(user)?;
        self.is_locked(from)?;
        if !self.index.contains(user, from) {
            debug!(user = %user, container = %from, "User was not a direct member");
            return Ok(Change::Unchanged);
        }
        self.ensure_unlocked(from)?;
        self.index.remove(user, from);

        info!(user = %user, container = %from, "User removed");
        Ok(Change::Applied)
    }

    fn reassign_via_drag(&mut self, drag: DragEnd) -> GatehouseResult<Change> {
        match drag.destination {
            Some(destination) => self.move_user(drag.user, drag.source, destination),
            None => {
                self.user(drag.user)?;
                self.is_locked(drag.source)?;
                debug!(user = %drag.user, "Drop outside any container ignored");
                Ok(Change::Unchanged)
            }
        }
    }

    fn toggle_lock(&mut self, target: Container) -> GatehouseResult<bool> {
        let locked = match target {
            Container::Group(id) => {
                let group = self
                    .groups
                    .get_mut(&id)
                    .ok_or_else(|| GatehouseError::not_found("group", id))?;
                group.locked = !group.locked;
                group.locked
            }
            Container::Zone(id) => {
                let zone = self
                    .zones
                    .get_mut(&id)
                    .ok_or_else(|| GatehouseError::not_found("zone", id))?;
                zone.locked = !zone.locked;
                zone.locked
            }
        };

        info!(container = %target, locked, "Lock toggled");
        Ok(locked)
    }
}
