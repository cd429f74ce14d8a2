//! Repository trait implementations for [`MembershipStore`].

mod group;
mod membership;
mod reference;
mod user;
mod zone;

use std::collections::BTreeSet;

use gatehouse_core::clock::Clock;
use gatehouse_core::models::ids::UserId;
use gatehouse_core::models::membership::{BatchChange, Container};
use tracing::{debug, info};

use crate::store::MembershipStore;

impl<C: Clock> MembershipStore<C> {
    /// Insert `users` into `container`. Callers have already checked that
    /// the container exists and is unlocked and that every user exists.
    pub(crate) fn insert_members(
        &mut self,
        container: Container,
        users: &[UserId],
    ) -> BatchChange<UserId> {
        let mut change = BatchChange::default();
        let mut seen = BTreeSet::new();
        for user in users.iter().copied().filter(|u| seen.insert(*u)) {
            if self.index.insert(user, container) {
                change.applied.push(user);
            } else {
                change.unchanged.push(user);
            }
        }

        if change.is_unchanged() {
            debug!(container = %container, "No new members");
        } else {
            info!(
                container = %container,
                added = change.applied.len(),
                "Members added"
            );
        }
        change
    }
}
