//! Directory report printed by the console.

use chrono::{DateTime, Utc};
use gatehouse_access::{AccessService, AccessValidity};
use gatehouse_core::clock::Clock;
use gatehouse_core::error::GatehouseResult;
use gatehouse_core::models::stats::DirectoryStats;
use gatehouse_core::models::user::UserStatus;
use gatehouse_core::query::Pagination;
use gatehouse_core::repository::{GroupRepository, UserRepository, ZoneRepository};
use gatehouse_store::{DirectoryDocument, MembershipStore};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DirectoryReport {
    pub generated_at: DateTime<Utc>,
    pub validity_policy: String,
    pub statistics: DirectoryStats,
    pub users: Vec<UserRow>,
    /// The directory in fixture shape, reloadable through `GATEHOUSE_SEED`.
    pub snapshot: DirectoryDocument,
}

/// One line of the user table.
#[derive(Debug, Serialize)]
pub struct UserRow {
    pub key: u64,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub groups: Vec<String>,
    pub zones: Vec<String>,
    pub access_rules: String,
    pub shift: String,
    pub validity: AccessValidity,
}

impl DirectoryReport {
    pub fn build<C: Clock, A: Clock>(
        store: &MembershipStore<C>,
        access: &AccessService<A>,
    ) -> GatehouseResult<Self> {
        let users = store
            .list_users(Pagination {
                offset: 0,
                limit: u64::MAX,
            })
            .items;

        let rows = users
            .into_iter()
            .map(|user| {
                Ok(UserRow {
                    key: user.id.get(),
                    groups: store.user_groups(user.id)?.into_iter().map(|g| g.name).collect(),
                    zones: store.user_zones(user.id)?.into_iter().map(|z| z.name).collect(),
                    access_rules: access.access_rule_names(store, user.id)?,
                    shift: access.shift_label(store, user.id)?,
                    validity: access.compute_access_validity(store, user.id)?,
                    name: user.name,
                    email: user.email,
                    status: user.status,
                })
            })
            .collect::<GatehouseResult<Vec<_>>>()?;

        Ok(Self {
            generated_at: store.clock().now(),
            validity_policy: access.config().validity_policy.to_string(),
            statistics: store.statistics(),
            users: rows,
            snapshot: store.snapshot(),
        })
    }
}
