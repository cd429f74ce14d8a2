//! Access service: validity of a user's time-bounded group memberships and
//! the read-only access rule / shift lookups.

use chrono::{DateTime, Utc};
use gatehouse_core::clock::{Clock, SystemClock};
use gatehouse_core::error::GatehouseResult;
use gatehouse_core::models::access_rule::AccessRule;
use gatehouse_core::models::group::DateRange;
use gatehouse_core::models::ids::{GroupId, UserId};
use gatehouse_core::models::shift::Shift;
use gatehouse_core::repository::{GroupRepository, ReferenceRepository, UserRepository};
use serde::Serialize;
use tracing::debug;

use crate::config::{AccessConfig, ValidityPolicy};

/// Outcome of [`AccessService::compute_access_validity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessValidity {
    pub valid: bool,
    /// The window the verdict was taken from. `None` when the user has no
    /// time-bounded group, or when the windows never overlap under
    /// [`ValidityPolicy::AllWindows`].
    pub period: Option<DateRange>,
    /// Time-bounded groups that took part in the evaluation.
    pub source_groups: Vec<GroupId>,
}

impl AccessValidity {
    fn unrestricted() -> Self {
        Self {
            valid: true,
            period: None,
            source_groups: Vec::new(),
        }
    }

    /// Status badge text.
    pub fn status(&self) -> &'static str {
        if self.valid { "Valid" } else { "Expired" }
    }
}

/// Access service.
///
/// Generic over the clock so evaluation can run at a simulated instant.
/// Repositories are passed per call; the service never mutates them.
pub struct AccessService<C: Clock = SystemClock> {
    config: AccessConfig,
    clock: C,
}

impl AccessService<SystemClock> {
    pub fn with_system_clock(config: AccessConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> AccessService<C> {
    pub fn new(config: AccessConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Whether `user` may currently enter, judged by the date ranges of
    /// their time-bounded groups. Groups are taken in directory order.
    /// Users with only Full Time groups are always valid.
    pub fn compute_access_validity<R: GroupRepository>(
        &self,
        repo: &R,
        user: UserId,
    ) -> GatehouseResult<AccessValidity> {
        let windows: Vec<(GroupId, DateRange)> = repo
            .user_groups(user)?
            .into_iter()
            .filter_map(|g| g.access_window().map(|w| (g.id, w)))
            .collect();

        let validity = evaluate(self.config.validity_policy, &windows, self.clock.now());
        debug!(
            user = %user,
            policy = %self.config.validity_policy,
            windows = windows.len(),
            valid = validity.valid,
            "Access validity computed"
        );
        Ok(validity)
    }

    /// Access rules naming `user`, in key order.
    pub fn access_rules_for<R: UserRepository + ReferenceRepository>(
        &self,
        repo: &R,
        user: UserId,
    ) -> GatehouseResult<Vec<AccessRule>> {
        repo.get_user(user)?;
        Ok(repo
            .list_access_rules()
            .into_iter()
            .filter(|rule| rule.applies_to(user))
            .collect())
    }

    /// `"Main Entrance, Server Room"`, or the placeholder.
    pub fn access_rule_names<R: UserRepository + ReferenceRepository>(
        &self,
        repo: &R,
        user: UserId,
    ) -> GatehouseResult<String> {
        let rules = self.access_rules_for(repo, user)?;
        if rules.is_empty() {
            return Ok(self.config.placeholder.clone());
        }
        Ok(rules
            .iter()
            .map(|rule| rule.name.as_str())
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// The first shift (by key) covering `user`.
    pub fn shift_for<R: UserRepository + ReferenceRepository>(
        &self,
        repo: &R,
        user: UserId,
    ) -> GatehouseResult<Option<Shift>> {
        repo.get_user(user)?;
        Ok(repo.list_shifts().into_iter().find(|s| s.covers(user)))
    }

    /// `"Morning Shift (08:00-16:00)"`, or the placeholder.
    pub fn shift_label<R: UserRepository + ReferenceRepository>(
        &self,
        repo: &R,
        user: UserId,
    ) -> GatehouseResult<String> {
        Ok(self
            .shift_for(repo, user)?
            .map(|shift| shift.label())
            .unwrap_or_else(|| self.config.placeholder.clone()))
    }
}

fn evaluate(
    policy: ValidityPolicy,
    windows: &[(GroupId, DateRange)],
    now: DateTime<Utc>,
) -> AccessValidity {
    let Some(&(first_group, first_window)) = windows.first() else {
        return AccessValidity::unrestricted();
    };
    let all_groups = || windows.iter().map(|(g, _)| *g).collect();

    match policy {
        ValidityPolicy::FirstMatch => AccessValidity {
            valid: first_window.contains(now),
            period: Some(first_window),
            source_groups: vec![first_group],
        },
        ValidityPolicy::AnyWindow => {
            let open = windows.iter().find(|(_, w)| w.contains(now));
            AccessValidity {
                valid: open.is_some(),
                period: Some(open.map_or(first_window, |(_, w)| *w)),
                source_groups: all_groups(),
            }
        }
        ValidityPolicy::AllWindows => {
            let overlap = windows
                .iter()
                .skip(1)
                .try_fold(first_window, |acc, (_, w)| acc.intersect(w));
            AccessValidity {
                valid: overlap.is_some_and(|w| w.contains(now)),
                period: overlap,
                source_groups: all_groups(),
            }
        }
    }
}
