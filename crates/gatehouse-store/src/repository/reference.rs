//! [`ReferenceRepository`] for the in-memory store.

use std::collections::BTreeSet;

use gatehouse_core::clock::Clock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_core::models::access_rule::{AccessRule, CreateAccessRule, UpdateAccessRule};
use gatehouse_core::models::ids::{AccessRuleId, ShiftId, UserId};
use gatehouse_core::models::shift::{CreateShift, Shift, UpdateShift, parse_clock_time};
use gatehouse_core::repository::ReferenceRepository;
use tracing::info;

use crate::store::{MembershipStore, normalize_name};

impl<C: Clock> MembershipStore<C> {
    fn user_set(&self, ids: &[UserId]) -> GatehouseResult<BTreeSet<UserId>> {
        self.require_users(ids)?;
        Ok(ids.iter().copied().collect())
    }
}

impl<C: Clock> ReferenceRepository for MembershipStore<C> {
    fn create_access_rule(&mut self, input: CreateAccessRule) -> GatehouseResult<AccessRule> {
        let name = normalize_name("access rule", &input.name)?;
        let user_ids = self.user_set(&input.user_ids)?;

        let id = AccessRuleId(self.allocate_key()?);
        let rule = AccessRule {
            id,
            name,
            description: input.description,
            user_ids,
        };
        self.access_rules.insert(id, rule.clone());

        info!(access_rule = %id, name = %rule.name, "Access rule created");
        Ok(rule)
    }

    fn get_access_rule(&self, id: AccessRuleId) -> GatehouseResult<AccessRule> {
        self.access_rules
            .get(&id)
            .cloned()
            .ok_or_else(|| GatehouseError::not_found("access rule", id))
    }

    fn update_access_rule(
        &mut self,
        id: AccessRuleId,
        input: UpdateAccessRule,
    ) -> GatehouseResult<AccessRule> {
        let name = input
            .name
            .as_deref()
            .map(|raw| normalize_name("access rule", raw))
            .transpose()?;
        let user_ids = input
            .user_ids
            .as_deref()
            .map(|ids| self.user_set(ids))
            .transpose()?;

        let rule = self
            .access_rules
            .get_mut(&id)
            .ok_or_else(|| GatehouseError::not_found("access rule", id))?;
        if let Some(name) = name {
            rule.name = name;
        }
        if let Some(description) = input.description {
            rule.description = description;
        }
        if let Some(user_ids) = user_ids {
            rule.user_ids = user_ids;
        }

        info!(access_rule = %id, "Access rule updated");
        Ok(rule.clone())
    }

    fn delete_access_rule(&mut self, id: AccessRuleId) -> GatehouseResult<()> {
        self.access_rules
            .remove(&id)
            .ok_or_else(|| GatehouseError::not_found("access rule", id))?;

        info!(access_rule = %id, "Access rule deleted");
        Ok(())
    }

    fn list_access_rules(&self) -> Vec<AccessRule> {
        self.access_rules.values().cloned().collect()
    }

    fn create_shift(&mut self, input: CreateShift) -> GatehouseResult<Shift> {
        let name = normalize_name("shift", &input.name)?;
        let start_time = parse_clock_time(&input.start_time)?;
        let end_time = parse_clock_time(&input.end_time)?;
        let user_ids = self.user_set(&input.user_ids)?;

        let id = ShiftId(self.allocate_key()?);
        let shift = Shift {
            id,
            name,
            start_time,
            end_time,
            user_ids,
        };
        self.shifts.insert(id, shift.clone());

        info!(shift = %id, label = %shift.label(), "Shift created");
        Ok(shift)
    }

    fn get_shift(&self, id: ShiftId) -> GatehouseResult<Shift> {
        self.shifts
            .get(&id)
            .cloned()
            .ok_or_else(|| GatehouseError::not_found("shift", id))
    }

    fn update_shift(&mut self, id: ShiftId, input: UpdateShift) -> GatehouseResult<Shift> {
        let name = input
            .name
            .as_deref()
            .map(|raw| normalize_name("shift", raw))
            .transpose()?;
        let start_time = input.start_time.as_deref().map(parse_clock_time).transpose()?;
        let end_time = input.end_time.as_deref().map(parse_clock_time).transpose()?;
        let user_ids = input
            .user_ids
            .as_deref()
            .map(|ids| self.user_set(ids))
            .transpose()?;

        let shift = self
            .shifts
            .get_mut(&id)
            .ok_or_else(|| GatehouseError::not_found("shift", id))?;
        if let Some(name) = name {
            shift.name = name;
        }
        if let Some(start_time) = start_time {
            shift.start_time = start_time;
        }
        if let Some(end_time) = end_time {
            shift.end_time = end_time;
        }
        if let Some(user_ids) = user_ids {
            shift.user_ids = user_ids;
        }

        info!(shift = %id, label = %shift.label(), "Shift updated");
        Ok(shift.clone())
    }

    fn delete_shift(&mut self, id: ShiftId) -> GatehouseResult<()> {
        self.shifts
            .remove(&id)
            .ok_or_else(|| GatehouseError::not_found("shift", id))?;

        info!(shift = %id, "Shift deleted");
        Ok(())
    }

    fn list_shifts(&self) -> Vec<Shift> {
        self.shifts.values().cloned().collect()
    }
}
