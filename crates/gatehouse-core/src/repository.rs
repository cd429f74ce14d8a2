//! Repository trait definitions for data access abstraction.
//!
//! The directory is a single-session, in-memory model: reads take `&self`,
//! mutations take `&mut self`, and nothing is asynchronous. Every mutation
//! validates its whole input before touching state, so a rejected call
//! leaves the directory exactly as it was.

use crate::error::GatehouseResult;
use crate::models::{
    access_rule::{AccessRule, CreateAccessRule, UpdateAccessRule},
    group::{CreateGroup, Group, UpdateGroup},
    ids::{AccessRuleId, GroupId, ShiftId, UserId, ZoneId},
    membership::{BatchChange, Change, Container, DragEnd},
    shift::{CreateShift, Shift, UpdateShift},
    user::{CreateUser, UpdateUser, User},
    zone::{CreateZone, UpdateZone, Zone},
};
use crate::query::{MemberQuery, PaginatedResult, Pagination, UserFilter};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

pub trait UserRepository {
    fn create_user(&mut self, input: CreateUser) -> GatehouseResult<User>;
    fn get_user(&self, id: UserId) -> GatehouseResult<User>;
    fn update_user(&mut self, id: UserId, input: UpdateUser) -> GatehouseResult<User>;
    /// Removes the user and every membership that references it.
    fn delete_user(&mut self, id: UserId) -> GatehouseResult<()>;
    fn list_users(&self, pagination: Pagination) -> PaginatedResult<User>;
    fn search_users(&self, filter: &UserFilter, pagination: Pagination)
    -> PaginatedResult<User>;
}

pub trait GroupRepository {
    fn create_group(&mut self, input: CreateGroup) -> GatehouseResult<Group>;
    fn get_group(&self, id: GroupId) -> GatehouseResult<Group>;
    fn find_group_by_name(&self, name: &str) -> GatehouseResult<Group>;
    fn update_group(&mut self, id: GroupId, input: UpdateGroup) -> GatehouseResult<Group>;
    /// Removes the group, its memberships and its zone assignments.
    fn delete_group(&mut self, id: GroupId) -> GatehouseResult<()>;
    fn list_groups(&self) -> Vec<Group>;

    /// Members of a group, filtered and sorted by `query`.
    fn group_members(&self, id: GroupId, query: &MemberQuery) -> GatehouseResult<Vec<User>>;

    /// Groups the user belongs to, in key order.
    fn user_groups(&self, user: UserId) -> GatehouseResult<Vec<Group>>;

    /// Users that are not yet members of the group.
    fn group_candidates(&self, id: GroupId) -> GatehouseResult<Vec<User>>;

    fn add_users_to_group(
        &mut self,
        id: GroupId,
        users: &[UserId],
    ) -> GatehouseResult<BatchChange<UserId>>;
}

pub trait ZoneRepository {
    fn create_zone(&mut self, input: CreateZone) -> GatehouseResult<Zone>;
    fn get_zone(&self, id: ZoneId) -> GatehouseResult<Zone>;
    fn find_zone_by_name(&self, name: &str) -> GatehouseResult<Zone>;
    fn update_zone(&mut self, id: ZoneId, input: UpdateZone) -> GatehouseResult<Zone>;
    /// Removes the zone, its memberships and its group assignments.
    fn delete_zone(&mut self, id: ZoneId) -> GatehouseResult<()>;
    fn list_zones(&self) -> Vec<Zone>;

    /// Effective members: direct zone members plus members of every
    /// assigned group, each user reported once.
    fn zone_members(&self, id: ZoneId, query: &MemberQuery) -> GatehouseResult<Vec<User>>;

    /// Zones the user was granted directly, in key order.
    fn user_zones(&self, user: UserId) -> GatehouseResult<Vec<Zone>>;

    /// Groups assigned to the zone as a whole.
    fn assigned_groups(&self, id: ZoneId) -> GatehouseResult<Vec<Group>>;

    /// Users that are not yet effective members of the zone.
    fn zone_candidates(&self, id: ZoneId) -> GatehouseResult<Vec<User>>;

    fn add_users_to_zone(
        &mut self,
        id: ZoneId,
        users: &[UserId],
    ) -> GatehouseResult<BatchChange<UserId>>;

    fn add_groups_to_zone(
        &mut self,
        id: ZoneId,
        groups: &[GroupId],
    ) -> GatehouseResult<BatchChange<GroupId>>;
}

// ---------------------------------------------------------------------------
// Membership edits
// ---------------------------------------------------------------------------

pub trait MembershipRepository {
    /// Move a user from one container to another of either kind.
    ///
    /// Drops the `from` membership (if held) and adds the `to` membership
    /// (if missing) in one step. Source equal to destination is a no-op.
    fn move_user(&mut self, user: UserId, from: Container, to: Container)
    -> GatehouseResult<Change>;

    /// Drop a direct membership. Access a zone grants through an assigned
    /// group is not affected.
    fn remove_user(&mut self, user: UserId, from: Container) -> GatehouseResult<Change>;

    /// Apply a drag gesture from the membership board.
    fn reassign_via_drag(&mut self, drag: DragEnd) -> GatehouseResult<Change>;

    /// Flip the lock flag of a group or zone and return the new value.
    fn toggle_lock(&mut self, target: Container) -> GatehouseResult<bool>;
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Access rules and shifts. Membership edits never touch them; only these
/// editor operations and user deletion do.
pub trait ReferenceRepository {
    fn create_access_rule(&mut self, input: CreateAccessRule) -> GatehouseResult<AccessRule>;
    fn get_access_rule(&self, id: AccessRuleId) -> GatehouseResult<AccessRule>;
    fn update_access_rule(
        &mut self,
        id: AccessRuleId,
        input: UpdateAccessRule,
    ) -> GatehouseResult<AccessRule>;
    fn delete_access_rule(&mut self, id: AccessRuleId) -> GatehouseResult<()>;
    fn list_access_rules(&self) -> Vec<AccessRule>;

    /// Start and end are `HH:mm`; a shift may end before it starts when it
    /// crosses midnight.
    fn create_shift(&mut self, input: CreateShift) -> GatehouseResult<Shift>;
    fn get_shift(&self, id: ShiftId) -> GatehouseResult<Shift>;
    fn update_shift(&mut self, id: ShiftId, input: UpdateShift) -> GatehouseResult<Shift>;
    fn delete_shift(&mut self, id: ShiftId) -> GatehouseResult<()>;
    fn list_shifts(&self) -> Vec<Shift>;
}
