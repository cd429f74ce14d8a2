//! Integration tests for user, group and zone lifecycle on the seeded store.

use chrono::{NaiveDate, TimeZone, Utc};
use gatehouse_core::clock::FixedClock;
use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::group::{CreateGroup, DateRange, GroupType, UpdateGroup};
use gatehouse_core::models::access_rule::{CreateAccessRule, UpdateAccessRule};
use gatehouse_core::models::ids::{AccessRuleId, GroupId, ShiftId, UserId, ZoneId};
use gatehouse_core::models::shift::{CreateShift, UpdateShift};
use gatehouse_core::models::membership::Container;
use gatehouse_core::models::user::{CreateUser, UpdateUser, UserStatus};
use gatehouse_core::models::zone::{CreateZone, UpdateZone};
use gatehouse_core::query::{Activity, MemberQuery, Pagination, UserFilter};
use gatehouse_core::repository::{
    GroupRepository, ReferenceRepository, UserRepository, ZoneRepository,
};
use gatehouse_store::{DirectoryDocument, MembershipStore, StoreConfig};

/// Helper: seeded store frozen on 2024-07-23 10:00 UTC.
fn setup() -> MembershipStore<FixedClock> {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 23, 10, 0, 0).unwrap());
    MembershipStore::from_document(DirectoryDocument::builtin_seed().unwrap(), clock).unwrap()
}

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        status: UserStatus::Active,
        avatar: name[..1].into(),
        company: None,
        position: None,
        groups: Vec::new(),
        zones: Vec::new(),
    }
}

fn contractors() -> CreateGroup {
    CreateGroup {
        name: "Contractors".into(),
        description: "Maintenance contractors".into(),
        group_type: GroupType::Contractor,
        company: Some("Gamma Industries".into()),
        date_range: Some(
            DateRange::new(
                Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 7, 31, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        ),
    }
}

// -----------------------------------------------------------------------
// Users
// -----------------------------------------------------------------------

#[test]
fn create_user_with_initial_memberships() {
    let mut store = setup();
    let user = store
        .create_user(CreateUser {
            groups: vec![GroupId(2)],
            zones: vec![ZoneId(3), ZoneId(3)],
            ..new_user("Dana")
        })
        .unwrap();

    assert_eq!(user.id, UserId(8));
    assert_eq!(user.joined, NaiveDate::from_ymd_opt(2024, 7, 23).unwrap());
    assert_eq!(store.get_user(user.id).unwrap(), user);

    let groups = store.user_groups(user.id).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Security");
    let zones = store.user_zones(user.id).unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "Normal Zone");

    assert_eq!(store.statistics().joined_today, 2);
}

#[test]
fn create_user_into_locked_group_creates_nothing() {
    let mut store = setup();
    let err = store
        .create_user(CreateUser {
            groups: vec![GroupId(1)],
            ..new_user("Eve")
        })
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Locked { .. }));
    assert_eq!(store.list_users(Pagination::default()).total, 7);

    // The rejected call did not consume a key.
    let created = store.create_user(new_user("Eve")).unwrap();
    assert_eq!(created.id, UserId(8));
}

#[test]
fn create_user_requires_name_and_email() {
    let mut store = setup();
    let blank = store.create_user(new_user("  "));
    assert!(matches!(blank, Err(GatehouseError::Validation { .. })));

    let no_email = store.create_user(CreateUser {
        email: " ".into(),
        ..new_user("Finn")
    });
    assert!(matches!(no_email, Err(GatehouseError::Validation { .. })));
}

#[test]
fn update_user_fields() {
    let mut store = setup();
    let updated = store
        .update_user(
            UserId(4),
            UpdateUser {
                status: Some(UserStatus::Active),
                position: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, UserStatus::Active);
    assert_eq!(updated.position, None);
    assert_eq!(updated.name, "Alice Brown"); // unchanged
    assert_eq!(updated.company.as_deref(), Some("BetaCorp"));
}

#[test]
fn update_user_email_is_trimmed_and_required() {
    let mut store = setup();
    let blank = store.update_user(
        UserId(2),
        UpdateUser {
            email: Some("   ".into()),
            ..Default::default()
        },
    );
    assert!(matches!(blank, Err(GatehouseError::Validation { .. })));
    assert_eq!(
        store.get_user(UserId(2)).unwrap().email,
        "jane.smith@acme-facility.com"
    );

    let updated = store
        .update_user(
            UserId(2),
            UpdateUser {
                email: Some("  jane@acme-facility.com ".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.email, "jane@acme-facility.com");
}

#[test]
fn delete_user_cascades_memberships() {
    let mut store = setup();
    store.delete_user(UserId(1)).unwrap();

    assert!(matches!(
        store.get_user(UserId(1)),
        Err(GatehouseError::NotFound { .. })
    ));
    let security = store
        .group_members(GroupId(2), &MemberQuery::default())
        .unwrap();
    assert!(security.iter().all(|u| u.id != UserId(1)));
    let low = store
        .zone_members(ZoneId(1), &MemberQuery::default())
        .unwrap();
    assert!(low.iter().all(|u| u.id != UserId(1)));
    assert!(store.snapshot().users.iter().all(|r| r.key != 1));

    assert!(store.delete_user(UserId(1)).is_err());
}

#[test]
fn search_users_by_profile_and_activity() {
    let store = setup();
    let beta = store.search_users(
        &UserFilter {
            search: Some("betacorp".into()),
            activity: None,
        },
        Pagination::default(),
    );
    let keys: Vec<u64> = beta.items.iter().map(|u| u.id.get()).collect();
    assert_eq!(keys, vec![4, 7]);

    let idle = store.search_users(
        &UserFilter {
            search: None,
            activity: Some(Activity::NotActive),
        },
        Pagination::default(),
    );
    let keys: Vec<u64> = idle.items.iter().map(|u| u.id.get()).collect();
    assert_eq!(keys, vec![4, 5]);

    let engineer = store.search_users(
        &UserFilter {
            search: Some("ENGINEER".into()),
            activity: Some(Activity::Active),
        },
        Pagination::default(),
    );
    assert_eq!(engineer.total, 1);
    assert_eq!(engineer.items[0].name, "Somchai Prasert");
}

#[test]
fn list_users_with_pagination() {
    let store = setup();
    let page1 = store.list_users(Pagination {
        offset: 0,
        limit: 5,
    });
    assert_eq!(page1.items.len(), 5);
    assert_eq!(page1.total, 7);

    let page2 = store.list_users(Pagination {
        offset: 5,
        limit: 5,
    });
    assert_eq!(page2.items.len(), 2);
}

// -----------------------------------------------------------------------
// Groups
// -----------------------------------------------------------------------

#[test]
fn create_and_find_group() {
    let mut store = setup();
    let group = store.create_group(contractors()).unwrap();
    assert_eq!(group.id, GroupId(8));
    assert!(!group.locked);
    assert!(group.date_range.is_some());

    let found = store.find_group_by_name("Contractors").unwrap();
    assert_eq!(found, group);
    assert!(matches!(
        store.find_group_by_name("Nobody"),
        Err(GatehouseError::NotFound { .. })
    ));

    // Keys keep increasing across entity kinds.
    let zone = store
        .create_zone(CreateZone {
            name: "Roof".into(),
            description: String::new(),
            assigned_groups: Vec::new(),
            assigned_users: Vec::new(),
        })
        .unwrap();
    assert_eq!(zone.id, ZoneId(9));
}

#[test]
fn duplicate_group_name_rejected() {
    let mut store = setup();
    let err = store
        .create_group(CreateGroup {
            name: " Security ".into(),
            ..contractors()
        })
        .unwrap_err();
    assert_eq!(
        err,
        GatehouseError::AlreadyExists {
            entity: "group".into(),
            name: "Security".into()
        }
    );
}

#[test]
fn time_bounded_group_requires_range() {
    let mut store = setup();
    let err = store
        .create_group(CreateGroup {
            date_range: None,
            ..contractors()
        })
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Validation { .. }));

    let full_time = store
        .create_group(CreateGroup {
            group_type: GroupType::FullTime,
            ..contractors()
        })
        .unwrap();
    assert_eq!(full_time.date_range, None);
}

#[test]
fn rename_group_keeps_members() {
    let mut store = setup();
    let renamed = store
        .update_group(
            GroupId(3),
            UpdateGroup {
                name: Some("R&D".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "R&D");
    assert_eq!(renamed.description, "Engineering team"); // unchanged

    let members = store
        .group_members(GroupId(3), &MemberQuery::default())
        .unwrap();
    assert_eq!(members.len(), 3);

    let snapshot = store.snapshot();
    let bob = snapshot.users.iter().find(|u| u.key == 5).unwrap();
    assert_eq!(bob.groups, vec!["R&D".to_string()]);
}

#[test]
fn update_group_type_validates_range() {
    let mut store = setup();
    let err = store
        .update_group(
            GroupId(2),
            UpdateGroup {
                group_type: Some(GroupType::PartTime),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Validation { .. }));

    let visitor = store
        .update_group(
            GroupId(4),
            UpdateGroup {
                group_type: Some(GroupType::FullTime),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(visitor.date_range, None);
}

#[test]
fn rename_to_taken_name_rejected() {
    let mut store = setup();
    let err = store
        .update_group(
            GroupId(3),
            UpdateGroup {
                name: Some("Visitor".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatehouseError::AlreadyExists { .. }));

    // Renaming to its own name is fine.
    store
        .update_group(
            GroupId(3),
            UpdateGroup {
                name: Some("Engineering".into()),
                ..Default::default()
            },
        )
        .unwrap();
}

#[test]
fn delete_group_cascades_memberships_and_assignments() {
    let mut store = setup();
    store.add_groups_to_zone(ZoneId(3), &[GroupId(2)]).unwrap();
    store.delete_group(GroupId(2)).unwrap();

    let john_groups: Vec<GroupId> = store
        .user_groups(UserId(1))
        .unwrap()
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(john_groups, vec![GroupId(1)]);
    assert!(store.assigned_groups(ZoneId(3)).unwrap().is_empty());
    assert!(matches!(
        store.get_group(GroupId(2)),
        Err(GatehouseError::NotFound { .. })
    ));
}

#[test]
fn delete_group_assigned_to_locked_zone_rejected() {
    use gatehouse_core::repository::MembershipRepository;

    let mut store = setup();
    store.add_groups_to_zone(ZoneId(3), &[GroupId(3)]).unwrap();
    store.toggle_lock(Container::Zone(ZoneId(3))).unwrap();

    let err = store.delete_group(GroupId(3)).unwrap_err();
    assert!(matches!(err, GatehouseError::Locked { .. }));
    assert!(store.get_group(GroupId(3)).is_ok());
    assert_eq!(store.assigned_groups(ZoneId(3)).unwrap()[0].id, GroupId(3));

    store.toggle_lock(Container::Zone(ZoneId(3))).unwrap();
    store.delete_group(GroupId(3)).unwrap();
    assert!(store.assigned_groups(ZoneId(3)).unwrap().is_empty());
}

#[test]
fn delete_locked_group_rejected() {
    let mut store = setup();
    let err = store.delete_group(GroupId(1)).unwrap_err();
    assert!(matches!(err, GatehouseError::Locked { .. }));
    assert!(store.get_group(GroupId(1)).is_ok());
}

// -----------------------------------------------------------------------
// Zones
// -----------------------------------------------------------------------

#[test]
fn create_zone_with_assignments() {
    let mut store = setup();
    let zone = store
        .create_zone(CreateZone {
            name: "Server Hall".into(),
            description: "Racks".into(),
            assigned_groups: vec![GroupId(3)],
            assigned_users: vec![UserId(1)],
        })
        .unwrap();

    let members = store
        .zone_members(zone.id, &MemberQuery::default())
        .unwrap();
    let mut keys: Vec<u64> = members.iter().map(|u| u.id.get()).collect();
    keys.sort();
    assert_eq!(keys, vec![1, 3, 5, 6]);
    assert_eq!(store.assigned_groups(zone.id).unwrap()[0].name, "Engineering");
}

#[test]
fn create_zone_with_unknown_group_creates_nothing() {
    let mut store = setup();
    let err = store
        .create_zone(CreateZone {
            name: "Server Hall".into(),
            description: String::new(),
            assigned_groups: vec![GroupId(77)],
            assigned_users: Vec::new(),
        })
        .unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
    assert_eq!(store.list_zones().len(), 3);
}

#[test]
fn update_and_delete_zone() {
    let mut store = setup();
    let zone = store
        .update_zone(
            ZoneId(3),
            UpdateZone {
                description: Some("Lobby and corridors".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(zone.name, "Normal Zone");
    assert_eq!(zone.description, "Lobby and corridors");

    let taken = store.update_zone(
        ZoneId(3),
        UpdateZone {
            name: Some("Low Zone".into()),
            ..Default::default()
        },
    );
    assert!(matches!(taken, Err(GatehouseError::AlreadyExists { .. })));

    store.delete_zone(ZoneId(3)).unwrap();
    assert!(store.user_zones(UserId(5)).unwrap().is_empty());

    let locked = store.delete_zone(ZoneId(2));
    assert!(matches!(locked, Err(GatehouseError::Locked { .. })));
}

#[test]
fn locked_zone_rejects_group_assignment() {
    let mut store = setup();
    let err = store
        .add_groups_to_zone(ZoneId(2), &[GroupId(2)])
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Locked { .. }));
    assert!(store.assigned_groups(ZoneId(2)).unwrap().is_empty());
}

// -----------------------------------------------------------------------
// Access rules and shifts
// -----------------------------------------------------------------------

#[test]
fn access_rule_lifecycle() {
    let mut store = setup();
    let rule = store
        .create_access_rule(CreateAccessRule {
            name: "Loading Dock".into(),
            description: "06:00-10:00".into(),
            user_ids: vec![UserId(5), UserId(5), UserId(3)],
        })
        .unwrap();
    assert_eq!(rule.id, AccessRuleId(8));
    assert_eq!(rule.user_ids.len(), 2);
    assert_eq!(store.list_access_rules().len(), 5);

    let updated = store
        .update_access_rule(
            rule.id,
            UpdateAccessRule {
                description: Some("24/7".into()),
                user_ids: Some(vec![UserId(5)]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Loading Dock");
    assert_eq!(updated.description, "24/7");
    assert!(updated.applies_to(UserId(5)));
    assert!(!updated.applies_to(UserId(3)));

    store.delete_access_rule(rule.id).unwrap();
    assert!(matches!(
        store.get_access_rule(rule.id),
        Err(GatehouseError::NotFound { .. })
    ));
    assert!(store.delete_access_rule(rule.id).is_err());
}

#[test]
fn access_rule_with_unknown_user_creates_nothing() {
    let mut store = setup();
    let err = store
        .create_access_rule(CreateAccessRule {
            name: "Roof Hatch".into(),
            description: String::new(),
            user_ids: vec![UserId(99)],
        })
        .unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
    assert_eq!(store.list_access_rules().len(), 4);

    let blank = store.update_access_rule(
        AccessRuleId(1),
        UpdateAccessRule {
            name: Some(" ".into()),
            ..Default::default()
        },
    );
    assert!(matches!(blank, Err(GatehouseError::Validation { .. })));
}

#[test]
fn shift_lifecycle() {
    let mut store = setup();
    let shift = store
        .create_shift(CreateShift {
            name: "Late Shift".into(),
            start_time: "20:00".into(),
            end_time: "04:00".into(),
            user_ids: vec![UserId(7)],
        })
        .unwrap();
    assert_eq!(shift.id, ShiftId(8));
    assert_eq!(shift.label(), "Late Shift (20:00-04:00)");

    let updated = store
        .update_shift(
            shift.id,
            UpdateShift {
                end_time: Some("05:30".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.label(), "Late Shift (20:00-05:30)");
    assert_eq!(store.get_shift(shift.id).unwrap(), updated);

    store.delete_shift(shift.id).unwrap();
    assert_eq!(store.list_shifts().len(), 3);
}

#[test]
fn shift_times_must_be_hh_mm() {
    let mut store = setup();
    let err = store
        .create_shift(CreateShift {
            name: "Odd Shift".into(),
            start_time: "8am".into(),
            end_time: "16:00".into(),
            user_ids: Vec::new(),
        })
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Validation { .. }));

    let err = store
        .update_shift(
            ShiftId(1),
            UpdateShift {
                start_time: Some("25:00".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Validation { .. }));
    assert_eq!(
        store.get_shift(ShiftId(1)).unwrap().label(),
        "Morning Shift (08:00-16:00)"
    );

    // The failed create did not consume a key.
    let next = store
        .create_access_rule(CreateAccessRule {
            name: "Side Door".into(),
            description: String::new(),
            user_ids: Vec::new(),
        })
        .unwrap();
    assert_eq!(next.id, AccessRuleId(8));
}

#[test]
fn delete_user_prunes_rules_and_shifts() {
    let mut store = setup();
    store.delete_user(UserId(3)).unwrap();

    assert!(
        store
            .list_access_rules()
            .iter()
            .all(|rule| !rule.applies_to(UserId(3)))
    );
    assert_eq!(
        store.get_access_rule(AccessRuleId(2)).unwrap().user_ids.len(),
        0
    );
    assert!(!store.get_shift(ShiftId(1)).unwrap().covers(UserId(3)));
    assert_eq!(store.get_shift(ShiftId(1)).unwrap().user_ids.len(), 5);
}

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

#[test]
fn open_without_seed_is_empty() {
    let store = MembershipStore::open(
        &StoreConfig {
            seed_path: None,
            seed: false,
        },
        FixedClock(Utc::now()),
    )
    .unwrap();
    assert_eq!(store.list_users(Pagination::default()).total, 0);
    assert!(store.list_groups().is_empty());
}

#[test]
fn open_from_missing_path_is_a_fixture_error() {
    let err = MembershipStore::open(
        &StoreConfig {
            seed_path: Some("/nonexistent/gatehouse-seed.json".into()),
            seed: true,
        },
        FixedClock(Utc::now()),
    )
    .unwrap_err();
    assert!(matches!(err, GatehouseError::Fixture(_)));
}

#[test]
fn toggled_lock_appears_in_snapshot() {
    use gatehouse_core::repository::MembershipRepository;

    let mut store = setup();
    store.toggle_lock(Container::Zone(ZoneId(1))).unwrap();
    let snapshot = store.snapshot();
    let low = snapshot.zones.iter().find(|z| z.key == 1).unwrap();
    assert!(low.locked);
}
