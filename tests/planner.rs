#![forbid(unsafe_code)]
use chrono::{DateTime, TimeZone, Utc};
use creneaux::{
    AdminId, AvailabilityPolicy, AvailabilityWindow, ConflictKind, DateRange, Day, EmployeeId,
    FindingKind, Frame, FrameId, FramePatch, Interval, NewEmployee, NewFrame, PlanError,
    PlanOptions, Planner, Undeclared, Workspace,
};

// 2025-10-01 est un mercredi
fn at(day: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, h, 0, 0).unwrap()
}

fn frame(employee: Option<&EmployeeId>, day: u32, sh: u32, eh: u32) -> NewFrame {
    NewFrame {
        employee_id: employee.cloned(),
        interval: Interval::new(at(day, sh), at(day, eh)).unwrap(),
    }
}

fn alice() -> NewEmployee {
    NewEmployee {
        firstname: "Alice".into(),
        lastname: "Martin".into(),
        email: "alice@example.com".into(),
        phone_number: Some("0600000000".into()),
        availability: vec![
            AvailabilityWindow::new(Day::Wednesday, 8, 20).unwrap(),
            AvailabilityWindow::new(Day::Thursday, 8, 20).unwrap(),
        ],
    }
}

fn setup() -> (Planner, AdminId, EmployeeId) {
    let mut planner = Planner::new(PlanOptions::default());
    let admin = AdminId::new("admin-1");
    let alice = planner.add_employee(&admin, alice()).unwrap();
    (planner, admin, alice)
}

#[test]
fn create_assigned_frame_within_availability() {
    let (mut planner, admin, alice) = setup();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let stored = planner.frame(&admin, &id).unwrap();
    assert_eq!(stored.employee_id.as_ref(), Some(&alice));
    assert_eq!(stored.start, at(1, 10));
}

#[test]
fn create_outside_availability_is_rejected() {
    let (mut planner, admin, alice) = setup();
    let err = planner
        .create_frame(&admin, frame(Some(&alice), 1, 6, 9))
        .unwrap_err();
    assert!(matches!(err, PlanError::NotAvailable));
    assert_eq!(err.status(), 422);
    assert!(planner.workspace().frames.is_empty());
}

#[test]
fn availability_is_checked_before_overlap() {
    let (mut planner, admin, alice) = setup();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    // chevauche ET hors disponibilités : la disponibilité gagne
    let err = planner
        .create_frame(&admin, frame(Some(&alice), 1, 7, 11))
        .unwrap_err();
    assert!(matches!(err, PlanError::NotAvailable));
}

#[test]
fn overlapping_frame_for_same_employee_is_rejected() {
    let (mut planner, admin, alice) = setup();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let err = planner
        .create_frame(&admin, frame(Some(&alice), 1, 11, 13))
        .unwrap_err();
    assert!(matches!(err, PlanError::Conflict(ConflictKind::StartOverlaps)));
    assert_eq!(planner.workspace().frames.len(), 1);
}

#[test]
fn abutting_frames_are_admitted() {
    let (mut planner, admin, alice) = setup();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 12, 14))
        .unwrap();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 8, 10))
        .unwrap();
    assert_eq!(planner.workspace().frames.len(), 3);
}

#[test]
fn unassigned_frames_skip_all_checks() {
    let (mut planner, admin, _) = setup();
    planner.create_frame(&admin, frame(None, 1, 1, 3)).unwrap();
    planner.create_frame(&admin, frame(None, 1, 1, 3)).unwrap();
    assert_eq!(planner.frames(&admin, None).len(), 2);
}

#[test]
fn reversed_interval_is_rejected_on_create() {
    let (mut planner, admin, _) = setup();
    let bad = NewFrame {
        employee_id: None,
        interval: Interval {
            start: at(1, 12),
            end: at(1, 10),
        },
    };
    assert!(matches!(
        planner.create_frame(&admin, bad),
        Err(PlanError::InvalidInterval)
    ));
}

#[test]
fn undeclared_availability_depends_on_policy() {
    let admin = AdminId::new("admin-1");
    let bob = NewEmployee {
        firstname: "Bob".into(),
        lastname: "Durand".into(),
        email: "bob@example.com".into(),
        ..NewEmployee::default()
    };

    let mut strict = Planner::new(PlanOptions::default());
    let id = strict.add_employee(&admin, bob.clone()).unwrap();
    assert!(matches!(
        strict.create_frame(&admin, frame(Some(&id), 1, 10, 12)),
        Err(PlanError::NotAvailable)
    ));

    let mut lenient = Planner::new(PlanOptions {
        availability: AvailabilityPolicy {
            undeclared: Undeclared::Allow,
            ..AvailabilityPolicy::default()
        },
        ..PlanOptions::default()
    });
    let id = lenient.add_employee(&admin, bob).unwrap();
    assert!(lenient
        .create_frame(&admin, frame(Some(&id), 1, 10, 12))
        .is_ok());
}

#[test]
fn no_op_update_does_not_conflict_with_itself() {
    let (mut planner, admin, alice) = setup();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let updated = planner
        .update_frame(&admin, &id, FramePatch::default())
        .unwrap();
    assert_eq!(updated.start, at(1, 10));
    assert_eq!(updated.end, at(1, 12));

    let same = FramePatch {
        start: Some(at(1, 10)),
        end: Some(at(1, 12)),
        employee: Some(Some(alice.clone())),
    };
    assert!(planner.update_frame(&admin, &id, same).is_ok());
}

#[test]
fn moving_end_onto_next_frame_start_is_allowed() {
    let (mut planner, admin, alice) = setup();
    let first = planner
        .create_frame(&admin, frame(Some(&alice), 1, 9, 11))
        .unwrap();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 12, 14))
        .unwrap();
    let patch = FramePatch {
        end: Some(at(1, 12)),
        ..FramePatch::default()
    };
    let updated = planner.update_frame(&admin, &first, patch).unwrap();
    assert_eq!(updated.end, at(1, 12));

    let past = FramePatch {
        end: Some(at(1, 13)),
        ..FramePatch::default()
    };
    assert!(matches!(
        planner.update_frame(&admin, &first, past),
        Err(PlanError::Conflict(ConflictKind::EndOverlaps))
    ));
}

#[test]
fn update_merges_patch_before_validating_bounds() {
    let (mut planner, admin, alice) = setup();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let patch = FramePatch {
        start: Some(at(1, 13)),
        ..FramePatch::default()
    };
    assert!(matches!(
        planner.update_frame(&admin, &id, patch),
        Err(PlanError::InvalidInterval)
    ));
    // rien n'a bougé
    assert_eq!(planner.frame(&admin, &id).unwrap().start, at(1, 10));
}

#[test]
fn reassigning_checks_the_new_employee() {
    let (mut planner, admin, alice) = setup();
    let carla = planner
        .add_employee(
            &admin,
            NewEmployee {
                firstname: "Carla".into(),
                lastname: "Bernard".into(),
                email: "carla@example.com".into(),
                availability: vec![AvailabilityWindow::new(Day::Wednesday, 8, 20).unwrap()],
                ..NewEmployee::default()
            },
        )
        .unwrap();
    planner
        .create_frame(&admin, frame(Some(&carla), 1, 9, 17))
        .unwrap();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();

    let to_carla = FramePatch {
        employee: Some(Some(carla.clone())),
        ..FramePatch::default()
    };
    assert!(matches!(
        planner.update_frame(&admin, &id, to_carla),
        Err(PlanError::Conflict(ConflictKind::ContainedWithin))
    ));

    let unassign = FramePatch {
        employee: Some(None),
        ..FramePatch::default()
    };
    let updated = planner.update_frame(&admin, &id, unassign).unwrap();
    assert!(updated.employee_id.is_none());
}

#[test]
fn frames_are_scoped_to_their_admin() {
    let (mut planner, admin, alice) = setup();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let intruder = AdminId::new("admin-2");

    assert!(matches!(
        planner.frame(&intruder, &id),
        Err(PlanError::UnknownFrame(_))
    ));
    assert!(planner.frames(&intruder, None).is_empty());
    assert!(matches!(
        planner.update_frame(&intruder, &id, FramePatch::default()),
        Err(PlanError::UnknownFrame(_))
    ));
    assert!(planner.delete_frame(&intruder, &id).is_none());
    assert!(matches!(
        planner.create_frame(&intruder, frame(Some(&alice), 1, 14, 15)),
        Err(PlanError::UnknownEmployee(_))
    ));
}

#[test]
fn delete_is_idempotent() {
    let (mut planner, admin, _) = setup();
    let id = planner.create_frame(&admin, frame(None, 1, 10, 12)).unwrap();
    assert!(planner.delete_frame(&admin, &id).is_some());
    assert!(planner.delete_frame(&admin, &id).is_none());
    assert!(planner.delete_frame(&admin, &FrameId::new("missing")).is_none());
}

#[test]
fn frames_are_sorted_and_filtered_on_start() {
    let (mut planner, admin, _) = setup();
    planner.create_frame(&admin, frame(None, 3, 10, 12)).unwrap();
    planner.create_frame(&admin, frame(None, 1, 10, 12)).unwrap();
    planner.create_frame(&admin, frame(None, 2, 10, 12)).unwrap();

    let all = planner.frames(&admin, None);
    let starts: Vec<_> = all.iter().map(|f| f.start).collect();
    assert_eq!(starts, vec![at(1, 10), at(2, 10), at(3, 10)]);

    let range = DateRange {
        from: at(2, 10),
        to: at(3, 10),
    };
    let within = planner.frames(&admin, Some(range));
    assert_eq!(within.len(), 2);
    assert_eq!(within[0].start, at(2, 10));
}

#[test]
fn frames_for_employee_only_lists_theirs() {
    let (mut planner, admin, alice) = setup();
    planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    planner.create_frame(&admin, frame(None, 1, 10, 12)).unwrap();
    assert_eq!(planner.frames_for_employee(&admin, &alice).unwrap().len(), 1);
    assert!(matches!(
        planner.frames_for_employee(&admin, &EmployeeId::new("ghost")),
        Err(PlanError::UnknownEmployee(_))
    ));
}

#[test]
fn removing_an_employee_unassigns_their_frames() {
    let (mut planner, admin, alice) = setup();
    let id = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    let removed = planner.remove_employee(&admin, &alice).unwrap();
    assert_eq!(removed.email, "alice@example.com");
    assert!(planner.frame(&admin, &id).unwrap().employee_id.is_none());
    assert!(planner.employees(&admin).is_empty());
}

#[test]
fn set_availability_replaces_windows() {
    let (mut planner, admin, alice) = setup();
    planner
        .set_availability(
            &admin,
            &alice,
            vec![AvailabilityWindow::new(Day::Friday, 0, 24).unwrap()],
        )
        .unwrap();
    assert!(matches!(
        planner.create_frame(&admin, frame(Some(&alice), 1, 10, 12)),
        Err(PlanError::NotAvailable)
    ));
    assert!(planner
        .create_frame(&admin, frame(Some(&alice), 3, 10, 12))
        .is_ok());
}

#[test]
fn employee_input_is_validated() {
    let (mut planner, admin, _) = setup();
    let blank = NewEmployee {
        firstname: "".into(),
        lastname: "X".into(),
        email: "x@example.com".into(),
        ..NewEmployee::default()
    };
    let err = planner.add_employee(&admin, blank).unwrap_err();
    assert!(matches!(err, PlanError::Validation { field: "firstname", .. }));

    let padded = NewEmployee {
        firstname: "X".into(),
        lastname: "Y".into(),
        email: " x@example.com".into(),
        ..NewEmployee::default()
    };
    let err = planner.add_employee(&admin, padded).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Field: 'email' cannot start or end with a whitespace!"
    );

    let duplicate = planner.add_employee(&admin, alice()).unwrap_err();
    assert!(matches!(duplicate, PlanError::Validation { field: "email", .. }));
}

#[test]
fn employees_are_sorted_by_lastname() {
    let (mut planner, admin, _) = setup();
    planner
        .add_employee(
            &admin,
            NewEmployee {
                firstname: "Zoé".into(),
                lastname: "Arnaud".into(),
                email: "zoe@example.com".into(),
                ..NewEmployee::default()
            },
        )
        .unwrap();
    let names: Vec<_> = planner
        .employees(&admin)
        .iter()
        .map(|e| e.lastname.as_str())
        .collect();
    assert_eq!(names, vec!["Arnaud", "Martin"]);
}

#[test]
fn audit_reports_overlaps_and_availability_breaches() {
    let (mut planner, admin, alice) = setup();
    let a = planner
        .create_frame(&admin, frame(Some(&alice), 1, 10, 12))
        .unwrap();
    assert!(planner.audit(&admin).is_empty());

    // données importées à la main, hors Planner
    let mut ws = planner.into_workspace();
    let mut clash = ws.frames[0].clone();
    clash.id = FrameId::new("clash");
    clash.start = at(1, 11);
    clash.end = at(1, 21);
    ws.frames.push(clash);
    let planner = Planner::with_workspace(ws, PlanOptions::default());

    let findings = planner.audit(&admin);
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().any(|f| f.frame_a == a
        && f.frame_b == Some(FrameId::new("clash"))
        && f.kind == FindingKind::Overlap(ConflictKind::StartOverlaps)));
    assert!(findings.iter().any(|f| f.frame_a == FrameId::new("clash")
        && f.kind == FindingKind::OutsideAvailability));
}

#[test]
fn audit_flags_frames_of_missing_employees() {
    let admin = AdminId::new("admin-1");
    let ghost = EmployeeId::new("ghost");
    let frame_of = |id: &str, employee: Option<EmployeeId>, sh: u32, eh: u32| Frame {
        id: FrameId::new(id),
        admin_id: admin.clone(),
        employee_id: employee,
        start: at(1, sh),
        end: at(1, eh),
        created_at: at(1, 0),
        updated_at: at(1, 0),
    };
    let ws = Workspace {
        employees: Vec::new(),
        frames: vec![
            frame_of("f1", Some(ghost.clone()), 10, 12),
            frame_of("f2", None, 10, 12),
        ],
    };
    let planner = Planner::with_workspace(ws, PlanOptions::default());

    let findings = planner.audit(&admin);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].employee, ghost);
    assert_eq!(findings[0].frame_a, FrameId::new("f1"));
    assert_eq!(findings[0].frame_b, None);
    assert_eq!(findings[0].kind, FindingKind::UnknownEmployee);

    // un autre admin ne voit rien
    assert!(planner.audit(&AdminId::new("admin-2")).is_empty());
}
