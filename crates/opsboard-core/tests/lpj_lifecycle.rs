//! End-to-end LPJ lifecycle through the store interface.

use chrono::NaiveDate;
use opsboard_core::config::ProjectConfig;
use opsboard_core::error::ErrorCode;
use opsboard_core::model::lpj::LpjStatus;
use opsboard_core::model::project::ProjectStatus;
use opsboard_core::model::user::{Actor, Role};
use opsboard_core::store::memory::MemoryStore;
use opsboard_core::store::{ProjectStore, StoreError};
use opsboard_core::workflow::LpjPatch;

struct Fixture {
    store: MemoryStore,
    project: String,
    pic: Actor,
    manager: Actor,
}

fn fixture() -> Fixture {
    let mut store = MemoryStore::new(ProjectConfig::default());
    let pic_id = store.add_user("Citra", Role::Pic).expect("pic");
    let manager_id = store.add_user("Bella", Role::Manager).expect("manager");
    let project = store.create_project("Company Retreat", &pic_id).expect("project");
    store
        .set_project_status(&project, ProjectStatus::Completed)
        .expect("complete");
    Fixture {
        store,
        project,
        pic: Actor::new(pic_id, Role::Pic),
        manager: Actor::new(manager_id, Role::Manager),
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, d).expect("valid date")
}

fn status(fixture: &Fixture) -> LpjStatus {
    fixture
        .store
        .project(&fixture.project)
        .and_then(|p| p.lpj.as_ref())
        .expect("lpj exists")
        .status
}

#[test]
fn full_lifecycle_draft_to_approved_with_revision_loop() {
    let mut f = fixture();

    // Project completed, no LPJ yet: PIC creates the draft.
    let lpj = f.store.create_lpj(&f.project, &f.pic).expect("create");
    assert_eq!(lpj, "lpj-1");
    assert_eq!(status(&f), LpjStatus::Draft);

    f.store.submit_lpj(&f.project, &f.pic, day(1)).expect("submit");
    assert_eq!(status(&f), LpjStatus::Submitted);

    f.store
        .request_lpj_revision(&f.project, &f.manager, "totals do not add up")
        .expect("revision");
    assert_eq!(status(&f), LpjStatus::Revision);

    f.store.submit_lpj(&f.project, &f.pic, day(3)).expect("resubmit");
    assert_eq!(status(&f), LpjStatus::Submitted);

    f.store.approve_lpj(&f.project, &f.manager, day(5)).expect("approve");
    let report = f
        .store
        .project(&f.project)
        .and_then(|p| p.lpj.as_ref())
        .expect("lpj");
    assert_eq!(report.status, LpjStatus::Approved);
    assert_eq!(report.approved_at, Some(day(5)));
}

#[test]
fn lpj_requires_completed_project() {
    let mut f = fixture();
    f.store
        .set_project_status(&f.project, ProjectStatus::Active)
        .expect("reactivate");

    let err = f.store.create_lpj(&f.project, &f.pic).expect_err("gated");
    assert_eq!(err.code(), ErrorCode::ProjectNotCompleted);
    assert!(f.store.project(&f.project).expect("p").lpj.is_none());
}

#[test]
fn staff_outside_the_project_cannot_drive_the_workflow() {
    let mut f = fixture();
    let staff_id = f.store.add_user("Dimas", Role::Staff).expect("staff");
    let staff = Actor::new(staff_id, Role::Staff);

    let err = f.store.create_lpj(&f.project, &staff).expect_err("gated");
    assert_eq!(err.code(), ErrorCode::RoleNotPermitted);

    f.store.create_lpj(&f.project, &f.pic).expect("create");
    f.store.submit_lpj(&f.project, &f.pic, day(1)).expect("submit");

    let err = f
        .store
        .request_lpj_revision(&f.project, &f.pic, "self-review")
        .expect_err("pic cannot review");
    assert_eq!(err.code(), ErrorCode::RoleNotPermitted);

    let err = f.store.approve_lpj(&f.project, &f.pic, day(2)).expect_err("pic cannot approve");
    assert_eq!(err.code(), ErrorCode::RoleNotPermitted);
}

#[test]
fn approved_lpj_rejects_every_further_mutation() {
    let mut f = fixture();
    f.store.create_lpj(&f.project, &f.pic).expect("create");
    f.store
        .edit_lpj(
            &f.project,
            &f.pic,
            LpjPatch {
                notes: Some("all invoices collected".into()),
                attachments: Some(vec!["summary.pdf".into()]),
                ..LpjPatch::default()
            },
        )
        .expect("edit draft");
    f.store.submit_lpj(&f.project, &f.pic, day(1)).expect("submit");
    f.store.approve_lpj(&f.project, &f.manager, day(2)).expect("approve");

    let before = f
        .store
        .project(&f.project)
        .and_then(|p| p.lpj.as_ref())
        .expect("lpj")
        .clone();

    let err = f
        .store
        .edit_lpj(&f.project, &f.pic, LpjPatch::default())
        .expect_err("locked");
    assert_eq!(err.code(), ErrorCode::LpjLocked);

    let err = f.store.submit_lpj(&f.project, &f.pic, day(3)).expect_err("terminal");
    assert_eq!(err.code(), ErrorCode::InvalidLpjTransition);

    let err = f
        .store
        .request_lpj_revision(&f.project, &f.manager, "reopen please")
        .expect_err("terminal");
    assert_eq!(err.code(), ErrorCode::InvalidLpjTransition);

    let err = f.store.approve_lpj(&f.project, &f.manager, day(4)).expect_err("terminal");
    assert_eq!(err.code(), ErrorCode::InvalidLpjTransition);

    let after = f
        .store
        .project(&f.project)
        .and_then(|p| p.lpj.as_ref())
        .expect("lpj")
        .clone();
    assert_eq!(before, after, "approved report is frozen byte-for-byte");
}

#[test]
fn second_lpj_rejected() {
    let mut f = fixture();
    f.store.create_lpj(&f.project, &f.pic).expect("first");
    let err = f.store.create_lpj(&f.project, &f.pic).expect_err("duplicate");
    assert!(matches!(err, StoreError::Workflow(_)));
    assert_eq!(err.code(), ErrorCode::LpjAlreadyExists);
}
