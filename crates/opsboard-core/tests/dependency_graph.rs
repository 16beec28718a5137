//! Dependency blocking behavior through the store interface, driven over
//! the demo fixture's "Product Launch Night" diamond:
//!
//! ```text
//! tsk-1 (done) <- tsk-2 <- tsk-4
//!              <- tsk-3 <-
//! ```

use chrono::NaiveDate;
use std::collections::BTreeSet;

use opsboard_core::config::ProjectConfig;
use opsboard_core::error::ErrorCode;
use opsboard_core::model::task::TaskDraft;
use opsboard_core::model::user::Role;
use opsboard_core::store::memory::MemoryStore;
use opsboard_core::store::seed::{MockDataSource, demo_data};
use opsboard_core::store::{ProjectStore, StoreError};

const LAUNCH: &str = "prj-1";

fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new(ProjectConfig::default());
    store
        .load_from(&MockDataSource::new(demo_data()))
        .expect("seed load");
    store
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).expect("valid date")
}

#[test]
fn ready_and_blocked_partition_matches_the_diamond() {
    let store = seeded_store();
    let graph = store.task_graph(LAUNCH).expect("graph");

    // tsk-1 is done, so its direct dependents are ready; the join task is not.
    assert_eq!(graph.ready_tasks(), vec!["tsk-2", "tsk-3"]);
    assert!(graph.is_blocked("tsk-4"));
    assert_eq!(graph.blockers("tsk-4"), BTreeSet::from(["tsk-2", "tsk-3"]));
}

#[test]
fn completing_a_dependency_unblocks_its_dependents() {
    let mut store = seeded_store();

    let err = store.complete_task(LAUNCH, "tsk-4").expect_err("blocked");
    assert_eq!(err.code(), ErrorCode::TaskBlocked);
    assert!(
        err.to_string().contains("Confirm catering")
            && err.to_string().contains("Send invitations"),
        "guard error names the blocking titles: {err}"
    );

    store.complete_task(LAUNCH, "tsk-2").expect("complete tsk-2");
    store.complete_task(LAUNCH, "tsk-3").expect("complete tsk-3");
    store.complete_task(LAUNCH, "tsk-4").expect("now unblocked");

    let graph = store.task_graph(LAUNCH).expect("graph");
    assert!(graph.ready_tasks().is_empty(), "everything is done");
}

#[test]
fn completion_is_idempotent() {
    let mut store = seeded_store();
    store.complete_task(LAUNCH, "tsk-1").expect("already done, no-op");
    store.complete_task(LAUNCH, "tsk-2").expect("complete");
    store.complete_task(LAUNCH, "tsk-2").expect("repeat is a no-op");
}

#[test]
fn deleting_a_prerequisite_is_rejected_until_unlinked() {
    let mut store = seeded_store();

    let err = store.delete_task(LAUNCH, "tsk-1").expect_err("prerequisite");
    assert_eq!(err.code(), ErrorCode::TaskHasDependents);
    let StoreError::TaskHasDependents { dependents, .. } = err else {
        panic!("expected TaskHasDependents");
    };
    assert_eq!(dependents, vec!["Confirm catering", "Send invitations"]);

    store.remove_dependency(LAUNCH, "tsk-2", "tsk-1").expect("unlink");
    store.remove_dependency(LAUNCH, "tsk-3", "tsk-1").expect("unlink");
    store.delete_task(LAUNCH, "tsk-1").expect("leaf now deletable");
    assert!(store.project(LAUNCH).expect("p").task("tsk-1").is_none());
}

#[test]
fn closing_the_diamond_into_a_loop_is_rejected_with_the_path() {
    let mut store = seeded_store();

    let err = store.add_dependency(LAUNCH, "tsk-1", "tsk-4").expect_err("cycle");
    assert_eq!(err.code(), ErrorCode::CycleDetected);
    let StoreError::CycleDetected { path } = err else {
        panic!("expected CycleDetected");
    };
    assert_eq!(path.first(), path.last(), "path closes on the start node");
    assert!(path.len() >= 3);

    // Nothing changed: the graph is still acyclic and tsk-1 has no deps.
    let graph = store.task_graph(LAUNCH).expect("graph");
    assert!(graph.dependencies_of("tsk-1").is_empty());
}

#[test]
fn picker_choices_shrink_as_edges_accumulate() {
    let mut store = MemoryStore::new(ProjectConfig::default());
    let pic = store.add_user("Citra", Role::Pic).expect("user");
    let project = store.create_project("Workshop", &pic).expect("project");

    let a = store.create_task(&project, TaskDraft::new("Plan agenda", date(1))).expect("a");
    let b = store.create_task(&project, TaskDraft::new("Invite speakers", date(2))).expect("b");
    let c = store.create_task(&project, TaskDraft::new("Print badges", date(3))).expect("c");

    assert_eq!(
        store.dependency_choices(&project, &a).expect("choices"),
        vec![b.clone(), c.clone()]
    );

    store.add_dependency(&project, &b, &a).expect("b->a");
    // B now depends on A, so offering B to A would close a loop.
    assert_eq!(store.dependency_choices(&project, &a).expect("choices"), vec![c.clone()]);
    // And A is already a dependency of B.
    assert_eq!(store.dependency_choices(&project, &b).expect("choices"), vec![c.clone()]);
}

#[test]
fn duplicate_edges_are_a_noop() {
    let mut store = seeded_store();
    store.add_dependency(LAUNCH, "tsk-2", "tsk-1").expect("existing edge");
    let graph = store.task_graph(LAUNCH).expect("graph");
    assert_eq!(graph.dependencies_of("tsk-2"), BTreeSet::from(["tsk-1"]));
}
