//! Cycle detection for task dependency assignment.
//!
//! # Overview
//!
//! Dependency links must stay acyclic, otherwise a loop of tasks blocks
//! itself forever. The original dashboard only hid *ancestors* from the
//! dependency picker, which misses cycles closed through paths the picker
//! never showed. Here the store runs full detection on every edge insertion
//! and rejects the edge outright.
//!
//! # Design
//!
//! - `detect_cycle_on_add` answers the per-edge question with an explicit
//!   work-list DFS from the proposed prerequisite, following dependency
//!   edges, looking for a path back to the dependent task.
//! - `has_cycles` / `find_all_cycles` validate whole graphs (seeded data is
//!   checked once at load time) with three-color DFS.
//! - Both are O(V+E) per call.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::blocking::TaskGraph;

// ---------------------------------------------------------------------------
// CyclePath
// ---------------------------------------------------------------------------

/// The loop a rejected edge would have closed.
///
/// `nodes` starts at the dependent task, follows dependency edges, and ends
/// at the dependent task again: adding `A depends-on B` to a graph where
/// `B -> C -> A` yields `["A", "B", "C", "A"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
    pub nodes: Vec<String>,
}

impl CyclePath {
    /// Number of distinct tasks in the loop.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for a task depending on itself.
    pub fn is_self_loop(&self) -> bool {
        self.len() == 1
    }
}

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_loop() {
            write!(f, "self-loop on '{}'", self.nodes[0])
        } else {
            write!(f, "{}", self.nodes.join(" -> "))
        }
    }
}

// ---------------------------------------------------------------------------
// Per-edge detection
// ---------------------------------------------------------------------------

/// Check whether adding `task depends-on dep` would close a cycle.
///
/// Looks for an existing dependency path from `dep` back to `task`; the new
/// edge would complete that path into a loop. Returns the closing path, or
/// `None` when the edge is safe.
pub fn detect_cycle_on_add(graph: &TaskGraph, task_id: &str, dep_id: &str) -> Option<CyclePath> {
    if task_id == dep_id {
        return Some(CyclePath {
            nodes: vec![task_id.to_string(), task_id.to_string()],
        });
    }

    // Work-list DFS over dependency edges, remembering how each node was
    // reached so the path can be rebuilt.
    let mut reached_from: HashMap<String, String> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = vec![dep_id.to_string()];

    while let Some(current) = stack.pop() {
        if current == task_id {
            return Some(rebuild_path(&reached_from, task_id, dep_id));
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        for next in graph.dependencies_of(&current) {
            if !visited.contains(next) {
                reached_from
                    .entry(next.to_string())
                    .or_insert_with(|| current.clone());
                stack.push(next.to_string());
            }
        }
    }

    None
}

/// Rebuild `task -> dep -> ... -> task` from the DFS back-links.
fn rebuild_path(reached_from: &HashMap<String, String>, task_id: &str, dep_id: &str) -> CyclePath {
    let mut tail: Vec<String> = vec![task_id.to_string()];
    let mut current = task_id.to_string();
    while current != dep_id {
        match reached_from.get(&current) {
            Some(prev) => {
                tail.push(prev.clone());
                current = prev.clone();
            }
            None => break,
        }
    }
    tail.push(task_id.to_string());

    // tail is [task, ..., dep, task] walked backwards; flip the middle so the
    // path reads in dependency direction.
    let mut nodes = tail;
    let last = nodes.len() - 1;
    nodes[1..last].reverse();
    CyclePath { nodes }
}

// ---------------------------------------------------------------------------
// Whole-graph validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Returns `true` if the dependency graph contains any cycle.
///
/// Short-circuits on the first back edge found.
pub fn has_cycles(graph: &TaskGraph) -> bool {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    graph
        .task_ids()
        .any(|id| !marks.contains_key(id) && visit_detect(graph, id, &mut marks))
}

/// Find every cycle in the graph, one path per back edge.
///
/// Used to validate seeded data before it replaces store state.
pub fn find_all_cycles(graph: &TaskGraph) -> Vec<CyclePath> {
    let mut cycles = Vec::new();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut trail: Vec<&str> = Vec::new();

    for id in graph.task_ids() {
        if !marks.contains_key(id) {
            visit_collect(graph, id, &mut marks, &mut trail, &mut cycles);
        }
    }

    cycles
}

fn visit_detect<'a>(graph: &'a TaskGraph, node: &'a str, marks: &mut HashMap<&'a str, Mark>) -> bool {
    marks.insert(node, Mark::InProgress);
    for next in graph.dependencies_of(node) {
        match marks.get(next) {
            None => {
                if visit_detect(graph, next, marks) {
                    return true;
                }
            }
            Some(Mark::InProgress) => return true,
            Some(Mark::Done) => {}
        }
    }
    marks.insert(node, Mark::Done);
    false
}

fn visit_collect<'a>(
    graph: &'a TaskGraph,
    node: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
    trail: &mut Vec<&'a str>,
    cycles: &mut Vec<CyclePath>,
) {
    marks.insert(node, Mark::InProgress);
    trail.push(node);

    for next in graph.dependencies_of(node) {
        match marks.get(next) {
            None => visit_collect(graph, next, marks, trail, cycles),
            Some(Mark::InProgress) => {
                // Back edge: the loop is the trail suffix starting at `next`.
                let start = trail.iter().position(|n| *n == next).unwrap_or(0);
                let mut nodes: Vec<String> =
                    trail[start..].iter().map(ToString::to_string).collect();
                nodes.push(next.to_string());
                cycles.push(CyclePath { nodes });
            }
            Some(Mark::Done) => {}
        }
    }

    trail.pop();
    marks.insert(node, Mark::Done);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{CyclePath, detect_cycle_on_add, find_all_cycles, has_cycles};
    use crate::graph::blocking::TaskGraph;
    use crate::model::task::{Priority, Task};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn ensure(tasks: &mut BTreeMap<String, Task>, id: &str, deps: &[&str]) {
        tasks.insert(
            id.to_string(),
            Task {
                id: id.to_string(),
                title: format!("Task {id}"),
                assignee: None,
                due_date: NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date"),
                priority: Priority::Medium,
                completed: false,
                dependencies: deps.iter().map(ToString::to_string).collect(),
            },
        );
    }

    fn graph(edges: &[(&str, &[&str])]) -> TaskGraph {
        let mut tasks: BTreeMap<String, Task> = BTreeMap::new();
        for (id, deps) in edges {
            for dep in *deps {
                if !tasks.contains_key(*dep) {
                    ensure(&mut tasks, dep, &[]);
                }
            }
            ensure(&mut tasks, id, deps);
        }
        TaskGraph::from_tasks(&tasks)
    }

    #[test]
    fn self_dependency_rejected() {
        let g = graph(&[]);
        let cycle = detect_cycle_on_add(&g, "tsk-a", "tsk-a").expect("self-loop");
        assert!(cycle.is_self_loop());
        assert_eq!(cycle.nodes, vec!["tsk-a", "tsk-a"]);
        assert!(cycle.to_string().contains("self-loop"));
    }

    #[test]
    fn mutual_dependency_rejected() {
        // b depends on a; adding a depends-on b closes a 2-loop.
        let g = graph(&[("tsk-b", &["tsk-a"])]);
        let cycle = detect_cycle_on_add(&g, "tsk-b", "tsk-a");
        assert!(cycle.is_none(), "duplicate edge is not a cycle");
        let cycle = detect_cycle_on_add(&g, "tsk-a", "tsk-b").expect("2-cycle");
        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle.nodes.first().map(String::as_str), Some("tsk-a"));
        assert_eq!(cycle.nodes.last().map(String::as_str), Some("tsk-a"));
    }

    #[test]
    fn three_node_cycle_path_reads_in_dependency_direction() {
        // c depends on b, b depends on a; adding a depends-on c closes the
        // loop a -> c -> b -> a along dependency edges.
        let g = graph(&[("tsk-b", &["tsk-a"]), ("tsk-c", &["tsk-b"])]);
        let cycle = detect_cycle_on_add(&g, "tsk-a", "tsk-c").expect("3-cycle");
        assert_eq!(cycle.len(), 3);
        assert_eq!(
            cycle.nodes,
            vec!["tsk-a", "tsk-c", "tsk-b", "tsk-a"],
            "path follows dependency edges from the dependent task"
        );
    }

    #[test]
    fn safe_edges_are_allowed() {
        let g = graph(&[("tsk-b", &["tsk-a"]), ("tsk-d", &["tsk-c"])]);
        assert!(detect_cycle_on_add(&g, "tsk-c", "tsk-b").is_none());
        assert!(detect_cycle_on_add(&g, "tsk-e", "tsk-a").is_none());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let g = graph(&[
            ("tsk-b", &["tsk-a"]),
            ("tsk-c", &["tsk-a"]),
            ("tsk-d", &["tsk-b", "tsk-c"]),
        ]);
        assert!(!has_cycles(&g));
        assert!(detect_cycle_on_add(&g, "tsk-e", "tsk-d").is_none());
        // But closing the diamond back to its head is caught.
        assert!(detect_cycle_on_add(&g, "tsk-a", "tsk-d").is_some());
    }

    #[test]
    fn long_chain_cycle_detected() {
        let names: Vec<String> = (0..30).map(|i| format!("tsk-{i}")).collect();
        let mut edges: Vec<(&str, Vec<&str>)> = Vec::new();
        for i in 1..30 {
            edges.push((&names[i], vec![&names[i - 1]]));
        }
        let edge_refs: Vec<(&str, &[&str])> =
            edges.iter().map(|(id, deps)| (*id, deps.as_slice())).collect();
        let g = graph(&edge_refs);

        let cycle = detect_cycle_on_add(&g, &names[0], &names[29]).expect("30-cycle");
        assert_eq!(cycle.len(), 30);
    }

    #[test]
    fn whole_graph_validation() {
        assert!(!has_cycles(&graph(&[])));
        assert!(!has_cycles(&graph(&[("tsk-b", &["tsk-a"])])));

        // Seeded data can arrive already cyclic; find_all_cycles reports it.
        let cyclic = graph(&[("tsk-a", &["tsk-b"]), ("tsk-b", &["tsk-a"])]);
        assert!(has_cycles(&cyclic));
        let cycles = find_all_cycles(&cyclic);
        assert!(!cycles.is_empty());
        assert!(cycles.iter().all(|c| c.len() >= 2));
    }

    #[test]
    fn disjoint_subgraph_cycles_found() {
        let g = graph(&[
            ("tsk-b", &["tsk-a"]),
            ("tsk-x", &["tsk-y"]),
            ("tsk-y", &["tsk-x"]),
        ]);
        assert!(has_cycles(&g));
        let cycles = find_all_cycles(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 2);
    }

    #[test]
    fn cycle_path_display() {
        let path = CyclePath {
            nodes: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(path.to_string(), "a -> b -> a");
        assert!(!path.is_empty());
    }
}
