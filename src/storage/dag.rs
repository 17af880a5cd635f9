//! Bundle dependency graph.
//!
//! [`BundleDag`] maps lowercased bundle names to their [`BundleStorageUnit`]. Edges
//! are not stored: an edge `a → b` exists exactly when `a`'s current dependency
//! list names `b`. Replacing a vertex therefore replaces its outgoing edges at the
//! same time, and edges pointing at a name survive any redefinition of that name.
//!
//! Dependency names that match no vertex are tolerated. They are reported by
//! [`BundleDag::dangling_dependencies`] and skipped by every traversal.
//!
//! # Resolution Order
//!
//! [`BundleDag::bundles_for`] walks the graph depth-first from the requested bundle,
//! visiting dependencies in declaration order, and emits each bundle once after all
//! of its dependencies (post-order):
//!
//! ```text
//! b1 → [b3, b4]    b3 → [b7, b8]    b4 → [b8, b9]
//!
//! bundles_for("b1") = [b7, b8, b3, b9, b4, b1]
//! ```

use crate::bundle::{BundleStorageUnit, normalize_name};
use crate::core::{DandelionError, Result};

use petgraph::algo::toposort;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Visit states for depth-first traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// Vertex is on the current DFS path.
    InProgress,
    /// Vertex and all its dependencies are finished.
    Done,
}

/// Vertex on an explicit DFS stack with the index of its next dependency.
struct Frame<'a> {
    name: &'a str,
    unit: &'a BundleStorageUnit,
    next: usize,
}

/// Directed graph of bundles keyed by lowercased name.
///
/// Vertices are kept in name order so that every whole-graph pass, cycle detection
/// included, runs in the same order on every call.
#[derive(Debug, Clone, Default)]
pub struct BundleDag {
    vertices: BTreeMap<String, BundleStorageUnit>,
}

impl BundleDag {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bundle, replacing any bundle with the same name.
    ///
    /// The unit is normalized first (see [`BundleStorageUnit::normalized`]). The
    /// replaced unit, if any, is returned; nothing of it is merged into the new one.
    /// No validation happens here, see [`detect_cycles`](Self::detect_cycles).
    pub fn add_vertex(&mut self, unit: BundleStorageUnit) -> Option<BundleStorageUnit> {
        let unit = unit.normalized();
        debug!("add bundle '{}' depending on {:?}", unit.name, unit.dependencies());
        self.vertices.insert(unit.name.clone(), unit)
    }

    /// Whether `from`'s dependency list names `to`.
    ///
    /// Holds whether or not `to` is itself a vertex.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.vertex(from).is_some_and(|unit| unit.depends_on(&normalize_name(to)))
    }

    /// Look up a bundle by name, ignoring case.
    pub fn vertex(&self, name: &str) -> Option<&BundleStorageUnit> {
        self.vertices.get(&normalize_name(name))
    }

    /// Whether a bundle with this name exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.vertices.contains_key(&normalize_name(name))
    }

    /// All bundles, sorted by name.
    pub fn vertices(&self) -> Vec<&BundleStorageUnit> {
        self.vertices.values().collect()
    }

    /// All bundle names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vertices.keys().map(String::as_str)
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the total number of bundles in the graph.
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the total number of declared edges, dangling ones included.
    ///
    /// A dependency listed twice by the same bundle counts once.
    pub fn edge_count(&self) -> usize {
        self.vertices
            .values()
            .map(|unit| unit.dependencies().iter().collect::<HashSet<_>>().len())
            .sum()
    }

    /// Bundles needed to render `name`, dependencies first.
    ///
    /// Post-order depth-first walk from `name`: dependencies are visited in the
    /// order they are declared, each bundle is emitted once, after everything it
    /// depends on, and `name` itself comes last. Dependencies on unknown bundles
    /// are skipped. An unknown `name` yields an empty list.
    ///
    /// Cycles are not reported here; a bundle already on the current path is
    /// treated as visited. Run [`detect_cycles`](Self::detect_cycles) to validate.
    pub fn bundles_for(&self, name: &str) -> Vec<&BundleStorageUnit> {
        self.bundles_for_all([name])
    }

    /// Bundles needed to render all of `names`, dependencies first.
    ///
    /// Roots are resolved in the given order into one list; a bundle already
    /// emitted for an earlier root is not repeated.
    pub fn bundles_for_all<'a>(
        &'a self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Vec<&'a BundleStorageUnit> {
        let mut states: HashMap<&'a str, Visit> = HashMap::new();
        let mut order = Vec::new();

        for name in names {
            self.visit(&normalize_name(name.as_ref()), &mut states, &mut order);
        }

        order
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        states: &mut HashMap<&'a str, Visit>,
        order: &mut Vec<&'a BundleStorageUnit>,
    ) {
        let Some((key, unit)) = self.vertices.get_key_value(name) else {
            return;
        };
        if states.contains_key(key.as_str()) {
            return;
        }

        states.insert(key, Visit::InProgress);
        let mut stack = vec![Frame {
            name: key,
            unit,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let unit = frame.unit;
            let Some(dependency) = unit.dependencies().get(frame.next) else {
                states.insert(frame.name, Visit::Done);
                order.push(unit);
                stack.pop();
                continue;
            };
            frame.next += 1;

            if let Some((key, unit)) = self.vertices.get_key_value(dependency.as_str())
                && !states.contains_key(key.as_str())
            {
                states.insert(key, Visit::InProgress);
                stack.push(Frame {
                    name: key,
                    unit,
                    next: 0,
                });
            }
        }
    }

    /// Detect cycles using a depth-first search with visit states.
    ///
    /// Every vertex is used as a root, in name order, so the first reported cycle
    /// is stable across calls.
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::CycleDetected`] naming the bundle where the cycle
    ///   closes, e.g. `b1` for `b1 → b2 → b1`.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut states: HashMap<&str, Visit> = HashMap::new();

        for (name, unit) in &self.vertices {
            if states.contains_key(name.as_str()) {
                continue;
            }
            if let Some(cycle) = self.cycle_from(name, unit, &mut states) {
                return Err(DandelionError::CycleDetected {
                    vertex: cycle[0].to_string(),
                    chain: cycle.join(" → "),
                });
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is detected, `None` otherwise. The path
    /// starts and ends with the same bundle and is read off the frame stack.
    fn cycle_from<'a>(
        &'a self,
        root: &'a str,
        unit: &'a BundleStorageUnit,
        states: &mut HashMap<&'a str, Visit>,
    ) -> Option<Vec<&'a str>> {
        states.insert(root, Visit::InProgress);
        let mut stack = vec![Frame {
            name: root,
            unit,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let unit = frame.unit;
            let Some(dependency) = unit.dependencies().get(frame.next) else {
                states.insert(frame.name, Visit::Done);
                stack.pop();
                continue;
            };
            frame.next += 1;

            // Dangling dependencies cannot close a cycle
            let Some((key, unit)) = self.vertices.get_key_value(dependency.as_str()) else {
                continue;
            };
            let key = key.as_str();
            match states.get(key) {
                Some(Visit::InProgress) => {
                    let start = stack.iter().position(|entry| entry.name == key).unwrap_or(0);
                    let mut cycle: Vec<&str> = stack[start..].iter().map(|entry| entry.name).collect();
                    cycle.push(key);
                    return Some(cycle);
                }
                Some(Visit::Done) => {}
                None => {
                    states.insert(key, Visit::InProgress);
                    stack.push(Frame {
                        name: key,
                        unit,
                        next: 0,
                    });
                }
            }
        }

        None
    }

    /// Declared dependencies that match no bundle, as `(bundle, dependency)` pairs.
    pub fn dangling_dependencies(&self) -> Vec<(&str, &str)> {
        let vertices = &self.vertices;
        vertices
            .iter()
            .flat_map(move |(name, unit)| {
                unit.dependencies()
                    .iter()
                    .filter(move |dependency| !vertices.contains_key(dependency.as_str()))
                    .map(move |dependency| (name.as_str(), dependency.as_str()))
            })
            .collect()
    }

    /// Snapshot of the graph as a `petgraph` directed graph.
    ///
    /// Edges go from dependent to dependency and carry the dependency's position in
    /// the dependent's list. Dangling dependencies are left out.
    pub fn to_graph(&self) -> DiGraph<&str, usize> {
        let mut graph = DiGraph::new();
        let indices: HashMap<&str, NodeIndex> =
            self.names().map(|name| (name, graph.add_node(name))).collect();

        for (name, unit) in &self.vertices {
            for (position, dependency) in unit.dependencies().iter().enumerate() {
                if let Some(&to) = indices.get(dependency.as_str()) {
                    let from = indices[name.as_str()];
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, position);
                    }
                }
            }
        }

        graph
    }

    /// Order of the whole graph where all dependencies come before their dependents.
    ///
    /// # Errors
    ///
    /// - Return [`DandelionError::CycleDetected`] if the graph contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<&BundleStorageUnit>> {
        // First check for cycles, to report them the same way as everywhere else
        self.detect_cycles()?;

        let graph = self.to_graph();
        match toposort(&graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .rev()
                .filter_map(|index| self.vertices.get(graph[index]))
                .collect()),
            Err(cycle) => Err(DandelionError::CycleDetected {
                vertex: graph[cycle.node_id()].to_string(),
                chain: graph[cycle.node_id()].to_string(),
            }),
        }
    }

    /// Render the graph in Graphviz dot format.
    pub fn to_dot(&self) -> String {
        let graph = self.to_graph();
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Build a human-readable dependency tree rooted at `root`.
    ///
    /// A bundle reachable through several paths is expanded once; later occurrences
    /// are marked `(*)`. Unknown dependencies are marked `(missing)`.
    pub fn to_tree_string(&self, root: &str) -> String {
        let mut result = String::new();
        let Some(unit) = self.vertex(root) else {
            return result;
        };

        let mut expanded = HashSet::new();
        result.push_str(&format!("{}\n", unit.name));
        expanded.insert(unit.name.as_str());

        // Entries are (name, prefix, is_last); children go on in reverse so they pop in order
        let mut pending: Vec<(&str, String, bool)> = Vec::new();
        push_tree_children(&mut pending, unit.dependencies(), "");

        while let Some((name, prefix, is_last)) = pending.pop() {
            let connector = if is_last {
                "└── "
            } else {
                "├── "
            };

            let Some(unit) = self.vertices.get(name) else {
                result.push_str(&format!("{prefix}{connector}{name} (missing)\n"));
                continue;
            };

            if !expanded.insert(unit.name.as_str()) {
                result.push_str(&format!("{prefix}{connector}{name} (*)\n"));
                continue;
            }

            result.push_str(&format!("{prefix}{connector}{name}\n"));

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            push_tree_children(&mut pending, unit.dependencies(), &child_prefix);
        }

        result
    }
}

fn push_tree_children<'a>(
    pending: &mut Vec<(&'a str, String, bool)>,
    dependencies: &'a [String],
    prefix: &str,
) {
    for (i, dependency) in dependencies.iter().enumerate().rev() {
        pending.push((dependency.as_str(), prefix.to_string(), i == dependencies.len() - 1));
    }
}
