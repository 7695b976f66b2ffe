//! Per-batch dependency graph and topological resolution.
//!
//! Nodes are stored in an arena indexed by [`NodeHandle`]; node `i` is the
//! `i`-th request of the batch. A separate name → handles multimap lets a
//! dependency on a tool *name* fan out to every request of that tool.
//!
//! Edges point from a dependent node to each node it depends on. A dependency
//! whose tool name is not part of the batch gets no edge at all.

use crate::core::error::DomainError;
use crate::invocation::InvocationRequest;
use crate::tool::traits::ToolLookup;
use std::collections::{HashMap, VecDeque};

/// Index of a node in a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Position of the node's request in the batch.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Dependency graph scoped to the tools present in one batch.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    tool_names: Vec<String>,
    by_name: HashMap<String, Vec<NodeHandle>>,
    dependencies: Vec<Vec<NodeHandle>>,
    dependents: Vec<Vec<NodeHandle>>,
}

impl DependencyGraph {
    /// Build the graph for `batch`.
    ///
    /// Fails with [`DomainError::ToolNotFound`] for the first request whose
    /// tool is not registered, before any ordering work happens.
    pub fn build<L: ToolLookup + ?Sized>(
        batch: &[InvocationRequest],
        lookup: &L,
    ) -> Result<Self, DomainError> {
        let mut by_name: HashMap<String, Vec<NodeHandle>> = HashMap::new();
        for (index, request) in batch.iter().enumerate() {
            by_name
                .entry(request.tool_name.clone())
                .or_default()
                .push(NodeHandle(index));
        }

        // One registry lookup per distinct tool name
        let mut declared: HashMap<&str, Vec<String>> = HashMap::new();
        for request in batch {
            let name = request.tool_name.as_str();
            if declared.contains_key(name) {
                continue;
            }
            let dependencies = lookup
                .dependencies_of(name)
                .ok_or_else(|| DomainError::ToolNotFound(name.to_string()))?;
            declared.insert(name, dependencies);
        }

        let mut dependencies: Vec<Vec<NodeHandle>> = vec![Vec::new(); batch.len()];
        let mut dependents: Vec<Vec<NodeHandle>> = vec![Vec::new(); batch.len()];

        for (index, request) in batch.iter().enumerate() {
            let names = declared
                .get(request.tool_name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();

            for dependency_name in names {
                let Some(targets) = by_name.get(dependency_name) else {
                    continue;
                };
                for &target in targets {
                    if !dependencies[index].contains(&target) {
                        dependencies[index].push(target);
                        dependents[target.0].push(NodeHandle(index));
                    }
                }
            }
        }

        Ok(Self {
            tool_names: batch.iter().map(|r| r.tool_name.clone()).collect(),
            by_name,
            dependencies,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.tool_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tool_names.is_empty()
    }

    pub fn tool_name(&self, node: NodeHandle) -> &str {
        &self.tool_names[node.0]
    }

    /// Nodes requested under `tool_name`, in batch order.
    pub fn handles_for(&self, tool_name: &str) -> &[NodeHandle] {
        self.by_name
            .get(tool_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Nodes that `node` depends on.
    pub fn dependencies_of(&self, node: NodeHandle) -> &[NodeHandle] {
        &self.dependencies[node.0]
    }

    /// Nodes that depend on `node`.
    pub fn dependents_of(&self, node: NodeHandle) -> &[NodeHandle] {
        &self.dependents[node.0]
    }

    /// Number of distinct dependency edges leaving `node`.
    pub fn in_degree(&self, node: NodeHandle) -> usize {
        self.dependencies[node.0].len()
    }

    /// Kahn's algorithm over a FIFO queue.
    ///
    /// The queue is seeded with the ready nodes in batch order and nodes freed
    /// later are appended at the back, so the order is a pure function of the
    /// batch.
    pub fn topological_order(&self) -> Result<Vec<NodeHandle>, DomainError> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: VecDeque<NodeHandle> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| NodeHandle(index))
            .collect();

        let mut processed = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());

        while let Some(node) = ready.pop_front() {
            processed[node.0] = true;
            order.push(node);
            for &dependent in &self.dependents[node.0] {
                in_degree[dependent.0] -= 1;
                if in_degree[dependent.0] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() < self.len() {
            let path = match self.find_cycle(&processed) {
                Some(cycle) => self.format_path(&cycle),
                None => self.format_path(
                    &(0..self.len())
                        .filter(|&i| !processed[i])
                        .map(NodeHandle)
                        .collect::<Vec<_>>(),
                ),
            };
            return Err(DomainError::CircularDependency { path });
        }

        Ok(order)
    }

    /// Locate one concrete cycle among unprocessed nodes.
    ///
    /// Iterative DFS with an explicit on-stack set. The returned path starts
    /// and ends with the node where the back-edge closes.
    fn find_cycle(&self, processed: &[bool]) -> Option<Vec<NodeHandle>> {
        let mut visited = vec![false; self.len()];
        let mut on_stack = vec![false; self.len()];

        for start in (0..self.len()).filter(|&i| !processed[i]) {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            on_stack[start] = true;
            // (node, index of the next outgoing edge to follow)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(next) = self.dependencies[node].get(frame.1).copied() else {
                    on_stack[node] = false;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let next = next.0;
                if processed[next] {
                    continue;
                }
                if on_stack[next] {
                    let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let mut cycle: Vec<NodeHandle> =
                        stack[from..].iter().map(|(n, _)| NodeHandle(*n)).collect();
                    cycle.push(NodeHandle(next));
                    return Some(cycle);
                }
                if !visited[next] {
                    visited[next] = true;
                    on_stack[next] = true;
                    stack.push((next, 0));
                }
            }
        }

        None
    }

    fn format_path(&self, nodes: &[NodeHandle]) -> String {
        nodes
            .iter()
            .map(|&n| self.tool_name(n))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Resolve a deterministic execution order for `batch`.
///
/// Returns the requests reordered so that every request comes after all
/// requests of the tools it depends on. An empty batch resolves to an empty
/// order.
pub fn resolve_order<L: ToolLookup + ?Sized>(
    batch: &[InvocationRequest],
    lookup: &L,
) -> Result<Vec<InvocationRequest>, DomainError> {
    let graph = DependencyGraph::build(batch, lookup)?;
    let order = graph.topological_order()?;
    Ok(order.into_iter().map(|n| batch[n.0].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::InvocationId;
    use crate::tool::entities::{HttpMethod, ToolCatalog, ToolDescriptor};

    fn tool(name: &str, deps: &[&str]) -> ToolDescriptor {
        deps.iter().fold(
            ToolDescriptor::new(name, format!("http://tools/{}", name), HttpMethod::Get),
            |t, d| t.depends_on(*d),
        )
    }

    fn catalog(tools: &[(&str, &[&str])]) -> ToolCatalog {
        tools
            .iter()
            .fold(ToolCatalog::new(), |c, (name, deps)| c.register(tool(name, deps)))
    }

    fn names(order: &[InvocationRequest]) -> Vec<&str> {
        order.iter().map(|r| r.tool_name.as_str()).collect()
    }

    fn position(order: &[InvocationRequest], id: &InvocationId) -> usize {
        order.iter().position(|r| &r.id == id).unwrap()
    }

    #[test]
    fn test_empty_batch() {
        let order = resolve_order(&[], &ToolCatalog::new()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_dependency_runs_first() {
        let catalog = catalog(&[("search", &[]), ("add_to_order", &["search"])]);
        let batch = vec![
            InvocationRequest::new("add_to_order"),
            InvocationRequest::new("search").with_param("keyword", "x"),
        ];

        let order = resolve_order(&batch, &catalog).unwrap();
        assert_eq!(names(&order), vec!["search", "add_to_order"]);
    }

    #[test]
    fn test_every_edge_respected_in_diamond() {
        let catalog = catalog(&[
            ("fetch", &[]),
            ("parse", &["fetch"]),
            ("index", &["fetch"]),
            ("report", &["parse", "index"]),
        ]);
        let batch = vec![
            InvocationRequest::new("report"),
            InvocationRequest::new("index"),
            InvocationRequest::new("parse"),
            InvocationRequest::new("fetch"),
        ];

        let order = resolve_order(&batch, &catalog).unwrap();
        for request in &batch {
            for dep in catalog.get(&request.tool_name).unwrap().depends_on.iter() {
                for dep_request in batch.iter().filter(|r| &r.tool_name == dep) {
                    assert!(
                        position(&order, &dep_request.id) < position(&order, &request.id),
                        "{} must precede {}",
                        dep,
                        request.tool_name
                    );
                }
            }
        }
        assert_eq!(names(&order), vec!["fetch", "index", "parse", "report"]);
    }

    #[test]
    fn test_freed_nodes_queue_behind_initially_ready_ones() {
        let catalog = catalog(&[("a", &[]), ("b", &[]), ("c", &["a"])]);
        let batch = vec![
            InvocationRequest::new("a"),
            InvocationRequest::new("c"),
            InvocationRequest::new("b"),
        ];

        // "a" and "b" are queued up front; "c" joins the back once "a" is done
        let order = resolve_order(&batch, &catalog).unwrap();
        assert_eq!(names(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_independent_requests_keep_batch_order() {
        let catalog = catalog(&[("x", &[]), ("y", &[]), ("z", &[])]);
        let batch = vec![
            InvocationRequest::new("z"),
            InvocationRequest::new("x"),
            InvocationRequest::new("y"),
        ];
        let order = resolve_order(&batch, &catalog).unwrap();
        assert_eq!(names(&order), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let catalog = catalog(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["b", "c"]),
            ("e", &[]),
        ]);
        let batch = vec![
            InvocationRequest::new("d"),
            InvocationRequest::new("e"),
            InvocationRequest::new("c"),
            InvocationRequest::new("b"),
            InvocationRequest::new("a"),
        ];

        let first: Vec<InvocationId> = resolve_order(&batch, &catalog)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let second: Vec<InvocationId> = resolve_order(&batch, &catalog)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dependency_on_name_waits_for_all_instances() {
        let catalog = catalog(&[("a", &[]), ("b", &["a"])]);
        let b = InvocationRequest::new("b");
        let a1 = InvocationRequest::new("a").with_param("n", 1);
        let a2 = InvocationRequest::new("a").with_param("n", 2);
        let batch = vec![b.clone(), a1.clone(), a2.clone()];

        let graph = DependencyGraph::build(&batch, &catalog).unwrap();
        // The edge fans out to every request named "a"
        assert_eq!(graph.in_degree(NodeHandle(0)), 2);
        assert_eq!(graph.handles_for("a"), &[NodeHandle(1), NodeHandle(2)]);

        let order = resolve_order(&batch, &catalog).unwrap();
        assert!(position(&order, &a1.id) < position(&order, &b.id));
        assert!(position(&order, &a2.id) < position(&order, &b.id));
        assert_eq!(position(&order, &b.id), 2);
    }

    #[test]
    fn test_single_remaining_instance_still_satisfies_dependency() {
        let catalog = catalog(&[("a", &[]), ("b", &["a"])]);
        let a2 = InvocationRequest::new("a").with_param("n", 2);
        let b = InvocationRequest::new("b");
        let batch = vec![b.clone(), a2.clone()];

        let order = resolve_order(&batch, &catalog).unwrap();
        assert_eq!(order[0].id, a2.id);
        assert_eq!(order[1].id, b.id);
    }

    #[test]
    fn test_dependency_outside_batch_is_ignored() {
        let catalog = catalog(&[("search", &[]), ("add_to_order", &["search"])]);
        let batch = vec![InvocationRequest::new("add_to_order")];

        let graph = DependencyGraph::build(&batch, &catalog).unwrap();
        assert_eq!(graph.in_degree(NodeHandle(0)), 0);
        assert!(graph.handles_for("search").is_empty());

        let order = resolve_order(&batch, &catalog).unwrap();
        assert_eq!(names(&order), vec!["add_to_order"]);
    }

    #[test]
    fn test_duplicate_declarations_count_once() {
        let catalog = catalog(&[("a", &[]), ("b", &["a", "a"])]);
        let batch = vec![InvocationRequest::new("a"), InvocationRequest::new("b")];
        let graph = DependencyGraph::build(&batch, &catalog).unwrap();
        assert_eq!(graph.in_degree(NodeHandle(1)), 1);
        assert_eq!(graph.dependents_of(NodeHandle(0)), &[NodeHandle(1)]);
    }

    #[test]
    fn test_two_node_cycle() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["a"])]);
        let batch = vec![InvocationRequest::new("a"), InvocationRequest::new("b")];

        let err = resolve_order(&batch, &catalog).unwrap_err();
        assert_eq!(
            err,
            DomainError::CircularDependency {
                path: "a -> b -> a".to_string()
            }
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let catalog = catalog(&[("loop", &["loop"])]);
        let batch = vec![InvocationRequest::new("loop")];

        let err = resolve_order(&batch, &catalog).unwrap_err();
        assert_eq!(err.cycle_path(), Some("loop -> loop"));
    }

    #[test]
    fn test_cycle_path_excludes_nodes_hanging_off_the_cycle() {
        let catalog = catalog(&[
            ("entry", &["a"]),
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["a"]),
            ("free", &[]),
        ]);
        let batch = vec![
            InvocationRequest::new("free"),
            InvocationRequest::new("entry"),
            InvocationRequest::new("a"),
            InvocationRequest::new("b"),
            InvocationRequest::new("c"),
        ];

        let err = resolve_order(&batch, &catalog).unwrap_err();
        assert_eq!(err.cycle_path(), Some("a -> b -> c -> a"));
    }

    #[test]
    fn test_unknown_tool_is_reported_before_cycles() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["a"])]);
        let batch = vec![
            InvocationRequest::new("a"),
            InvocationRequest::new("b"),
            InvocationRequest::new("ghost"),
        ];

        let err = resolve_order(&batch, &catalog).unwrap_err();
        assert_eq!(err, DomainError::ToolNotFound("ghost".to_string()));
    }
}
