//! Growth Graph - the append-only tree of organs a plant is made of.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{GraphError, Result};
use crate::organs::{OrganId, OrganKind, OrganNode};

/// Seed size used when the caller does not pick one.
pub const DEFAULT_SEED_SIZE: u32 = 10;

/// Directed tree of organs, rooted at the seed with id 0.
///
/// Nodes and edges are only ever added. The growth rules only add edges from
/// an existing organ to a newer one, so a grown plant stays a tree with a
/// single root.
#[derive(Debug, Clone)]
pub struct GrowthGraph {
    /// Id handed to the next created organ.
    next_id: OrganId,

    /// All organs by id.
    nodes: BTreeMap<OrganId, OrganNode>,

    /// Children of each organ in edge-insertion order.
    successors: BTreeMap<OrganId, Vec<OrganId>>,
}

/// Flat, serializable form of a [`GrowthGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Organs in ascending id order.
    pub nodes: Vec<OrganNode>,

    /// `(parent, child)` pairs, grouped by parent in edge-insertion order.
    pub edges: Vec<(OrganId, OrganId)>,
}

impl Default for GrowthGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowthGraph {
    /// Create a graph holding a single seed of [`DEFAULT_SEED_SIZE`].
    pub fn new() -> Self {
        Self::with_seed_size(DEFAULT_SEED_SIZE)
    }

    /// Create a graph holding a single seed of the given size.
    pub fn with_seed_size(seed_size: u32) -> Self {
        let mut graph = Self {
            next_id: OrganId::ROOT,
            nodes: BTreeMap::new(),
            successors: BTreeMap::new(),
        };
        graph.create_node(OrganKind::Seed, seed_size, None);
        graph
    }

    /// Allocate the next id and store a new organ under it.
    pub fn create_node(&mut self, kind: OrganKind, size: u32, angle: Option<i32>) -> OrganId {
        let id = self.next_id;
        self.next_id = id.next();
        self.nodes.insert(id, OrganNode::new(id, kind, size, angle));
        id
    }

    /// Record a directed edge from `parent` to `child`.
    pub fn create_edge(&mut self, parent: OrganId, child: OrganId) -> Result<()> {
        self.ensure(parent)?;
        self.ensure(child)?;
        self.successors.entry(parent).or_default().push(child);
        Ok(())
    }

    /// Get an organ by id.
    pub fn node(&self, id: OrganId) -> Result<&OrganNode> {
        self.nodes.get(&id).ok_or(GraphError::UnknownNode(id))
    }

    /// Get a mutable organ by id.
    pub fn node_mut(&mut self, id: OrganId) -> Result<&mut OrganNode> {
        self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))
    }

    /// Check if an organ exists.
    pub fn contains(&self, id: OrganId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The seed the graph was created with.
    pub fn root(&self) -> &OrganNode {
        &self.nodes[&OrganId::ROOT]
    }

    /// Children of an organ, in the order their edges were created.
    pub fn successors(&self, id: OrganId) -> Result<&[OrganId]> {
        self.ensure(id)?;
        Ok(self
            .successors
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]))
    }

    /// Whether an organ has already grown children.
    pub fn has_successors(&self, id: OrganId) -> Result<bool> {
        Ok(!self.successors(id)?.is_empty())
    }

    /// Number of organs in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot of every organ, sorted by ascending id.
    pub fn ordered_nodes(&self) -> Vec<OrganNode> {
        self.nodes.values().cloned().collect()
    }

    /// Depth-first pre-order walk from the root, children in edge order.
    ///
    /// Each organ appears once, even if repeated or backward edges were
    /// added through [`create_edge`](Self::create_edge). The result is a
    /// snapshot: organs created after the call are not in it.
    pub fn preorder_ids(&self) -> Vec<OrganId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![OrganId::ROOT];

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(children) = self.successors.get(&id) {
                stack.extend(children.iter().rev().copied());
            }
        }

        order
    }

    /// Fold over the organs in [`preorder_ids`](Self::preorder_ids) order.
    pub fn reduce<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &OrganNode) -> B,
    {
        self.preorder_ids()
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .fold(init, |acc, node| f(acc, node))
    }

    /// Export the graph as a flat snapshot.
    pub fn snapshot(&self) -> GraphSnapshot {
        let edges = self
            .successors
            .iter()
            .flat_map(|(parent, children)| children.iter().map(move |child| (*parent, *child)))
            .collect();

        GraphSnapshot {
            nodes: self.ordered_nodes(),
            edges,
        }
    }

    /// Rebuild a graph from a snapshot, checking that it is a tree rooted at id 0.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut nodes = BTreeMap::new();
        for node in snapshot.nodes {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(GraphError::invalid_snapshot(format!("duplicate node {id}")));
            }
        }

        if !nodes.contains_key(&OrganId::ROOT) {
            return Err(GraphError::invalid_snapshot("missing root node 0"));
        }

        let mut successors: BTreeMap<OrganId, Vec<OrganId>> = BTreeMap::new();
        let mut has_parent = HashSet::new();
        for (parent, child) in snapshot.edges {
            for id in [parent, child] {
                if !nodes.contains_key(&id) {
                    return Err(GraphError::UnknownNode(id));
                }
            }
            if child == OrganId::ROOT {
                return Err(GraphError::invalid_snapshot("root node 0 has a parent"));
            }
            if !has_parent.insert(child) {
                return Err(GraphError::invalid_snapshot(format!(
                    "node {child} has more than one parent"
                )));
            }
            successors.entry(parent).or_default().push(child);
        }

        let next_id = nodes
            .keys()
            .next_back()
            .map(|id| id.next())
            .unwrap_or(OrganId::ROOT);

        let graph = Self {
            next_id,
            nodes,
            successors,
        };

        // One parent per non-root node plus full reachability rules out cycles.
        if graph.preorder_ids().len() != graph.len() {
            return Err(GraphError::invalid_snapshot(
                "not every node is reachable from the root",
            ));
        }

        Ok(graph)
    }

    /// Serialize the graph snapshot as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Load a graph from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    fn ensure(&self, id: OrganId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Seed with a stem and a taproot, the stem carrying one more stem.
    fn small_plant() -> GrowthGraph {
        let mut graph = GrowthGraph::new();
        let stem = graph.create_node(OrganKind::Stem, 1, Some(0));
        let root = graph.create_node(OrganKind::Taproot, 1, Some(180));
        let tip = graph.create_node(OrganKind::Stem, 1, Some(30));
        graph.create_edge(OrganId::ROOT, stem).unwrap();
        graph.create_edge(OrganId::ROOT, root).unwrap();
        graph.create_edge(stem, tip).unwrap();
        graph
    }

    #[test]
    fn test_new_graph_holds_default_seed() {
        let graph = GrowthGraph::new();

        assert_eq!(graph.len(), 1);
        assert_eq!(
            serde_json::to_value(graph.ordered_nodes()).unwrap(),
            json!([{ "id": 0, "kind": "seed", "size": 10 }])
        );
        assert_eq!(graph.root().kind, OrganKind::Seed);
    }

    #[test]
    fn test_ids_increase_from_zero() {
        let mut graph = GrowthGraph::with_seed_size(3);
        let a = graph.create_node(OrganKind::SideRoot, 0, Some(-45));
        let b = graph.create_node(OrganKind::Stem, 5, Some(0));

        assert_eq!(a, OrganId(1));
        assert_eq!(b, OrganId(2));
        assert_eq!(graph.root().size, 3);
    }

    #[test]
    fn test_create_edge_rejects_unknown_nodes() {
        let mut graph = GrowthGraph::new();

        let err = graph.create_edge(OrganId::ROOT, OrganId(9)).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode(OrganId(9))));

        let err = graph.create_edge(OrganId(4), OrganId::ROOT).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode(OrganId(4))));
    }

    #[test]
    fn test_node_lookup_errors() {
        let mut graph = GrowthGraph::new();

        assert!(matches!(graph.node(OrganId(1)), Err(GraphError::UnknownNode(_))));
        assert!(matches!(graph.node_mut(OrganId(1)), Err(GraphError::UnknownNode(_))));
        assert!(matches!(graph.successors(OrganId(1)), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn test_successors_keep_insertion_order() {
        let mut graph = GrowthGraph::new();
        let late = graph.create_node(OrganKind::Stem, 1, Some(0));
        let early = graph.create_node(OrganKind::Stem, 1, Some(0));
        graph.create_edge(OrganId::ROOT, early).unwrap();
        graph.create_edge(OrganId::ROOT, late).unwrap();

        assert_eq!(graph.successors(OrganId::ROOT).unwrap(), &[early, late]);
        assert!(graph.successors(late).unwrap().is_empty());
        assert!(!graph.has_successors(late).unwrap());
    }

    #[test]
    fn test_preorder_walks_depth_first() {
        let graph = small_plant();

        assert_eq!(
            graph.preorder_ids(),
            vec![OrganId(0), OrganId(1), OrganId(3), OrganId(2)]
        );
    }

    #[test]
    fn test_preorder_lists_repeated_child_once() {
        let mut graph = GrowthGraph::new();
        let stem = graph.create_node(OrganKind::Stem, 1, Some(0));
        graph.create_edge(OrganId::ROOT, stem).unwrap();
        graph.create_edge(OrganId::ROOT, stem).unwrap();

        assert_eq!(graph.successors(OrganId::ROOT).unwrap(), &[stem, stem]);
        assert_eq!(graph.preorder_ids(), vec![OrganId::ROOT, stem]);
    }

    #[test]
    fn test_preorder_stops_at_back_edge() {
        let mut graph = small_plant();
        graph.create_edge(OrganId(3), OrganId::ROOT).unwrap();
        graph.create_edge(OrganId(3), OrganId(1)).unwrap();

        assert_eq!(
            graph.preorder_ids(),
            vec![OrganId(0), OrganId(1), OrganId(3), OrganId(2)]
        );
        assert_eq!(graph.reduce(0, |acc, _| acc + 1), 4);
    }

    #[test]
    fn test_ordered_nodes_sorted_by_id() {
        let graph = small_plant();
        let ids: Vec<_> = graph.ordered_nodes().iter().map(|n| n.id).collect();

        assert_eq!(ids, vec![OrganId(0), OrganId(1), OrganId(2), OrganId(3)]);
    }

    #[test]
    fn test_reduce_follows_preorder() {
        let graph = small_plant();

        let visited = graph.reduce(Vec::new(), |mut acc, node| {
            acc.push(node.id.0);
            acc
        });
        assert_eq!(visited, vec![0, 1, 3, 2]);

        let total = graph.reduce(0, |acc, node| acc + node.size);
        assert_eq!(total, 13);
    }

    #[test]
    fn test_snapshot_json_restores_graph() {
        let graph = small_plant();
        let restored = GrowthGraph::from_json(&graph.to_json().unwrap()).unwrap();

        assert_eq!(restored.ordered_nodes(), graph.ordered_nodes());
        assert_eq!(restored.preorder_ids(), graph.preorder_ids());

        let mut restored = restored;
        assert_eq!(restored.create_node(OrganKind::Stem, 1, Some(0)), OrganId(4));
    }

    #[test]
    fn test_snapshot_rejects_second_parent() {
        let snapshot = json!({
            "nodes": [
                { "id": 0, "kind": "germinated", "size": 0 },
                { "id": 1, "kind": "stem", "size": 1, "angle": 0 },
                { "id": 2, "kind": "stem", "size": 1, "angle": 30 }
            ],
            "edges": [[0, 1], [0, 2], [1, 2]]
        });

        let err = GrowthGraph::from_json(&snapshot.to_string()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_snapshot_rejects_detached_cycle() {
        let snapshot = json!({
            "nodes": [
                { "id": 0, "kind": "seed", "size": 10 },
                { "id": 1, "kind": "stem", "size": 1, "angle": 0 },
                { "id": 2, "kind": "stem", "size": 1, "angle": 0 }
            ],
            "edges": [[1, 2], [2, 1]]
        });

        let err = GrowthGraph::from_json(&snapshot.to_string()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_snapshot_requires_root_and_known_endpoints() {
        let no_root = json!({
            "nodes": [{ "id": 1, "kind": "stem", "size": 1, "angle": 0 }],
            "edges": []
        });
        assert!(matches!(
            GrowthGraph::from_json(&no_root.to_string()),
            Err(GraphError::InvalidSnapshot(_))
        ));

        let dangling = json!({
            "nodes": [{ "id": 0, "kind": "seed", "size": 10 }],
            "edges": [[0, 5]]
        });
        assert!(matches!(
            GrowthGraph::from_json(&dangling.to_string()),
            Err(GraphError::UnknownNode(OrganId(5)))
        ));

        assert!(matches!(
            GrowthGraph::from_json("not json"),
            Err(GraphError::Json(_))
        ));
    }
}
