//! Formation topology: which agents see each other, and where each one
//! should sit relative to the others.
//!
//! Nodes carry the agent's reference offset. Node index `i` is agent `i`;
//! agent 0 is the leader.

use petgraph::algo::connected_components;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FORMATION_EDGES, DEFAULT_FORMATION_REFERENCE};
use crate::error::{FormationError, Result};
use crate::types::Vec2;

/// Serializable description of a formation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormationLayout {
    /// Reference offset per agent
    pub reference: Vec<Vec2>,
    /// Undirected communication edges
    pub edges: Vec<[usize; 2]>,
}

impl FormationLayout {
    /// Three agents on a triangle, every pair connected.
    pub fn triangle() -> Self {
        Self {
            reference: DEFAULT_FORMATION_REFERENCE.iter().map(|r| Vec2::from(*r)).collect(),
            edges: DEFAULT_FORMATION_EDGES.to_vec(),
        }
    }

    pub fn num_agents(&self) -> usize {
        self.reference.len()
    }
}

impl Default for FormationLayout {
    fn default() -> Self {
        Self::triangle()
    }
}

/// Static undirected formation graph.
#[derive(Clone, Debug)]
pub struct FormationGraph {
    graph: Graph<Vec2, (), Undirected>,
}

impl FormationGraph {
    /// Build the graph, rejecting out-of-range indices, self loops and
    /// disconnected topologies. Repeated edges collapse into one.
    pub fn new(layout: &FormationLayout) -> Result<Self> {
        if layout.reference.is_empty() {
            return Err(FormationError::invalid_config(
                "formation.reference",
                "formation needs at least one agent",
            ));
        }
        if let Some(r) = layout.reference.iter().find(|r| !r.is_finite()) {
            return Err(FormationError::invalid_config(
                "formation.reference",
                format!("non-finite offset {:?}", r.as_array()),
            ));
        }

        let mut graph = Graph::new_undirected();
        let nodes: Vec<NodeIndex> = layout.reference.iter().map(|r| graph.add_node(*r)).collect();

        for &[a, b] in &layout.edges {
            if a >= nodes.len() || b >= nodes.len() {
                return Err(FormationError::invalid_config(
                    "formation.edges",
                    format!("edge ({a}, {b}) references an agent outside 0..{}", nodes.len()),
                ));
            }
            if a == b {
                return Err(FormationError::invalid_config(
                    "formation.edges",
                    format!("self loop on agent {a}"),
                ));
            }
            graph.update_edge(nodes[a], nodes[b], ());
        }

        if connected_components(&graph) != 1 {
            return Err(FormationError::invalid_config(
                "formation.edges",
                "formation graph must be connected",
            ));
        }

        Ok(Self { graph })
    }

    /// The default triangle; skips the checks it is known to pass.
    pub fn triangle() -> Self {
        let layout = FormationLayout::triangle();
        let mut graph = Graph::new_undirected();
        let nodes: Vec<NodeIndex> = layout.reference.iter().map(|r| graph.add_node(*r)).collect();
        for &[a, b] in &layout.edges {
            graph.add_edge(nodes[a], nodes[b], ());
        }
        Self { graph }
    }

    #[inline]
    pub fn num_agents(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Reference offset of agent `i`.
    #[inline]
    pub fn reference(&self, i: usize) -> Vec2 {
        self.graph[NodeIndex::new(i)]
    }

    /// Neighbor indices of agent `i`.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.neighbors(NodeIndex::new(i)).map(|n| n.index())
    }

    /// Each undirected edge once, as `(a, b)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index()))
    }
}

impl Default for FormationGraph {
    fn default() -> Self {
        Self::triangle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_has_every_pair_connected() {
        let g = FormationGraph::triangle();
        assert_eq!(g.num_agents(), 3);
        assert_eq!(g.num_edges(), 3);
        for i in 0..3 {
            let mut n: Vec<usize> = g.neighbors(i).collect();
            n.sort_unstable();
            let expected: Vec<usize> = (0..3).filter(|j| *j != i).collect();
            assert_eq!(n, expected);
        }
    }

    #[test]
    fn repeated_edges_collapse() {
        let layout = FormationLayout {
            reference: vec![Vec2::zero(), Vec2::new(1.0, 0.0)],
            edges: vec![[0, 1], [1, 0], [0, 1]],
        };
        let g = FormationGraph::new(&layout).unwrap();
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn rejects_out_of_range_edge() {
        let layout = FormationLayout {
            reference: vec![Vec2::zero(), Vec2::new(1.0, 0.0)],
            edges: vec![[0, 2]],
        };
        assert!(matches!(
            FormationGraph::new(&layout),
            Err(FormationError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_disconnected_graph() {
        let layout = FormationLayout {
            reference: vec![Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
            edges: vec![[0, 1]],
        };
        assert!(FormationGraph::new(&layout).is_err());
    }

    #[test]
    fn single_agent_needs_no_edges() {
        let layout = FormationLayout {
            reference: vec![Vec2::zero()],
            edges: vec![],
        };
        let g = FormationGraph::new(&layout).unwrap();
        assert_eq!(g.neighbors(0).count(), 0);
    }
}
