//! Neighbor resolution: the two adjacency views the algorithms run on.
//!
//! | View        | Direction  | One-way roads                  | Used by       |
//! |-------------|------------|--------------------------------|---------------|
//! | *outgoing*  | directed   | only `start → end`             | routing       |
//! | *neighbors* | undirected | both ways                      | articulation  |
//!
//! Each view holds at most one [`Link`] per distinct adjacent node.  When
//! several segments join the same pair of nodes, the first one in the node's
//! incident-segment order backs the link.  Self-loops produce no link.
//!
//! Resolution is a pure function of the network, so an [`Adjacency`] is
//! valid for exactly the network generation it was resolved from.

use std::sync::Arc;

use rustc_hash::FxHashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rn_core::{NodeId, SegmentId};

use crate::network::RoadNetwork;
use crate::{GraphError, GraphResult};

/// One adjacency entry: the node on the other side and the segment that
/// connects to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub node: NodeId,
    pub segment: SegmentId,
    pub(crate) slot: u32,
}

/// Outgoing and neighbor views for every node of one network generation.
pub struct Adjacency {
    generation: u64,
    node_slot:  Arc<FxHashMap<NodeId, u32>>,
    outgoing:   Vec<Vec<Link>>,
    neighbors:  Vec<Vec<Link>>,
}

impl Adjacency {
    /// Derive both views from `network`.
    ///
    /// With the `parallel` feature each node is resolved on the Rayon pool;
    /// the output is identical either way.
    pub fn resolve(network: &RoadNetwork) -> Self {
        let n = network.node_count();

        #[cfg(feature = "parallel")]
        let (outgoing, neighbors): (Vec<_>, Vec<_>) =
            (0..n).into_par_iter().map(|slot| resolve_node(network, slot)).unzip();

        #[cfg(not(feature = "parallel"))]
        let (outgoing, neighbors): (Vec<_>, Vec<_>) =
            (0..n).map(|slot| resolve_node(network, slot)).unzip();

        log::debug!(
            "resolved adjacency for {} nodes (generation {})",
            n,
            network.generation()
        );

        Self {
            generation: network.generation(),
            node_slot: network.shared_slots(),
            outgoing,
            neighbors,
        }
    }

    /// Generation of the network this adjacency was resolved from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` if resolved from this exact network build.
    pub fn is_current_for(&self, network: &RoadNetwork) -> bool {
        self.generation == network.generation()
    }

    /// Fail with [`GraphError::StaleAdjacency`] unless resolved from `network`.
    pub fn ensure_current(&self, network: &RoadNetwork) -> GraphResult<()> {
        if self.is_current_for(network) {
            Ok(())
        } else {
            Err(GraphError::StaleAdjacency {
                resolved: self.generation,
                current:  network.generation(),
            })
        }
    }

    /// Nodes reachable from `node` in one step, respecting one-way roads.
    /// Empty for unknown nodes.
    pub fn outgoing(&self, node: NodeId) -> &[Link] {
        match self.node_slot.get(&node) {
            Some(&slot) => self.outgoing[slot as usize].as_slice(),
            None => &[],
        }
    }

    /// Nodes joined to `node` by any segment, in either direction.
    /// Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[Link] {
        match self.node_slot.get(&node) {
            Some(&slot) => self.neighbors[slot as usize].as_slice(),
            None => &[],
        }
    }

    /// Number of distinct nodes reachable from `node` in one step.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing(node).len()
    }

    /// Number of distinct nodes joined to `node`, ignoring direction.
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    #[inline]
    pub(crate) fn outgoing_at(&self, slot: usize) -> &[Link] {
        &self.outgoing[slot]
    }

    #[inline]
    pub(crate) fn neighbors_at(&self, slot: usize) -> &[Link] {
        &self.neighbors[slot]
    }

    pub(crate) fn node_count(&self) -> usize {
        self.neighbors.len()
    }
}

fn resolve_node(network: &RoadNetwork, slot: usize) -> (Vec<Link>, Vec<Link>) {
    let node = network.node_at(slot);
    let mut outgoing: Vec<Link> = Vec::with_capacity(node.segments.len());
    let mut neighbors: Vec<Link> = Vec::with_capacity(node.segments.len());

    for &segment_id in &node.segments {
        let segment = network.segment_at(segment_id);
        let Some((far_slot, forward)) = segment.far_end(slot as u32) else {
            continue;
        };
        let link = Link {
            node: network.node_at(far_slot as usize).id,
            segment: segment_id,
            slot: far_slot,
        };

        let permitted = forward || !network.road_of(segment).one_way;
        if permitted && !outgoing.iter().any(|l| l.slot == far_slot) {
            outgoing.push(link);
        }
        if !neighbors.iter().any(|l| l.slot == far_slot) {
            neighbors.push(link);
        }
    }

    (outgoing, neighbors)
}
