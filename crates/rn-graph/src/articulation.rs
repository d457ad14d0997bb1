//! Connected components and articulation points over the neighbor view.
//!
//! Both passes use explicit work lists instead of recursion: real road
//! networks produce DFS trees tens of thousands of nodes deep, which would
//! overflow the call stack.
//!
//! # Algorithm
//!
//! 1. Split the nodes into connected components with a breadth-first sweep.
//! 2. In each component, run a low-link DFS from the component's first node.
//!    A stack frame is `{node, depth, parent}`.  On first visit a node gets
//!    `depth`, `low = depth`, and a work-list of its neighbors minus the
//!    parent.  Each step pops one neighbor: an already visited one tightens
//!    `low`, an unvisited one is pushed at `depth + 1`.  When the work-list
//!    runs dry the frame is popped, `low` flows into the parent, and the
//!    parent is a cut vertex if `low >= parent.depth`.
//! 3. The root is a cut vertex iff it has more than one DFS child.

use std::collections::{BTreeSet, VecDeque};

use rn_core::{CancelToken, NodeId};

use crate::adjacency::Adjacency;
use crate::network::RoadNetwork;
use crate::{GraphError, GraphResult};

const UNVISITED: i32 = -1;

/// One DFS stack frame.
#[derive(Copy, Clone, Debug)]
struct Frame {
    slot: u32,
    depth: i32,
    parent: Option<u32>,
}

/// Per-run side table, indexed by node slot.
struct DfsState {
    depth:   Vec<i32>,
    low:     Vec<i32>,
    pending: Vec<Vec<u32>>,
}

impl DfsState {
    fn new(n: usize) -> Self {
        Self {
            depth:   vec![UNVISITED; n],
            low:     vec![0; n],
            pending: vec![Vec::new(); n],
        }
    }
}

/// Partition the network into connected components of the neighbor view.
///
/// Components are ordered by their earliest-added node; within a component
/// nodes appear in breadth-first order from that node.
pub fn connected_components(
    network: &RoadNetwork,
    adjacency: &Adjacency,
) -> GraphResult<Vec<Vec<NodeId>>> {
    adjacency.ensure_current(network)?;
    let components = component_slots(adjacency, &CancelToken::never())?;
    Ok(components
        .into_iter()
        .map(|c| c.into_iter().map(|s| network.node_at(s as usize).id).collect())
        .collect())
}

/// Every node whose removal would split its component.
pub fn find_articulation_points(
    network: &RoadNetwork,
    adjacency: &Adjacency,
) -> GraphResult<BTreeSet<NodeId>> {
    find_articulation_points_with(network, adjacency, &CancelToken::never())
}

/// Like [`find_articulation_points`], checking `cancel` on every stack pop.
pub fn find_articulation_points_with(
    network: &RoadNetwork,
    adjacency: &Adjacency,
    cancel: &CancelToken,
) -> GraphResult<BTreeSet<NodeId>> {
    adjacency.ensure_current(network)?;

    let components = component_slots(adjacency, cancel)?;
    let mut state = DfsState::new(adjacency.node_count());
    let mut points: BTreeSet<NodeId> = BTreeSet::new();

    for component in &components {
        let root = component[0];
        for slot in low_link_dfs(adjacency, &mut state, root, cancel)? {
            points.insert(network.node_at(slot as usize).id);
        }
    }

    log::info!(
        "found {} articulation points in {} components",
        points.len(),
        components.len()
    );
    Ok(points)
}

fn component_slots(adjacency: &Adjacency, cancel: &CancelToken) -> GraphResult<Vec<Vec<u32>>> {
    let n = adjacency.node_count();
    let mut assigned = vec![false; n];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for first in 0..n {
        if assigned[first] {
            continue;
        }
        assigned[first] = true;
        queue.push_back(first as u32);
        let mut component = Vec::new();

        while let Some(slot) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Err(GraphError::Cancelled);
            }
            component.push(slot);
            for link in adjacency.neighbors_at(slot as usize) {
                if !assigned[link.slot as usize] {
                    assigned[link.slot as usize] = true;
                    queue.push_back(link.slot);
                }
            }
        }
        components.push(component);
    }

    Ok(components)
}

/// Iterative low-link DFS from `root`; returns the cut vertices found,
/// possibly with repeats.
fn low_link_dfs(
    adjacency: &Adjacency,
    state: &mut DfsState,
    root: u32,
    cancel: &CancelToken,
) -> GraphResult<Vec<u32>> {
    let mut found = Vec::new();
    let mut root_children = 0u32;
    let mut stack = vec![Frame { slot: root, depth: 0, parent: None }];

    while let Some(&frame) = stack.last() {
        if cancel.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        let v = frame.slot as usize;

        if state.depth[v] == UNVISITED {
            state.depth[v] = frame.depth;
            state.low[v] = frame.depth;
            // Reversed so that `pop` yields neighbors in adjacency order.
            state.pending[v] = adjacency
                .neighbors_at(v)
                .iter()
                .rev()
                .filter(|link| Some(link.slot) != frame.parent)
                .map(|link| link.slot)
                .collect();
            continue;
        }

        if let Some(next) = state.pending[v].pop() {
            let w = next as usize;
            if state.depth[w] == UNVISITED {
                if frame.parent.is_none() {
                    root_children += 1;
                }
                stack.push(Frame { slot: next, depth: frame.depth + 1, parent: Some(frame.slot) });
            } else {
                state.low[v] = state.low[v].min(state.depth[w]);
            }
            continue;
        }

        stack.pop();
        match frame.parent {
            Some(parent) => {
                let p = parent as usize;
                state.low[p] = state.low[p].min(state.low[v]);
                if parent != root && state.low[v] >= state.depth[p] {
                    found.push(parent);
                }
            }
            None if root_children > 1 => found.push(root),
            None => {}
        }
    }

    Ok(found)
}
