//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so other engines
//! (contraction hierarchies, bidirectional search) can be swapped in without
//! touching the rest of the crate.  The default is [`AStarRouter`].
//!
//! # Cost units
//!
//! | Mode       | Edge cost                                  | Heuristic                 |
//! |------------|--------------------------------------------|---------------------------|
//! | `Distance` | segment length (km)                        | straight-line km to goal  |
//! | `Time`     | `length / (speed_limit + road_class)` (h)  | straight-line km / rate   |
//!
//! The time heuristic's `rate` is set by [`TimeHeuristic`].
//!
//! # Tie-breaking
//!
//! Frontier entries with equal `f = g + h` pop in order of lower `h` (the
//! entry closer to the goal), then lower `NodeId`.  Among several optimal
//! paths the one returned is therefore reproducible across runs.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rn_core::{CancelToken, CostMode, Location, NodeId, RoadId, SegmentId, TYPICAL_TRAVEL_RATE};

use crate::adjacency::Adjacency;
use crate::network::{RoadNetwork, Segment};
use crate::{GraphError, GraphResult};

// ── Request ───────────────────────────────────────────────────────────────────

/// One routing query.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub mode: CostMode,
    pub cancel: CancelToken,
}

impl PathRequest {
    pub fn new(start: NodeId, goal: NodeId, mode: CostMode) -> Self {
        Self { start, goal, mode, cancel: CancelToken::never() }
    }

    /// Attach a token that aborts the search with [`GraphError::Cancelled`].
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// A run of consecutive segments on roads of the same name.
///
/// A street is often split into several road records; `road` is the first
/// one the run entered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub road: RoadId,
    pub name: String,
    /// Physical length in km.
    pub length: f64,
}

/// The result of a routing query.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub mode: CostMode,
    /// `g(goal)` in the units of `mode`.
    pub total_cost: f64,
    /// Road legs from start to goal.
    pub legs: Vec<Leg>,
    /// Nodes visited, `start` first and `goal` last.
    pub nodes: Vec<NodeId>,
    /// Segments traversed, in order.
    pub segments: Vec<SegmentId>,
}

impl Route {
    fn trivial(node: NodeId, mode: CostMode) -> Self {
        Self { mode, total_cost: 0.0, legs: vec![], nodes: vec![node], segments: vec![] }
    }

    /// Physical length of the route in km, whatever the cost mode.
    pub fn length(&self) -> f64 {
        self.legs.iter().map(|leg| leg.length).sum()
    }

    /// `true` if the start and goal are the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`.  All per-search state lives inside
/// the call, so one router, network and adjacency can serve concurrent
/// requests.
pub trait Router: Send + Sync {
    /// Compute a route for `request`.
    ///
    /// `start == goal` is an empty route, not an error.  Unreachable goals
    /// yield [`GraphError::NoPathFound`].
    fn route(
        &self,
        network: &RoadNetwork,
        adjacency: &Adjacency,
        request: &PathRequest,
    ) -> GraphResult<Route>;
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Divisor used to turn straight-line distance into a time estimate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum TimeHeuristic {
    /// `max(83, fastest speed_limit + road_class in the network)`.
    ///
    /// Dividing by the fastest rate on the map never overestimates the
    /// remaining time, provided no segment is shorter than the straight line
    /// between its endpoints.
    #[default]
    Admissible,
    /// Always divide by the given rate (km/h).  `Fixed(83.0)` is the
    /// historical behaviour, which can overestimate on 200 km/h roads.
    Fixed(f64),
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct RouterConfig {
    pub time_heuristic: TimeHeuristic,
}

impl RouterConfig {
    pub fn validate(&self) -> GraphResult<()> {
        match self.time_heuristic {
            TimeHeuristic::Fixed(rate) if !(rate.is_finite() && rate > 0.0) => Err(
                GraphError::Config(format!("time heuristic rate must be positive, got {rate}")),
            ),
            _ => Ok(()),
        }
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first A* search over the outgoing view.
#[derive(Debug, Clone, Default)]
pub struct AStarRouter {
    config: RouterConfig,
}

impl AStarRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        adjacency: &Adjacency,
        request: &PathRequest,
    ) -> GraphResult<Route> {
        astar(network, adjacency, request, &self.config)
    }
}

/// Route with the default [`AStarRouter`].
pub fn find_path(
    network: &RoadNetwork,
    adjacency: &Adjacency,
    start: NodeId,
    goal: NodeId,
    mode: CostMode,
) -> GraphResult<Route> {
    AStarRouter::new().route(network, adjacency, &PathRequest::new(start, goal, mode))
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Frontier entry.  Ordered so that `BinaryHeap` (a max-heap) pops the
/// smallest `f`, then smallest `h`, then smallest `NodeId`.
#[derive(Copy, Clone, Debug)]
struct Frontier {
    f: f64,
    h: f64,
    g: f64,
    node: NodeId,
    slot: u32,
    /// Slot and segment this entry was reached through; `None` for the start.
    via: Option<(u32, SegmentId)>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Lower bound on the remaining cost from a location to the goal.
struct Heuristic {
    goal: Location,
    divisor: f64,
}

impl Heuristic {
    fn new(network: &RoadNetwork, goal: Location, mode: CostMode, config: &RouterConfig) -> Self {
        let divisor = match mode {
            CostMode::Distance => 1.0,
            CostMode::Time => match config.time_heuristic {
                TimeHeuristic::Fixed(rate) => rate,
                TimeHeuristic::Admissible => network
                    .fastest_travel_rate()
                    .map_or(TYPICAL_TRAVEL_RATE, |rate| rate.max(TYPICAL_TRAVEL_RATE)),
            },
        };
        Self { goal, divisor }
    }

    #[inline]
    fn estimate(&self, from: Location) -> f64 {
        from.distance(self.goal) / self.divisor
    }
}

#[inline]
fn edge_cost(network: &RoadNetwork, segment: &Segment, mode: CostMode) -> f64 {
    match mode {
        CostMode::Distance => segment.length,
        CostMode::Time => segment.length / network.road_of(segment).travel_rate(),
    }
}

fn astar(
    network: &RoadNetwork,
    adjacency: &Adjacency,
    request: &PathRequest,
    config: &RouterConfig,
) -> GraphResult<Route> {
    adjacency.ensure_current(network)?;
    let (start, goal, mode) = (request.start, request.goal, request.mode);
    let cancel = &request.cancel;
    let start_slot = network.slot_of(start).ok_or(GraphError::InvalidEndpoints(start))?;
    let goal_slot = network.slot_of(goal).ok_or(GraphError::InvalidEndpoints(goal))?;

    if start == goal {
        return Ok(Route::trivial(start, mode));
    }

    log::debug!("A* {start} -> {goal} by {mode}");

    let heuristic = Heuristic::new(network, network.node_at(goal_slot).location, mode, config);
    let n = network.node_count();

    // Per-search side tables, indexed by node slot.
    let mut settled  = vec![false; n];
    let mut best_g   = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<(u32, SegmentId)>> = vec![None; n];

    let h0 = heuristic.estimate(network.node_at(start_slot).location);
    best_g[start_slot] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { f: h0, h: h0, g: 0.0, node: start, slot: start_slot as u32, via: None });

    let mut settled_count = 0usize;

    while let Some(entry) = heap.pop() {
        if cancel.is_cancelled() {
            return Err(GraphError::Cancelled);
        }

        let slot = entry.slot as usize;
        if settled[slot] {
            continue;
        }
        settled[slot] = true;
        previous[slot] = entry.via;
        settled_count += 1;

        if slot == goal_slot {
            log::debug!("A* settled {settled_count} nodes, cost {}", entry.g);
            return Ok(reconstruct(network, &previous, start_slot, goal_slot, entry.g, mode));
        }

        for link in adjacency.outgoing_at(slot) {
            let next = link.slot as usize;
            if settled[next] {
                continue;
            }
            let g = entry.g + edge_cost(network, network.segment_at(link.segment), mode);
            if g < best_g[next] {
                best_g[next] = g;
                let h = heuristic.estimate(network.node_at(next).location);
                heap.push(Frontier {
                    f: g + h,
                    h,
                    g,
                    node: link.node,
                    slot: link.slot,
                    via: Some((entry.slot, link.segment)),
                });
            }
        }
    }

    log::debug!("A* exhausted frontier after {settled_count} nodes");
    Err(GraphError::NoPathFound { start, goal })
}

fn reconstruct(
    network: &RoadNetwork,
    previous: &[Option<(u32, SegmentId)>],
    start_slot: usize,
    goal_slot: usize,
    total_cost: f64,
    mode: CostMode,
) -> Route {
    let mut slots = vec![goal_slot];
    let mut segments = Vec::new();
    let mut cur = goal_slot;
    while cur != start_slot {
        let Some((prev, segment)) = previous[cur] else {
            break;
        };
        segments.push(segment);
        slots.push(prev as usize);
        cur = prev as usize;
    }
    slots.reverse();
    segments.reverse();

    let mut legs: Vec<Leg> = Vec::new();
    for &id in &segments {
        let segment = network.segment_at(id);
        let road = network.road_of(segment);
        match legs.last_mut() {
            Some(leg) if leg.name == road.name => leg.length += segment.length,
            _ => legs.push(Leg { road: road.id, name: road.name.clone(), length: segment.length }),
        }
    }

    Route {
        mode,
        total_cost,
        legs,
        nodes: slots.into_iter().map(|s| network.node_at(s).id).collect(),
        segments,
    }
}
