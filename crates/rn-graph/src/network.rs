//! Road network representation and builder.
//!
//! # Data layout
//!
//! Nodes, roads and segments live in three `Vec`s.  Nodes and roads keep the
//! (sparse) identifiers from the source data; a hash map translates them to
//! dense *slots*, which is what the algorithms index their side tables by.
//! Segments are dense from the start: `SegmentId(i)` is `segments[i]`.
//!
//! ```text
//! node_slot[NodeId] ──► nodes[slot].segments ──► segments[SegmentId]
//!                                                     │
//!                                  roads[road_slot] ◄──┘
//! ```
//!
//! # Generations
//!
//! Every [`RoadNetworkBuilder::build`] stamps the network with a fresh,
//! process-unique generation.  Derived data (see
//! [`Adjacency`](crate::Adjacency)) records the generation it came from so
//! that stale views are rejected instead of silently reused.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a planar [`Location`] to the nearest node,
//! standing in for "which intersection did the user click on".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use rn_core::{speed_limit_for_code, Location, NodeId, RoadId, SegmentId, SPEED_LIMITS};

use crate::{GraphError, GraphResult};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a planar `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// An intersection.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub location: Location,
    /// Incident segments, in the order they were added to the builder.
    /// A self-loop appears once.
    pub segments: Vec<SegmentId>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// Road attributes as supplied to [`RoadNetworkBuilder::add_road`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoadInfo {
    pub id: RoadId,
    pub name: String,
    pub city: String,
    pub one_way: bool,
    /// Category `0..=4`; added to the speed limit when costing by time.
    pub road_class: u8,
    /// Speed-limit code `0..=7`, see [`SPEED_LIMITS`].
    pub speed_code: u8,
}

impl RoadInfo {
    /// Two-way road with speed code 4 (80 km/h) and class 0.
    pub fn new(id: RoadId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            city: String::new(),
            one_way: false,
            road_class: 0,
            speed_code: 4,
        }
    }

    pub fn one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn speed_code(mut self, code: u8) -> Self {
        self.speed_code = code;
        self
    }

    pub fn road_class(mut self, class: u8) -> Self {
        self.road_class = class;
        self
    }
}

/// A named aggregate of segments sharing one-way, speed and class attributes.
#[derive(Debug, Clone)]
pub struct Road {
    pub id: RoadId,
    pub name: String,
    pub city: String,
    pub one_way: bool,
    pub road_class: u8,
    pub speed_code: u8,
    pub segments: Vec<SegmentId>,
}

impl Road {
    /// Speed limit in km/h.  The code is validated when the road is added.
    #[inline]
    pub fn speed_limit(&self) -> f64 {
        SPEED_LIMITS[self.speed_code as usize]
    }

    /// `speed_limit + road_class`: the divisor turning km into time cost.
    #[inline]
    pub fn travel_rate(&self) -> f64 {
        self.speed_limit() + f64::from(self.road_class)
    }
}

/// The atomic edge: one piece of one road between two nodes.
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: SegmentId,
    pub road: RoadId,
    pub start: NodeId,
    pub end: NodeId,
    /// Length in km, always finite and positive.
    pub length: f64,
    pub(crate) road_slot: u32,
    pub(crate) start_slot: u32,
    pub(crate) end_slot: u32,
}

impl Segment {
    /// The endpoint opposite `from_slot`, and whether leaving `from_slot`
    /// along this segment follows its stored `start → end` direction.
    ///
    /// `None` for self-loops and for segments not incident to `from_slot`.
    #[inline]
    pub(crate) fn far_end(&self, from_slot: u32) -> Option<(u32, bool)> {
        if self.start_slot == self.end_slot {
            None
        } else if self.start_slot == from_slot {
            Some((self.end_slot, true))
        } else if self.end_slot == from_slot {
            Some((self.start_slot, false))
        } else {
            None
        }
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable road graph plus a spatial index for node lookup.
///
/// Do not construct directly; use [`RoadNetworkBuilder`] or the
/// [`loader`](crate::loader).
#[derive(Debug)]
pub struct RoadNetwork {
    nodes:       Vec<Node>,
    node_slot:   Arc<FxHashMap<NodeId, u32>>,
    roads:       Vec<Road>,
    road_slot:   FxHashMap<RoadId, u32>,
    segments:    Vec<Segment>,
    generation:  u64,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes, roads or segments.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Process-unique stamp of this build.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_slot.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot_of(id).map(|slot| &self.nodes[slot])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.road_slot.get(&id).map(|&slot| &self.roads[slot as usize])
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> + '_ {
        self.roads.iter()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter()
    }

    /// The road a segment belongs to.
    #[inline]
    pub fn road_of(&self, segment: &Segment) -> &Road {
        &self.roads[segment.road_slot as usize]
    }

    /// Highest `speed_limit + road_class` over all roads, `None` if there
    /// are no roads.
    pub fn fastest_travel_rate(&self) -> Option<f64> {
        self.roads.iter().map(Road::travel_rate).reduce(f64::max)
    }

    /// One-line summary of a node: id, location and the names of the roads
    /// meeting there.
    pub fn describe_node(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mut names: Vec<&str> = node
            .segments
            .iter()
            .map(|&s| self.road_of(&self.segments[s.index()]).name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        Some(format!("{} at {} on {}", node.id, node.location, names.join(", ")))
    }

    // ── Slot-level access for the algorithms ──────────────────────────────

    #[inline]
    pub(crate) fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.node_slot.get(&id).map(|&slot| slot as usize)
    }

    #[inline]
    pub(crate) fn node_at(&self, slot: usize) -> &Node {
        &self.nodes[slot]
    }

    #[inline]
    pub(crate) fn segment_at(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    pub(crate) fn shared_slots(&self) -> Arc<FxHashMap<NodeId, u32>> {
        Arc::clone(&self.node_slot)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `location`.  `None` only if the network is empty.
    pub fn nearest_node(&self, location: Location) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[location.x, location.y])
            .map(|e| e.id)
    }

    /// The nearest node no further than `max_distance` km from `location`.
    pub fn nearest_within(&self, location: Location, max_distance: f64) -> Option<NodeId> {
        self.nearest_node(location).filter(|&id| {
            self.node(id)
                .is_some_and(|n| n.location.distance(location) <= max_distance)
        })
    }

    /// Up to `k` nearest nodes to `location`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, location: Location, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[location.x, location.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Editing ───────────────────────────────────────────────────────────

    /// Reopen the network for edits.  The rebuilt network gets a new
    /// generation, so adjacency resolved from `self` will be stale for it.
    pub fn into_builder(self) -> RoadNetworkBuilder {
        let node_slot = Arc::try_unwrap(self.node_slot).unwrap_or_else(|shared| (*shared).clone());
        RoadNetworkBuilder {
            nodes: self.nodes,
            node_slot,
            roads: self.roads,
            road_slot: self.road_slot,
            segments: self.segments,
        }
    }
}

/// Slot for the next entry of a collection currently holding `len` items.
pub(crate) fn next_slot(len: usize, what: &'static str) -> GraphResult<u32> {
    u32::try_from(len).map_err(|_| GraphError::CapacityExceeded(what))
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes and roads must be added before the segments that reference them;
/// every `add_*` call validates its input, so `build()` itself cannot fail.
///
/// # Example
///
/// ```
/// use rn_core::{Location, NodeId, RoadId};
/// use rn_graph::{RoadInfo, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_node(NodeId(1), Location::new(0.0, 0.0)).unwrap();
/// b.add_node(NodeId(2), Location::new(1.2, 0.0)).unwrap();
/// b.add_road(RoadInfo::new(RoadId(10), "Queen Street")).unwrap();
/// b.add_segment(RoadId(10), NodeId(1), NodeId(2), 1.2).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.segment_count(), 1);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:     Vec<Node>,
    node_slot: FxHashMap<NodeId, u32>,
    roads:     Vec<Road>,
    road_slot: FxHashMap<RoadId, u32>,
    segments:  Vec<Segment>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes, roads and segments.
    pub fn with_capacity(nodes: usize, roads: usize, segments: usize) -> Self {
        let mut node_slot = FxHashMap::default();
        node_slot.reserve(nodes);
        let mut road_slot = FxHashMap::default();
        road_slot.reserve(roads);
        Self {
            nodes: Vec::with_capacity(nodes),
            node_slot,
            roads: Vec::with_capacity(roads),
            road_slot,
            segments: Vec::with_capacity(segments),
        }
    }

    /// Add an intersection.
    pub fn add_node(&mut self, id: NodeId, location: Location) -> GraphResult<()> {
        if self.node_slot.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let slot = next_slot(self.nodes.len(), "nodes")?;
        self.node_slot.insert(id, slot);
        self.nodes.push(Node { id, location, segments: Vec::new() });
        Ok(())
    }

    /// Add a road.  Fails on a duplicate id or a speed code outside `0..=7`.
    pub fn add_road(&mut self, info: RoadInfo) -> GraphResult<()> {
        if self.road_slot.contains_key(&info.id) {
            return Err(GraphError::DuplicateRoad(info.id));
        }
        if speed_limit_for_code(info.speed_code).is_none() {
            return Err(GraphError::InvalidSpeedCode { road: info.id, code: info.speed_code });
        }
        let slot = next_slot(self.roads.len(), "roads")?;
        self.road_slot.insert(info.id, slot);
        self.roads.push(Road {
            id:         info.id,
            name:       info.name,
            city:       info.city,
            one_way:    info.one_way,
            road_class: info.road_class,
            speed_code: info.speed_code,
            segments:   Vec::new(),
        });
        Ok(())
    }

    /// Add a segment of `road` from `start` to `end`, `length` km long.
    ///
    /// The direction matters only if the road is one-way.
    pub fn add_segment(
        &mut self,
        road: RoadId,
        start: NodeId,
        end: NodeId,
        length: f64,
    ) -> GraphResult<SegmentId> {
        let road_slot = *self.road_slot.get(&road).ok_or(GraphError::UnknownRoad(road))?;
        let start_slot = *self
            .node_slot
            .get(&start)
            .ok_or(GraphError::DanglingEndpoint { road, node: start })?;
        let end_slot = *self
            .node_slot
            .get(&end)
            .ok_or(GraphError::DanglingEndpoint { road, node: end })?;
        if !length.is_finite() || length <= 0.0 {
            return Err(GraphError::InvalidLength { road, length });
        }

        let id = SegmentId(next_slot(self.segments.len(), "segments")?);
        self.segments.push(Segment { id, road, start, end, length, road_slot, start_slot, end_slot });
        self.roads[road_slot as usize].segments.push(id);
        self.nodes[start_slot as usize].segments.push(id);
        if end_slot != start_slot {
            self.nodes[end_slot as usize].segments.push(id);
        }
        Ok(id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_slot.contains_key(&id)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .map(|n| NodeEntry { point: [n.location.x, n.location.y], id: n.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            nodes:      self.nodes,
            node_slot:  Arc::new(self.node_slot),
            roads:      self.roads,
            road_slot:  self.road_slot,
            segments:   self.segments,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            spatial_idx,
        }
    }
}
