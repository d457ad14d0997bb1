//! `rn-graph` — road network, adjacency, routing and cut-vertex analysis.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`network`]      | `RoadNetwork` (+ R-tree), `RoadNetworkBuilder`, entities  |
//! | [`adjacency`]    | `Adjacency`: outgoing and neighbor views                  |
//! | [`router`]       | `Router` trait, `PathRequest`, `Route`, `AStarRouter`     |
//! | [`articulation`] | `connected_components`, `find_articulation_points`        |
//! | [`loader`]       | `load_from_dir`, `load_from_readers` (tab files)          |
//! | [`error`]        | `GraphError`, `GraphResult<T>`                            |
//!
//! # Usage
//!
//! ```
//! use rn_core::{CostMode, Location, NodeId, RoadId};
//! use rn_graph::{find_articulation_points, find_path, Adjacency, RoadInfo, RoadNetworkBuilder};
//!
//! let mut b = RoadNetworkBuilder::new();
//! for (id, x) in [(1, 0.0), (2, 1.0), (3, 2.0)] {
//!     b.add_node(NodeId(id), Location::new(x, 0.0)).unwrap();
//! }
//! b.add_road(RoadInfo::new(RoadId(1), "Main Road")).unwrap();
//! b.add_segment(RoadId(1), NodeId(1), NodeId(2), 1.0).unwrap();
//! b.add_segment(RoadId(1), NodeId(2), NodeId(3), 1.0).unwrap();
//! let net = b.build();
//! let adj = Adjacency::resolve(&net);
//!
//! let route = find_path(&net, &adj, NodeId(1), NodeId(3), CostMode::Distance).unwrap();
//! assert_eq!(route.total_cost, 2.0);
//! assert_eq!(route.legs.len(), 1);
//!
//! let cut = find_articulation_points(&net, &adj).unwrap();
//! assert!(cut.contains(&NodeId(2)));
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Resolves adjacency on the Rayon pool.                     |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Route` and `Leg`.   |

pub mod adjacency;
pub mod articulation;
pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use adjacency::{Adjacency, Link};
pub use articulation::{connected_components, find_articulation_points, find_articulation_points_with};
pub use error::{GraphError, GraphResult};
pub use loader::{load_from_dir, load_from_readers};
pub use network::{Node, Road, RoadInfo, RoadNetwork, RoadNetworkBuilder, Segment};
pub use router::{find_path, AStarRouter, Leg, PathRequest, Route, Router, RouterConfig, TimeHeuristic};
