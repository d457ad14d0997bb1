//! `rn-core` — foundational types for the `roadnet` road-network engine.
//!
//! This crate is a dependency of every other `rn-*` crate.  It has no `rn-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `RoadId`, `SegmentId`                       |
//! | [`geo`]         | `Location`, lat/lon projection, planar distance       |
//! | [`cost`]        | `CostMode`, speed-limit code table                    |
//! | [`cancel`]      | `CancelToken`                                         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cancel;
pub mod cost;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use cost::{speed_limit_for_code, CostMode, SPEED_LIMITS, TYPICAL_TRAVEL_RATE};
pub use error::{CoreError, CoreResult};
pub use geo::Location;
pub use ids::{NodeId, RoadId, SegmentId};
