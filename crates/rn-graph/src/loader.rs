//! Tab-separated road data loader.
//!
//! # File formats
//!
//! Three files, tab-separated, read with the `csv` crate:
//!
//! | File                                              | Header | Columns                                                                 |
//! |---------------------------------------------------|--------|-------------------------------------------------------------------------|
//! | `nodeID-lat-lon.tab`                              | no     | `node_id lat lon`                                                       |
//! | `roadID-roadInfo.tab`                             | yes    | `road_id type label city oneway speed roadclass notforcar notforpede notforbicy` |
//! | `roadSeg-roadID-length-nodeID-nodeID-coords.tab`  | yes    | `road_id length node_id1 node_id2 [lat lon]*`                           |
//!
//! Segment rows carry a polyline after the four fixed columns; it only
//! matters for drawing and is skipped.  Latitude/longitude are projected
//! with [`Location::from_lat_lon`].
//!
//! ```text
//! 10	-36.847385	174.765735
//! 11	-36.848625	174.764836
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};

use rn_core::{Location, NodeId, RoadId};

use crate::network::{RoadInfo, RoadNetwork, RoadNetworkBuilder};
use crate::{GraphError, GraphResult};

pub const NODES_FILENAME: &str = "nodeID-lat-lon.tab";
pub const ROADS_FILENAME: &str = "roadID-roadInfo.tab";
pub const SEGMENTS_FILENAME: &str = "roadSeg-roadID-length-nodeID-nodeID-coords.tab";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a directory holding the three standard files.
pub fn load_from_dir(dir: &Path) -> GraphResult<RoadNetwork> {
    log::info!("loading road network from {}", dir.display());
    load_from_readers(
        File::open(dir.join(NODES_FILENAME))?,
        File::open(dir.join(ROADS_FILENAME))?,
        File::open(dir.join(SEGMENTS_FILENAME))?,
    )
}

/// Like [`load_from_dir`] but accepts any `Read` sources.
///
/// Useful for testing (pass `&[u8]` or a `std::io::Cursor`).
pub fn load_from_readers<N: Read, R: Read, S: Read>(
    nodes: N,
    roads: R,
    segments: S,
) -> GraphResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();

    read_nodes(nodes, &mut builder)?;
    read_roads(roads, &mut builder)?;
    read_segments(segments, &mut builder)?;

    log::info!(
        "loaded {} nodes, {} roads, {} segments",
        builder.node_count(),
        builder.road_count(),
        builder.segment_count()
    );
    Ok(builder.build())
}

// ── Per-file readers ──────────────────────────────────────────────────────────

fn read_nodes<R: Read>(reader: R, builder: &mut RoadNetworkBuilder) -> GraphResult<()> {
    for record in tab_reader(reader, false).records() {
        let record = record.map_err(|e| csv_error(NODES_FILENAME, e))?;
        let row = Row::new(NODES_FILENAME, &record);
        let id: u32 = row.field(0, "node_id")?;
        let lat: f64 = row.field(1, "lat")?;
        let lon: f64 = row.field(2, "lon")?;
        let location = Location::try_from_lat_lon(lat, lon).map_err(|e| row.error(e.to_string()))?;
        builder.add_node(NodeId(id), location)?;
    }
    Ok(())
}

fn read_roads<R: Read>(reader: R, builder: &mut RoadNetworkBuilder) -> GraphResult<()> {
    for record in tab_reader(reader, true).records() {
        let record = record.map_err(|e| csv_error(ROADS_FILENAME, e))?;
        let row = Row::new(ROADS_FILENAME, &record);
        let info = RoadInfo {
            id:         RoadId(row.field(0, "road_id")?),
            name:       row.text(2, "label")?.to_string(),
            city:       row.text(3, "city")?.to_string(),
            one_way:    row.field::<u8>(4, "oneway")? != 0,
            speed_code: row.field(5, "speed")?,
            road_class: row.field(6, "roadclass")?,
        };
        builder.add_road(info)?;
    }
    Ok(())
}

fn read_segments<R: Read>(reader: R, builder: &mut RoadNetworkBuilder) -> GraphResult<()> {
    for record in tab_reader(reader, true).records() {
        let record = record.map_err(|e| csv_error(SEGMENTS_FILENAME, e))?;
        let row = Row::new(SEGMENTS_FILENAME, &record);
        let road: u32 = row.field(0, "road_id")?;
        let length: f64 = row.field(1, "length")?;
        let start: u32 = row.field(2, "node_id1")?;
        let end: u32 = row.field(3, "node_id2")?;
        builder.add_segment(RoadId(road), NodeId(start), NodeId(end), length)?;
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tab_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn csv_error(file: &str, e: csv::Error) -> GraphError {
    let line = e.position().map_or(0, |p| p.line());
    GraphError::Parse { file: file.to_string(), line, message: e.to_string() }
}

/// A record plus the context needed to report errors against it.
struct Row<'a> {
    file: &'static str,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    fn new(file: &'static str, record: &'a StringRecord) -> Self {
        Self { file, record }
    }

    fn error(&self, message: String) -> GraphError {
        GraphError::Parse {
            file: self.file.to_string(),
            line: self.record.position().map_or(0, |p| p.line()),
            message,
        }
    }

    fn text(&self, index: usize, name: &str) -> GraphResult<&'a str> {
        self.record
            .get(index)
            .map(str::trim)
            .ok_or_else(|| self.error(format!("missing column {name:?}")))
    }

    fn field<T: FromStr>(&self, index: usize, name: &str) -> GraphResult<T> {
        let raw = self.text(index, name)?;
        raw.parse::<T>()
            .map_err(|_| self.error(format!("invalid {name} {raw:?}")))
    }
}
