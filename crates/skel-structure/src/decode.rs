//! Decoding of raw annotation records.
//!
//! The annotation source delivers two JSON payloads per structure, each
//! an envelope of the form `{"value": [...]}`: a locations collection
//! (positions, radii, ids) and a links collection (id pairs). Decoding
//! is lenient per item: a malformed record is logged and dropped, never
//! an error. Only an unparseable envelope fails.

use serde::Deserialize;
use skel_types::{Link, Node, NodeId, Point3};
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::StructureResult;

#[derive(Debug, Deserialize)]
struct Envelope {
    value: Vec<serde_json::Value>,
}

/// One item of the locations collection, in raw volume coordinates.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(rename = "ID")]
    id: NodeId,
    #[serde(rename = "VolumeX")]
    volume_x: f64,
    #[serde(rename = "VolumeY")]
    volume_y: f64,
    #[serde(rename = "Z")]
    z: f64,
    #[serde(rename = "Radius")]
    radius: f64,
}

/// One item of the links collection.
#[derive(Debug, Deserialize)]
struct LinkRecord {
    #[serde(rename = "A")]
    a: NodeId,
    #[serde(rename = "B")]
    b: NodeId,
}

/// Decode the locations payload into scaled, filtered nodes.
///
/// Applies unit scaling, drops nodes on excluded sections, and resolves
/// duplicate ids by keeping the last record seen. The result is sorted
/// by ascending id, which fixes iteration order for everything
/// downstream.
///
/// # Errors
///
/// Returns a decode error only when the envelope itself is not valid
/// JSON of the expected shape.
pub fn decode_locations(json: &str, config: &ImportConfig) -> StructureResult<Vec<Node>> {
    let envelope: Envelope = serde_json::from_str(json)?;

    let mut by_id: hashbrown::HashMap<NodeId, Node> = hashbrown::HashMap::new();
    let mut dropped_malformed = 0usize;
    let mut dropped_excluded = 0usize;

    for item in envelope.value {
        let record: LocationRecord = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(err) => {
                debug!(%err, "malformed location record dropped");
                dropped_malformed += 1;
                continue;
            }
        };

        if config.is_excluded(record.z) {
            debug!(id = record.id, section = record.z, "excluded-section node dropped");
            dropped_excluded += 1;
            continue;
        }

        let position = Point3::new(
            record.volume_x * config.units_per_pixel,
            record.volume_y * config.units_per_pixel,
            record.z * config.units_per_section,
        );
        let radius = record.radius * config.units_per_pixel;

        // Duplicate ids: last record wins.
        by_id.insert(record.id, Node::new(record.id, position, radius));
    }

    if dropped_malformed + dropped_excluded > 0 {
        debug!(
            malformed = dropped_malformed,
            excluded = dropped_excluded,
            "location records dropped"
        );
    }

    let mut nodes: Vec<Node> = by_id.into_values().collect();
    nodes.sort_unstable_by_key(|node| node.id);
    Ok(nodes)
}

/// Decode the links payload.
///
/// Endpoint validity is not checked here; links referencing unknown
/// nodes are dropped later, when the node set is known.
///
/// # Errors
///
/// Returns a decode error only when the envelope itself is not valid
/// JSON of the expected shape.
pub fn decode_links(json: &str) -> StructureResult<Vec<Link>> {
    let envelope: Envelope = serde_json::from_str(json)?;

    let mut links = Vec::with_capacity(envelope.value.len());
    for item in envelope.value {
        match serde_json::from_value::<LinkRecord>(item) {
            Ok(record) => links.push(Link::new(record.a, record.b)),
            Err(err) => debug!(%err, "malformed link record dropped"),
        }
    }
    Ok(links)
}
