//! The `Structure` type: a repaired skeleton with a lazily-built mesh.

use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;

use hashbrown::HashMap;
use rand::Rng;
use skel_repair::MeshAdjacency;
use skel_types::{Color, Link, Node, NodeId, Point3, TriangleMesh};
use tracing::{info, warn};

use crate::config::ImportConfig;
use crate::connectivity::{build_adjacency, bridge_components, label_components, BridgeMode};
use crate::decode::{decode_links, decode_locations};
use crate::error::StructureResult;
use crate::pipeline::{build_mesh, PipelineParams};

/// A traced anatomical structure: a connected skeleton graph plus a
/// cached surface mesh.
///
/// Construction runs connectivity repair synchronously: dangling links
/// are dropped, components are labeled, and bridging links make the
/// graph connected. Afterwards the structure is read-only except for
/// its color and the one-time mesh cache.
///
/// Not thread-safe; the mesh cache has no internal synchronization.
///
/// # Example
///
/// ```
/// use skel_structure::{ImportConfig, Structure};
///
/// let locations = r#"{"value": [
///     {"ID": 1, "VolumeX": 0.0, "VolumeY": 0.0, "Z": 0.0, "Radius": 1.0},
///     {"ID": 2, "VolumeX": 3.0, "VolumeY": 0.0, "Z": 0.0, "Radius": 1.0}
/// ]}"#;
/// let links = r#"{"value": []}"#;
///
/// let config = ImportConfig::default()
///     .with_units_per_pixel(1.0)
///     .with_units_per_section(1.0);
/// let structure = Structure::from_annotation(7, locations, links, &config).unwrap();
///
/// assert_eq!(structure.id(), 7);
/// assert_eq!(structure.bridge_links().len(), 1);
/// ```
pub struct Structure {
    id: i64,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    links: Vec<Link>,
    bridge_count: usize,
    color: Color,
    params: PipelineParams,
    mesh: OnceCell<Rc<TriangleMesh>>,
}

impl Structure {
    /// Build a structure from the two annotation payloads.
    ///
    /// # Errors
    ///
    /// Fails only when an envelope is not valid JSON; per-item problems
    /// are dropped with a log line.
    pub fn from_annotation(
        id: i64,
        locations_json: &str,
        links_json: &str,
        config: &ImportConfig,
    ) -> StructureResult<Self> {
        let nodes = decode_locations(locations_json, config)?;
        let links = decode_links(links_json)?;
        Ok(Self::from_parts(id, nodes, &links))
    }

    /// Build a structure from already-decoded nodes and links.
    ///
    /// Nodes are sorted by ascending id; connectivity repair runs here.
    #[must_use]
    pub fn from_parts(id: i64, mut nodes: Vec<Node>, links: &[Link]) -> Self {
        nodes.sort_unstable_by_key(|node| node.id);

        let mut kept = build_adjacency(&mut nodes, links);
        let component_count = label_components(&mut nodes);
        let bridges = bridge_components(&nodes, component_count, BridgeMode::default());
        let bridge_count = bridges.len();

        // Bridges join the adjacency lists too, so sampling spans them.
        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();
        for bridge in &bridges {
            if let (Some(&ia), Some(&ib)) = (index.get(&bridge.a), index.get(&bridge.b)) {
                nodes[ia].linked_nodes.push(bridge.b);
                nodes[ib].linked_nodes.push(bridge.a);
            }
        }
        kept.extend(bridges);

        info!(
            id,
            nodes = nodes.len(),
            links = kept.len() - bridge_count,
            components = component_count,
            bridges = bridge_count,
            "structure constructed"
        );

        Self {
            id,
            nodes,
            index,
            links: kept,
            bridge_count,
            color: random_pastel_color(&mut rand::thread_rng()),
            params: PipelineParams::default(),
            mesh: OnceCell::new(),
        }
    }

    /// Replace the pipeline parameters. Only meaningful before the first
    /// mesh request; the cache is never invalidated.
    #[must_use]
    pub fn with_pipeline_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    /// Structure id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// All nodes, sorted by ascending id.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links: valid original links followed by bridging links.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The synthetic links added by connectivity repair.
    #[must_use]
    pub fn bridge_links(&self) -> &[Link] {
        &self.links[self.links.len() - self.bridge_count..]
    }

    /// Display color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the display color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The surface mesh, built on first request and cached for the
    /// structure's lifetime.
    ///
    /// Repeated calls return the same shared mesh. Pipeline failures
    /// degrade to an empty mesh rather than an error.
    #[must_use]
    pub fn mesh(&self) -> Rc<TriangleMesh> {
        Rc::clone(self.mesh.get_or_init(|| {
            Rc::new(build_mesh(&self.nodes, &self.links, &self.params))
        }))
    }

    /// Enclosed volume of the cached mesh.
    ///
    /// Only meaningful for a closed mesh; an open mesh produces a
    /// numerically meaningless value, reported via a warning rather
    /// than an error.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mesh = self.mesh();
        let adjacency = MeshAdjacency::build(&mesh.faces);
        let open_edges = adjacency.boundary_edge_count();
        if open_edges > 0 {
            warn!(
                id = self.id,
                open_edges, "volume computed over an open mesh; result is unreliable"
            );
        }
        mesh.volume()
    }

    /// Unweighted centroid of the cached mesh's vertices. Origin for an
    /// empty mesh.
    #[must_use]
    pub fn center_of_mass(&self) -> Point3<f64> {
        self.mesh()
            .center_of_mass()
            .unwrap_or_else(|| Point3::new(0.0, 0.0, 0.0))
    }

    /// Centroid formatted as `"x, y, z"`.
    #[must_use]
    pub fn center_of_mass_string(&self) -> String {
        let c = self.center_of_mass();
        format!("{}, {}, {}", c.x, c.y, c.z)
    }

    /// Export the cached mesh as binary STL.
    ///
    /// # Errors
    ///
    /// Fails when the mesh is empty or the file cannot be written.
    pub fn export_mesh<P: AsRef<Path>>(&self, path: P) -> StructureResult<()> {
        skel_io::save_stl(&self.mesh(), path)?;
        Ok(())
    }
}

/// A random pastel color: every channel in the upper half of its range.
pub fn random_pastel_color<R: Rng>(rng: &mut R) -> Color {
    Color::new(
        128 + rng.gen_range(0..128u8),
        128 + rng.gen_range(0..128u8),
        128 + rng.gen_range(0..128u8),
    )
}
