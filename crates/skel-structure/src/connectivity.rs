//! Skeleton connectivity repair.
//!
//! Traced skeletons routinely arrive as several disjoint fragments.
//! Repair proceeds in three steps over a node slice sorted by ascending
//! id: fill adjacency lists from the valid links, label connected
//! components by breadth-first traversal, then bridge every component
//! into the growing primary mass with one synthetic link each.

use std::collections::VecDeque;

use hashbrown::HashMap;
use kiddo::{KdTree, SquaredEuclidean};
use skel_types::{Link, Node, NodeId};
use tracing::{debug, info};

/// Strategy for the nearest-pair search during bridging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BridgeMode {
    /// Exhaustive pairwise scan. O(component x merged mass) per bridge,
    /// with first-found-wins tie-breaking in slice order.
    #[default]
    Exhaustive,
    /// k-d tree over the merged mass. Same bridges for distinct minima;
    /// exact ties resolve by a follow-up scan in slice order.
    SpatialIndex,
}

/// Fill each node's neighbor list from the links whose endpoints both
/// exist, and return those valid links.
///
/// Dangling links are dropped with a log line, per the skip-and-continue
/// contract. Neighbor lists keep duplicates: two parallel links yield
/// two entries.
pub fn build_adjacency(nodes: &mut [Node], links: &[Link]) -> Vec<Link> {
    let index: HashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id, i))
        .collect();

    let mut valid = Vec::with_capacity(links.len());
    for link in links {
        let (Some(&ia), Some(&ib)) = (index.get(&link.a), index.get(&link.b)) else {
            debug!(a = link.a, b = link.b, "dangling link dropped");
            continue;
        };
        nodes[ia].linked_nodes.push(link.b);
        nodes[ib].linked_nodes.push(link.a);
        valid.push(*link);
    }

    valid
}

/// Label connected components with positive integers, in slice order.
///
/// The first unlabeled node starts component 1 (the primary component),
/// and a breadth-first expansion labels everything reachable from it;
/// the next unlabeled node starts component 2, and so on. A node keeps
/// the first label it receives. Returns the component count.
///
/// # Example
///
/// ```
/// use skel_structure::{build_adjacency, label_components};
/// use skel_types::{Link, Node, Point3};
///
/// let mut nodes = vec![
///     Node::new(1, Point3::new(0.0, 0.0, 0.0), 1.0),
///     Node::new(2, Point3::new(1.0, 0.0, 0.0), 1.0),
///     Node::new(3, Point3::new(9.0, 0.0, 0.0), 1.0),
/// ];
/// build_adjacency(&mut nodes, &[Link::new(1, 2)]);
///
/// assert_eq!(label_components(&mut nodes), 2);
/// assert_eq!(nodes[0].graph_id, 1);
/// assert_eq!(nodes[1].graph_id, 1);
/// assert_eq!(nodes[2].graph_id, 2);
/// ```
pub fn label_components(nodes: &mut [Node]) -> u32 {
    let index: HashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id, i))
        .collect();

    let mut next_label = 0u32;
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..nodes.len() {
        if nodes[start].is_labeled() {
            continue;
        }
        next_label += 1;
        nodes[start].graph_id = next_label;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            // Clone: the neighbor list is read while nodes are mutated.
            let neighbor_ids = nodes[current].linked_nodes.clone();
            for id in neighbor_ids {
                let Some(&neighbor) = index.get(&id) else {
                    continue;
                };
                if !nodes[neighbor].is_labeled() {
                    nodes[neighbor].graph_id = next_label;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    debug!(components = next_label, "components labeled");
    next_label
}

/// Bridge every secondary component into the growing primary mass.
///
/// For each label `i` from 2 upward, the closest pair between component
/// `i` and the union of all components with smaller labels gets a
/// synthetic link. Merging smallest label first means component 3
/// bridges against components {1, 2} as one mass, never against a
/// not-yet-merged component. Returns the bridging links in merge order;
/// a connected skeleton yields none.
#[must_use]
pub fn bridge_components(nodes: &[Node], component_count: u32, mode: BridgeMode) -> Vec<Link> {
    if component_count <= 1 {
        return Vec::new();
    }

    let bridges = match mode {
        BridgeMode::Exhaustive => bridge_exhaustive(nodes, component_count),
        BridgeMode::SpatialIndex => bridge_spatial(nodes, component_count),
    };

    info!(bridges = bridges.len(), "components bridged");
    bridges
}

fn bridge_exhaustive(nodes: &[Node], component_count: u32) -> Vec<Link> {
    let mut bridges = Vec::with_capacity(component_count as usize - 1);

    for label in 2..=component_count {
        let mut best: Option<(f64, NodeId, NodeId)> = None;

        for candidate in nodes.iter().filter(|n| n.graph_id == label) {
            for merged in nodes.iter().filter(|n| n.graph_id < label) {
                let dist = candidate.distance_to(merged);
                // Strict comparison: first-found pair wins ties.
                if best.map_or(true, |(best_dist, _, _)| dist < best_dist) {
                    best = Some((dist, candidate.id, merged.id));
                }
            }
        }

        if let Some((dist, a, b)) = best {
            debug!(label, a, b, dist, "bridging link chosen");
            bridges.push(Link::new(a, b));
        }
    }

    bridges
}

fn bridge_spatial(nodes: &[Node], component_count: u32) -> Vec<Link> {
    let mut bridges = Vec::with_capacity(component_count as usize - 1);

    // Merged mass starts as the primary component.
    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, node) in nodes.iter().enumerate() {
        if node.graph_id == 1 {
            let p = node.position;
            tree.add(&[p.x, p.y, p.z], i as u64);
        }
    }

    for label in 2..=component_count {
        let mut best: Option<(f64, usize, usize)> = None;

        for (i, candidate) in nodes.iter().enumerate().filter(|(_, n)| n.graph_id == label) {
            let p = candidate.position;
            let nearest = tree.nearest_one::<SquaredEuclidean>(&[p.x, p.y, p.z]);
            let dist = nearest.distance.sqrt();
            if best.map_or(true, |(best_dist, _, _)| dist < best_dist) {
                #[allow(clippy::cast_possible_truncation)]
                let merged_idx = nearest.item as usize;
                best = Some((dist, i, merged_idx));
            }
        }

        if let Some((dist, candidate_idx, merged_idx)) = best {
            let candidate = &nodes[candidate_idx];
            // The tree's choice among equidistant points is arbitrary;
            // rescan in slice order so ties match the exhaustive mode.
            let merged_id = nodes
                .iter()
                .find(|n| n.graph_id < label && (candidate.distance_to(n) - dist).abs() < 1e-12)
                .map_or(nodes[merged_idx].id, |n| n.id);

            debug!(label, a = candidate.id, b = merged_id, dist, "bridging link chosen");
            bridges.push(Link::new(candidate.id, merged_id));
        }

        // Grow the merged mass.
        for (i, node) in nodes.iter().enumerate() {
            if node.graph_id == label {
                let p = node.position;
                tree.add(&[p.x, p.y, p.z], i as u64);
            }
        }
    }

    bridges
}
