//! Constrained Delaunay triangulation of a single ring.

use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::FixedFaceHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{GeometryError, Result};
use crate::vec::Vec2;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a closed ring into index triples over the input points.
///
/// The ring is inserted as a constraint loop into a constrained Delaunay
/// triangulation; triangles outside the loop are discarded. Concave rings
/// work; self-intersecting ones are rejected.
///
/// # Errors
///
/// Fails for fewer than 3 points, when the triangulator rejects the
/// input (for example NaN coordinates), or when the ring's edges cross
/// each other.
pub fn triangulate_ring(points: &[Vec2]) -> Result<Vec<[usize; 3]>> {
    if points.len() < 3 {
        return Err(GeometryError::InsufficientPoints {
            needed: 3,
            got: points.len(),
        }
        .into());
    }

    let mut cdt = Cdt::new();
    let mut handles = Vec::with_capacity(points.len());
    // Duplicate points merge inside the triangulation; keep the first
    // input index for each merged vertex.
    let mut input_index: HashMap<usize, usize> = HashMap::new();
    for (i, p) in points.iter().enumerate() {
        let handle = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| GeometryError::Triangulation(e.to_string()))?;
        input_index.entry(handle.index()).or_insert(i);
        handles.push(handle);
    }
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(GeometryError::Triangulation(
                "ring edges cross each other".to_string(),
            )
            .into());
        }
        cdt.add_constraint(from, to);
    }

    let interior = interior_faces(&cdt);

    let mut out = Vec::new();
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let verts = face.vertices();
        let mut triple = [0usize; 3];
        let mut complete = true;
        for (i, vh) in verts.iter().enumerate() {
            match input_index.get(&vh.fix().index()) {
                Some(&idx) => triple[i] = idx,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            out.push(triple);
        }
    }
    Ok(out)
}

/// Flood-fills the triangulation from the outer face, counting constraint
/// crossings. Faces at odd crossing depth are inside the ring.
fn interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();
    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let idx = neighbor.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((neighbor.fix(), new_depth));
            }
        }
    }

    interior
}
