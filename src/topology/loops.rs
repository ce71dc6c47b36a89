use super::edge::HalfEdgeId;
use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a loop within its solid.
    pub struct LoopId;
}

/// A closed cycle of half-edges bounding one face.
///
/// The end vertex of each half equals the start vertex of the next,
/// wrapping around. Outer loops are counter-clockwise seen from outside
/// the solid; holes are clockwise.
#[derive(Debug, Clone)]
pub struct LoopData {
    /// The ordered half-edges.
    pub half_edges: Vec<HalfEdgeId>,
    /// The face this loop bounds, once attached.
    pub face: Option<FaceId>,
}
