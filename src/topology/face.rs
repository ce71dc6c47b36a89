use super::loops::LoopId;

slotmap::new_key_type! {
    /// Unique identifier for a face within its solid.
    pub struct FaceId;
}

/// Data associated with a topological face.
///
/// A planar region bounded by an outer loop and optionally inner loops
/// (holes). The face normal follows the outer loop by the right-hand rule.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The outer boundary loop.
    pub outer: LoopId,
    /// Inner boundary loops (holes).
    pub inner: Vec<LoopId>,
}
