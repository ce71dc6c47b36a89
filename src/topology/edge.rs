use super::loops::LoopId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge within its solid.
    pub struct EdgeId;
}

/// Which of an edge's two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Runs from the edge's first vertex to its second.
    Left,
    /// Runs from the edge's second vertex back to its first.
    Right,
}

impl Side {
    /// The opposite half.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A directed half of an edge, addressed through its owning edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfEdgeId {
    /// The owning edge.
    pub edge: EdgeId,
    /// Which half.
    pub side: Side,
}

impl HalfEdgeId {
    /// The left half of `edge`.
    #[must_use]
    pub fn left(edge: EdgeId) -> Self {
        Self {
            edge,
            side: Side::Left,
        }
    }

    /// The right half of `edge`.
    #[must_use]
    pub fn right(edge: EdgeId) -> Self {
        Self {
            edge,
            side: Side::Right,
        }
    }

    /// The other half of the same edge.
    #[must_use]
    pub fn twin(self) -> Self {
        Self {
            edge: self.edge,
            side: self.side.opposite(),
        }
    }
}

/// Data for one half-edge.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    /// The vertex this half starts from.
    pub vertex: VertexId,
    /// The loop using this half, if any.
    pub loop_id: Option<LoopId>,
}

/// Data associated with a topological edge.
///
/// An edge owns both of its halves; `left.vertex` and `right.vertex` are
/// its endpoints in opposite order.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Half running from the first vertex to the second.
    pub left: HalfEdgeData,
    /// Half running from the second vertex to the first.
    pub right: HalfEdgeData,
}

impl EdgeData {
    /// Creates an edge between two vertices with both halves unattached.
    #[must_use]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self {
            left: HalfEdgeData {
                vertex: from,
                loop_id: None,
            },
            right: HalfEdgeData {
                vertex: to,
                loop_id: None,
            },
        }
    }

    /// Returns the requested half.
    #[must_use]
    pub fn half(&self, side: Side) -> &HalfEdgeData {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Returns the requested half mutably.
    pub fn half_mut(&mut self, side: Side) -> &mut HalfEdgeData {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
