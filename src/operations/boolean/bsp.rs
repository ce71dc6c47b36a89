use crate::error::{OperationError, Result};

use super::polygon::{BspPolygon, SplitPlane, SplitTargets};

/// A node of a solid BSP tree.
///
/// The front side of every plane is outside the solid. Polygons that end
/// up behind a node without a back child are inside and are dropped when
/// clipping.
#[derive(Debug, Default)]
pub(super) struct Node {
    plane: Option<SplitPlane>,
    polygons: Vec<BspPolygon>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
}

/// Tolerances shared by every step of one boolean.
#[derive(Debug, Clone, Copy)]
pub(super) struct Limits {
    pub(super) epsilon: f64,
    pub(super) max_depth: usize,
}

impl Node {
    /// Builds a tree over `polygons`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if the tree gets deeper than
    /// `limits.max_depth`.
    pub(super) fn from_polygons(polygons: Vec<BspPolygon>, limits: Limits) -> Result<Self> {
        let mut node = Self::default();
        node.build(polygons, limits, 0)?;
        Ok(node)
    }

    /// Swaps inside and outside.
    pub(super) fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes the parts of `polygons` inside this tree.
    pub(super) fn clip_polygons(&self, polygons: Vec<BspPolygon>, epsilon: f64) -> Vec<BspPolygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };
        let mut parts = SplitTargets::default();
        for polygon in polygons {
            plane.split(polygon, epsilon, &mut parts);
        }
        let mut front = parts.front;
        front.append(&mut parts.coplanar_front);
        let mut back = parts.back;
        back.append(&mut parts.coplanar_back);

        let mut kept = match &self.front {
            Some(node) => node.clip_polygons(front, epsilon),
            None => front,
        };
        if let Some(node) = &self.back {
            kept.extend(node.clip_polygons(back, epsilon));
        }
        kept
    }

    /// Removes the parts of this tree's polygons inside `other`.
    pub(super) fn clip_to(&mut self, other: &Node, epsilon: f64) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons), epsilon);
        if let Some(front) = &mut self.front {
            front.clip_to(other, epsilon);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other, epsilon);
        }
    }

    pub(super) fn all_polygons(&self) -> Vec<BspPolygon> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<BspPolygon>) {
        out.extend(self.polygons.iter().cloned());
        if let Some(front) = &self.front {
            front.collect_into(out);
        }
        if let Some(back) = &self.back {
            back.collect_into(out);
        }
    }

    /// Adds `polygons` to the tree, splitting them along existing planes.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] past `limits.max_depth`.
    pub(super) fn build(&mut self, polygons: Vec<BspPolygon>, limits: Limits, depth: usize) -> Result<()> {
        if polygons.is_empty() {
            return Ok(());
        }
        if depth > limits.max_depth {
            return Err(OperationError::Failed(format!(
                "BSP tree exceeds the maximum depth of {}",
                limits.max_depth
            ))
            .into());
        }
        let plane = *self.plane.get_or_insert(polygons[0].plane);

        let mut parts = SplitTargets::default();
        for polygon in polygons {
            plane.split(polygon, limits.epsilon, &mut parts);
        }
        self.polygons.append(&mut parts.coplanar_front);
        self.polygons.append(&mut parts.coplanar_back);

        if !parts.front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build(parts.front, limits, depth + 1)?;
        }
        if !parts.back.is_empty() {
            self.back
                .get_or_insert_with(Box::default)
                .build(parts.back, limits, depth + 1)?;
        }
        Ok(())
    }
}
