mod bounding_box;
mod volume;

pub use bounding_box::{Aabb, BoundingBox};
pub use volume::Volume;
