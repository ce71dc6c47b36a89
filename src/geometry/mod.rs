pub mod curve;
mod frame;
mod plane;
mod polygon;
mod profile;

pub use curve::{CircularArc, Curve, Line, Polyline};
pub use frame::Frame;
pub use plane::Plane;
pub use polygon::Polygon;
pub(crate) use polygon::validate_ring;
pub use profile::Profile;
