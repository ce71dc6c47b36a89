use thiserror::Error;

/// Top-level error type for the kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("points are not coplanar (deviation {deviation:e})")]
    NonPlanar { deviation: f64 },
}

/// Errors raised by the half-edge graph.
///
/// These indicate a caller bug (an id from another solid, a half-edge
/// threaded twice) and are not expected from the builders.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("half-edge is already used by a loop")]
    HalfEdgeInUse,

    #[error("loop does not close")]
    OpenLoop,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to solid construction and boolean operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Result alias defaulting to [`KernelError`]. Topology accessors name
/// [`TopologyError`] as the error type explicitly.
pub type Result<T, E = KernelError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn close_loop(closes: bool) -> Result<(), TopologyError> {
        if closes {
            Ok(())
        } else {
            Err(TopologyError::OpenLoop)
        }
    }

    fn build(closes: bool) -> Result<usize> {
        close_loop(closes)?;
        Ok(1)
    }

    #[test]
    fn topology_errors_lift_into_kernel_errors() {
        assert_eq!(build(true).ok(), Some(1));
        assert!(matches!(build(false), Err(KernelError::Topology(TopologyError::OpenLoop))));
    }
}
