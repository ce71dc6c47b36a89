//! Solids built from an ordered list of operations.
//!
//! A [`Representation`] unions its solid operations and subtracts its void
//! operations. Boolean failures never abort a composition: the failing
//! step is skipped and reported in [`Composite::warnings`].

mod operation;

pub use operation::{OperationKind, SolidOperation};

use std::sync::Arc;

use tracing::{info_span, warn};

use crate::operations::boolean::{boolean, BooleanOp, BooleanParams};
use crate::topology::Solid;
use crate::warning::{Warning, Warnings};

/// The result of [`Representation::compose`].
#[derive(Debug, Clone, Default)]
pub struct Composite {
    pub solid: Arc<Solid>,
    pub warnings: Warnings,
}

#[derive(Debug, Clone)]
struct Cached {
    key: Vec<(Arc<Solid>, bool)>,
    params: BooleanParams,
    composite: Composite,
}

impl Cached {
    fn matches(&self, operations: &[SolidOperation], params: &BooleanParams) -> bool {
        self.params == *params
            && self.key.len() == operations.len()
            && self
                .key
                .iter()
                .zip(operations)
                .all(|((solid, is_void), op)| Arc::ptr_eq(solid, op.solid()) && *is_void == op.is_void())
    }
}

/// An ordered list of [`SolidOperation`]s and their cached composite.
#[derive(Debug, Clone, Default)]
pub struct Representation {
    operations: Vec<SolidOperation>,
    params: BooleanParams,
    cache: Option<Cached>,
}

impl Representation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(mut self, params: BooleanParams) -> Self {
        self.params = params;
        self
    }

    pub fn push(&mut self, operation: SolidOperation) {
        self.operations.push(operation);
    }

    /// Removes and returns the operation at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<SolidOperation> {
        (index < self.operations.len()).then(|| self.operations.remove(index))
    }

    #[must_use]
    pub fn operations(&self) -> &[SolidOperation] {
        &self.operations
    }

    /// Mutable access to one operation. Changes are picked up by the next
    /// [`compose`](Self::compose).
    pub fn operation_mut(&mut self, index: usize) -> Option<&mut SolidOperation> {
        self.operations.get_mut(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn params(&self) -> &BooleanParams {
        &self.params
    }

    pub fn set_params(&mut self, params: BooleanParams) {
        self.params = params;
    }

    /// Returns `true` if the next [`compose`](Self::compose) will reuse the
    /// previous result.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|c| c.matches(&self.operations, &self.params))
    }

    /// `union(solid operations) - union(void operations)`.
    ///
    /// The result is cached until an operation's built solid, void flag,
    /// position in the list or the boolean parameters change. A union step
    /// that fails skips its operand; a failing subtraction falls back to
    /// the unioned solids. Each fallback adds a warning.
    pub fn compose(&mut self) -> Composite {
        if let Some(cached) = self
            .cache
            .as_ref()
            .filter(|c| c.matches(&self.operations, &self.params))
        {
            return cached.composite.clone();
        }

        let span = info_span!("compose", operations = self.operations.len());
        let _guard = span.enter();

        let mut warnings = Warnings::new();
        let (voids, solids): (Vec<_>, Vec<_>) = self.operations.iter().partition(|op| op.is_void());
        let merged = union_all(&solids, &self.params, &mut warnings);

        let solid = if voids.is_empty() {
            merged
        } else {
            let voided = union_all(&voids, &self.params, &mut warnings);
            match boolean(&merged, &voided, BooleanOp::Difference, &self.params) {
                Ok(result) => Arc::new(result),
                Err(e) => {
                    warn!(error = %e, "void subtraction failed, keeping solids uncut");
                    warnings.push(Warning::warning(format!("void subtraction failed: {e}")));
                    merged
                }
            }
        };

        let composite = Composite { solid, warnings };
        self.cache = Some(Cached {
            key: self
                .operations
                .iter()
                .map(|op| (Arc::clone(op.solid()), op.is_void()))
                .collect(),
            params: self.params,
            composite: composite.clone(),
        });
        composite
    }
}

fn union_all(operations: &[&SolidOperation], params: &BooleanParams, warnings: &mut Warnings) -> Arc<Solid> {
    match operations {
        [] => Arc::new(Solid::new()),
        [single] => Arc::clone(single.solid()),
        [first, rest @ ..] => {
            let mut acc = Solid::clone(first.solid());
            for (i, op) in rest.iter().enumerate() {
                match boolean(&acc, op.solid(), BooleanOp::Union, params) {
                    Ok(result) => acc = result,
                    Err(e) => {
                        warn!(operand = i + 1, error = %e, "union failed, skipping operand");
                        warnings.push(Warning::warning(format!(
                            "union with operand {} failed: {e}",
                            i + 1
                        )));
                    }
                }
            }
            Arc::new(acc)
        }
    }
}
