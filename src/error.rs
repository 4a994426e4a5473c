//! Projection Error Taxonomy.
//!
//! Every failure mode of the projector, with the nested engine error as
//! payload where one exists. The projector records the first error and
//! ignores later ones; [`crate::project::Projector::run`] returns it.

use thiserror::Error;

use crate::ast::TermTag;
use crate::model::EvalError;
use crate::project::arith::ConstraintError;
use crate::project::term_subst::SubstError;

/// Why a projection failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjError {
    /// More variables to eliminate than the projector supports.
    #[error("too many variables to eliminate ({count})")]
    TooManyVars {
        /// Number of variables requested.
        count: usize,
    },
    /// An arithmetic literal mentions a term outside the linear fragment.
    #[error("non-linear arithmetic term of kind {0:?}")]
    NonLinear(TermTag),
    /// The arithmetic projector rejected a constraint.
    #[error("unsupported arithmetic literal")]
    BadArithLiteral(#[source] ConstraintError),
    /// The model could not evaluate a variable.
    #[error("model evaluation failed")]
    EvalFailed(#[source] EvalError),
    /// A model value has no constant-term representation.
    #[error("model value has no term representation")]
    ConvertFailed,
    /// Substituting into a literal failed.
    #[error("substitution failed")]
    SubstFailed(#[source] SubstError),
}

impl From<EvalError> for ProjError {
    fn from(e: EvalError) -> Self {
        ProjError::EvalFailed(e)
    }
}

impl From<SubstError> for ProjError {
    fn from(e: SubstError) -> Self {
        ProjError::SubstFailed(e)
    }
}

impl From<ConstraintError> for ProjError {
    fn from(e: ConstraintError) -> Self {
        ProjError::BadArithLiteral(e)
    }
}
