//! Conversion of Model Values to Constant Terms.
//!
//! Booleans, rationals, and bitvectors have a canonical constant-term
//! form. Abstract elements of uninterpreted sorts and function graphs have
//! none; converting them reports failure so that callers can surface a
//! conversion error instead of inventing terms.

use crate::ast::{Term, TermManager};

use super::Value;

/// Build the constant term denoting a value, or `None` when the value has
/// no term representation.
#[must_use]
pub fn value_to_term(tm: &mut TermManager, value: &Value) -> Option<Term> {
    match value {
        Value::Bool(true) => Some(tm.mk_true()),
        Value::Bool(false) => Some(tm.mk_false()),
        Value::Rational(q) => Some(tm.mk_rational(q.clone())),
        Value::BitVector { width, bits } => Some(tm.mk_bv_const(*width, bits.clone())),
        Value::Uninterpreted { .. } | Value::Function { .. } => None,
    }
}

/// Convert a slice of values, stopping at the first inconvertible one.
#[must_use]
pub fn values_to_terms(tm: &mut TermManager, values: &[Value]) -> Option<Vec<Term>> {
    values.iter().map(|v| value_to_term(tm, v)).collect()
}
