//! Model-Based Projection for SMT-Style Term Graphs.
//!
//! This crate eliminates existentially quantified variables from a
//! conjunction of literals (a cube), guided by a model that satisfies the
//! cube. The result is an equisatisfiable cube over the remaining
//! variables that still holds in the same model — an under-approximation
//! of the existential closure, as used by quantified solvers to
//! generalize from single satisfying assignments.
//!
//! The building blocks:
//! - Arena-allocated, hash-consed terms with polarity-tagged occurrences
//!   ([`ast`])
//! - Exact model evaluation over Booleans, rationals, bitvectors, and
//!   uninterpreted sorts ([`model`])
//! - The three-phase projector: equality substitution, model-guided
//!   virtual substitution for linear arithmetic, value closure
//!   ([`project`])
//!
//! # Example
//!
//! ```
//! use mbproj::ast::TermManager;
//! use mbproj::model::{Model, Value};
//! use mbproj::project::project_literals;
//!
//! let mut tm = TermManager::new();
//! let x = tm.mk_var("x", tm.sorts.int_sort);
//! let a = tm.mk_var("a", tm.sorts.int_sort);
//! let b = tm.mk_var("b", tm.sorts.int_sort);
//!
//! // x >= a, x <= b, a <= b, with a model where a=1, x=2, b=3
//! let literals = vec![tm.mk_ge(x, a), tm.mk_le(x, b), tm.mk_le(a, b)];
//!
//! let mut mdl = Model::new();
//! mdl.assign(x, Value::int(2));
//! mdl.assign(a, Value::int(1));
//! mdl.assign(b, Value::int(3));
//!
//! // eliminate x: the residual cube is a <= b
//! let mut out = Vec::new();
//! project_literals(&mdl, &mut tm, &literals, &[x], &mut out).unwrap();
//! assert_eq!(out, vec![tm.mk_le(a, b)]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod model;
pub mod project;

pub use ast::{Polynomial, SortId, SortKind, Term, TermKind, TermManager, TermTag};
pub use error::ProjError;
pub use model::{EvalError, Model, Value};
pub use project::{MAX_EVARS, Projector, project_literals};
