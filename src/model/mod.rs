//! Models and Term Evaluation.
//!
//! A [`Model`] assigns theory values to uninterpreted constants and
//! evaluates arbitrary terms bottom-up. Evaluation is exact: rationals use
//! arbitrary precision, and abstract elements of uninterpreted sorts
//! compare by identity.

pub mod val_to_term;

use num_rational::BigRational;
use num_traits::Zero;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ast::{SortId, Term, TermKind, TermManager};

/// A theory value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Exact rational value (integers have denominator one).
    Rational(BigRational),
    /// Bitvector value.
    BitVector {
        /// Bit width.
        width: u32,
        /// Value, reduced modulo `2^width`.
        bits: num_bigint::BigInt,
    },
    /// Abstract element of an uninterpreted sort; equal iff same sort and
    /// identifier.
    Uninterpreted {
        /// The sort of the element.
        sort: SortId,
        /// Identity within the sort.
        id: usize,
    },
    /// A function graph: explicit mappings plus an optional default.
    Function {
        /// Argument tuples and their images.
        mappings: Vec<(Vec<Value>, Value)>,
        /// Image of every tuple not listed.
        default: Option<Box<Value>>,
    },
}

impl Value {
    /// Shorthand for an integer value.
    #[must_use]
    pub fn int(n: i64) -> Self {
        Value::Rational(BigRational::from_integer(n.into()))
    }

    /// Extract a Boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract a rational, if this is one.
    #[must_use]
    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Value::Rational(q) => Some(q),
            _ => None,
        }
    }
}

/// Evaluation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An uninterpreted constant has no value in the model.
    #[error("term {0} has no value in the model")]
    Unassigned(Term),
    /// A function application falls outside the function's graph.
    #[error("no function value covers application {0}")]
    IncompleteFunction(Term),
    /// A subterm evaluated to a value of the wrong type.
    #[error("value of {0} has an unexpected type")]
    TypeMismatch(Term),
}

/// A finite assignment from uninterpreted constants to values.
#[derive(Debug, Default)]
pub struct Model {
    values: FxHashMap<Term, Value>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to an uninterpreted constant. The term must be a
    /// positive uninterpreted occurrence; a prior assignment is replaced.
    pub fn assign(&mut self, var: Term, value: Value) {
        debug_assert!(var.is_positive());
        self.values.insert(var, value);
    }

    /// The assigned value of a constant, if any.
    #[must_use]
    pub fn value_of(&self, var: Term) -> Option<&Value> {
        self.values.get(&var)
    }

    /// Evaluate a term bottom-up.
    pub fn evaluate(&self, tm: &TermManager, t: Term) -> Result<Value, EvalError> {
        let mut cache = FxHashMap::default();
        self.eval_cached(tm, t, &mut cache)
    }

    /// Evaluate a Boolean term to its truth value.
    pub fn holds(&self, tm: &TermManager, t: Term) -> Result<bool, EvalError> {
        match self.evaluate(tm, t)? {
            Value::Bool(b) => Ok(b),
            _ => Err(EvalError::TypeMismatch(t)),
        }
    }

    /// Evaluate an arithmetic term to its rational value.
    pub fn rational_value(&self, tm: &TermManager, t: Term) -> Result<BigRational, EvalError> {
        match self.evaluate(tm, t)? {
            Value::Rational(q) => Ok(q),
            _ => Err(EvalError::TypeMismatch(t)),
        }
    }

    fn eval_cached(
        &self,
        tm: &TermManager,
        t: Term,
        cache: &mut FxHashMap<Term, Value>,
    ) -> Result<Value, EvalError> {
        let pos = t.unsigned();
        let value = if let Some(v) = cache.get(&pos) {
            v.clone()
        } else {
            let v = self.eval_node(tm, pos, cache)?;
            cache.insert(pos, v.clone());
            v
        };
        if t.is_negative() {
            match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                _ => Err(EvalError::TypeMismatch(t)),
            }
        } else {
            Ok(value)
        }
    }

    fn eval_rational(
        &self,
        tm: &TermManager,
        t: Term,
        cache: &mut FxHashMap<Term, Value>,
    ) -> Result<BigRational, EvalError> {
        match self.eval_cached(tm, t, cache)? {
            Value::Rational(q) => Ok(q),
            _ => Err(EvalError::TypeMismatch(t)),
        }
    }

    fn eval_node(
        &self,
        tm: &TermManager,
        t: Term,
        cache: &mut FxHashMap<Term, Value>,
    ) -> Result<Value, EvalError> {
        debug_assert!(t.is_positive());
        match tm.kind(t) {
            TermKind::BoolConst => Ok(Value::Bool(true)),
            TermKind::Uninterpreted { .. } => self
                .values
                .get(&t)
                .cloned()
                .ok_or(EvalError::Unassigned(t)),
            TermKind::ArithConstant(c) => Ok(Value::Rational(c.clone())),
            TermKind::ArithPoly(p) => {
                let mut acc = BigRational::zero();
                for m in p.monomials() {
                    match m.var {
                        None => acc += &m.coeff,
                        Some(x) => acc += &m.coeff * self.eval_rational(tm, x, cache)?,
                    }
                }
                Ok(Value::Rational(acc))
            }
            TermKind::PowerProduct(ps) => {
                let ps = ps.clone();
                let mut acc = BigRational::from_integer(1.into());
                for (base, exp) in ps {
                    let b = self.eval_rational(tm, base, cache)?;
                    acc *= num_traits::pow(b, exp as usize);
                }
                Ok(Value::Rational(acc))
            }
            TermKind::ArithEq(arg) => {
                let v = self.eval_rational(tm, *arg, cache)?;
                Ok(Value::Bool(v.is_zero()))
            }
            TermKind::ArithGe(arg) => {
                let v = self.eval_rational(tm, *arg, cache)?;
                Ok(Value::Bool(v >= BigRational::zero()))
            }
            TermKind::ArithBinEq(a, b) => {
                let va = self.eval_rational(tm, *a, cache)?;
                let vb = self.eval_rational(tm, *b, cache)?;
                Ok(Value::Bool(va == vb))
            }
            TermKind::Ite(c, a, b) => {
                let (c, a, b) = (*c, *a, *b);
                match self.eval_cached(tm, c, cache)? {
                    Value::Bool(true) => self.eval_cached(tm, a, cache),
                    Value::Bool(false) => self.eval_cached(tm, b, cache),
                    _ => Err(EvalError::TypeMismatch(c)),
                }
            }
            TermKind::Eq(a, b) => {
                let (a, b) = (*a, *b);
                let va = self.eval_cached(tm, a, cache)?;
                let vb = self.eval_cached(tm, b, cache)?;
                Ok(Value::Bool(va == vb))
            }
            TermKind::Distinct(args) => {
                let args = args.clone();
                let mut vals = Vec::with_capacity(args.len());
                for a in args {
                    vals.push(self.eval_cached(tm, a, cache)?);
                }
                let distinct = vals
                    .iter()
                    .enumerate()
                    .all(|(i, v)| vals[i + 1..].iter().all(|w| v != w));
                Ok(Value::Bool(distinct))
            }
            TermKind::Or(args) => {
                let args = args.clone();
                let mut result = false;
                for a in args {
                    match self.eval_cached(tm, a, cache)? {
                        Value::Bool(b) => result |= b,
                        _ => return Err(EvalError::TypeMismatch(a)),
                    }
                }
                Ok(Value::Bool(result))
            }
            TermKind::Xor(args) => {
                let args = args.clone();
                let mut parity = false;
                for a in args {
                    match self.eval_cached(tm, a, cache)? {
                        Value::Bool(b) => parity ^= b,
                        _ => return Err(EvalError::TypeMismatch(a)),
                    }
                }
                Ok(Value::Bool(parity))
            }
            TermKind::App { fun, args } => {
                let (fun, args) = (*fun, args.clone());
                let fv = self.eval_cached(tm, fun, cache)?;
                let mut avs = Vec::with_capacity(args.len());
                for a in args {
                    avs.push(self.eval_cached(tm, a, cache)?);
                }
                match fv {
                    Value::Function { mappings, default } => {
                        for (tuple, image) in &mappings {
                            if tuple == &avs {
                                return Ok(image.clone());
                            }
                        }
                        match default {
                            Some(d) => Ok(*d),
                            None => Err(EvalError::IncompleteFunction(t)),
                        }
                    }
                    _ => Err(EvalError::TypeMismatch(fun)),
                }
            }
            TermKind::BvConst { width, bits } => Ok(Value::BitVector {
                width: *width,
                bits: bits.clone(),
            }),
        }
    }
}
