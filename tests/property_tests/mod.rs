//! Property-based tests for model-based projection.
//!
//! Random cubes are generated together with models that satisfy them;
//! the suites then check the projector's universal invariants.

mod projection_properties;
