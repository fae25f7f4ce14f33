//! Test utilities
//!
//! Hand-written in-memory implementations of the repository and external
//! ports, plus fixtures with sensible defaults. The in-memory repos back
//! the service-level tests so flows like registration, XP grants and
//! session rotation run without a database or network.
//!
//! The mocks are written by hand rather than generated: each one keeps
//! just enough state (a `HashMap` or `Vec` behind a `RwLock`) to honor
//! the port's contract, and tests can reach into that state directly
//! when an assertion needs it.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
