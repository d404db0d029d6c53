//! Steppable maze generators and solvers, plus a terminal host to watch them.
//!
//! Every algorithm is a value implementing [`stepping::Stepper`]: build it
//! with its constructor, then call `step()` to get the next state. States
//! share their grid until a step carves into it, so keeping old states for
//! rewinding or racing several solvers on one maze costs little.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod generators;
pub mod maze;
pub mod solvers;
pub mod stepping;

pub use error::{LabError, Result};
