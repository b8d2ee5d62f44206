//! Asset models, bus wiring, model assembly, and the solver driver for the
//! sector-coupled plant dispatch optimization.
//!
//! - [`assets`]: one module per physical unit (CHP, heat pump, PV, solar
//!   thermal, battery, the three simple stores, the stratified store) plus
//!   the bus models they connect through.
//! - [`composer`]: per-carrier-per-hour conservation and wiring-diagram
//!   validation.
//! - [`model`]: binds exogenous inputs and asset instances into one
//!   [`model::DispatchModel`] with its objective.
//! - [`solver`]: picks a backend, solves, and reconciles costs.

pub mod assets;
pub mod composer;
pub mod model;
pub mod solver;

pub use model::{build_model, DispatchModel, ModelInputs, ScalarPrices};
pub use solver::{solve, SolveOutcome, SolverKind, SolverOptions};
