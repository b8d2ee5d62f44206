//! The asset library: one module per physical unit, each exposing the
//! same two-phase construction contract used throughout this crate:
//!
//! 1. `build_vars` declares the asset's per-hour variables on the shared
//!    `good_lp::ProblemVariables` and returns a `*Vars` struct of
//!    variable handles plus the asset's [`Port`]s.
//! 2. [`AddConstraints::add_constraints`] emits the asset's constraints
//!    onto an in-progress solver model. It is generic over the concrete
//!    `SolverModel` type so the same asset code runs unchanged whichever
//!    backend `dispatch-algo::solver` selected.
//!
//! Variables are declared before a solver backend is chosen (`good_lp`
//! requires `ProblemVariables::minimise(..).using(..)` before any
//! `.with(constraint)` calls), so `build_vars` never takes a `SolverModel`.

use dispatch_core::Port;
use good_lp::{Expression, SolverModel, Variable};

pub mod battery;
pub mod buses;
pub mod chp;
pub mod heat_pump;
pub mod pv;
pub mod simple_store;
pub mod solar_thermal;
pub mod stratified_store;

/// Implemented by every asset's `*Vars` struct: emits the asset's
/// constraints onto `problem`, generic over the chosen solver backend.
pub trait AddConstraints {
    fn add_constraints<S: SolverModel>(&self, problem: S) -> S;
}

/// Implemented by every asset's `*Vars` struct: returns the ports other
/// assets' buses connect to via arcs.
pub trait HasPorts {
    fn ports(&self) -> Vec<Port<Variable>>;
}

/// Chord linearization coefficients for `q(t) = a*x(t) + b*bin(t)` fixed by
/// the quantity's min/max envelope over the asset's extensive variable's
/// min/max envelope. Shared by the cogeneration unit and anywhere else a
/// two-point affine coupling is needed.
#[derive(Debug, Clone, Copy)]
pub struct Chord {
    pub a: f64,
    pub b: f64,
}

impl Chord {
    pub fn from_envelope(q_min: f64, q_max: f64, x_min: f64, x_max: f64) -> Self {
        let a = (q_max - q_min) / (x_max - x_min);
        let b = q_max - a * x_max;
        Self { a, b }
    }

    /// `a*x + b*bin` as a `good_lp` expression.
    pub fn expr(&self, x: Variable, bin: Variable) -> Expression {
        self.a * x + self.b * bin
    }
}
