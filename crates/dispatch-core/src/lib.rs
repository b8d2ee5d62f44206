//! Solver-agnostic primitives shared by the dispatch model: carriers,
//! ports, arcs, the planning horizon, and the unified error type.
//!
//! This crate deliberately does not depend on `good_lp` — variable handles
//! are generic type parameters here (`Port<V>`) and are instantiated with
//! `good_lp::Variable` only in `dispatch-algo`, which is where the MILP
//! actually gets built.

pub mod arc;
pub mod carrier;
pub mod error;
pub mod port;
pub mod time_index;

pub use arc::{check_carrier_match, Arc};
pub use carrier::Carrier;
pub use error::{DispatchError, DispatchResult};
pub use port::{Direction, Port, PortSet};
pub use time_index::TimeIndex;
