//! The closed enumeration of physical flow types tied together by buses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical flow type, each with its own unit and conservation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    /// Electrical power, MW.
    Power,
    /// Natural gas fuel input, MW thermal (lower heating value).
    NaturalGas,
    /// Hydrogen fuel input, MW thermal.
    Hydrogen,
    /// District heat, MW at district-heating temperature level.
    Heat,
    /// Low-temperature local heat, MW.
    LocalHeat,
    /// Intermediate waste heat recovered from a heat pump or CHP, MW.
    WasteHeat,
    /// District-to-local heat transfer, MW.
    FwHeat,
    /// Local-to-district excess heat transfer, MW.
    NwExcessHeat,
    /// Solar-thermal inflow to the stratified store, MW.
    StHeat,
    /// Heat-pump inflow to the stratified store, MW.
    WpHeat,
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Carrier::Power => "power",
            Carrier::NaturalGas => "natural_gas",
            Carrier::Hydrogen => "hydrogen",
            Carrier::Heat => "heat",
            Carrier::LocalHeat => "local_heat",
            Carrier::WasteHeat => "waste_heat",
            Carrier::FwHeat => "fw_heat",
            Carrier::NwExcessHeat => "nw_excess_heat",
            Carrier::StHeat => "st_heat",
            Carrier::WpHeat => "wp_heat",
        };
        f.write_str(s)
    }
}
