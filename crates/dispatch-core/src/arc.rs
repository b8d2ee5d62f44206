//! Arcs: named, undirected bindings between a source port and a sink port
//! on the same carrier.
//!
//! Arcs do not carry variables of their own. The bus composer (in
//! `dispatch-algo`) walks the arc list and, per `(bus, carrier, hour)`,
//! sums the flows of every port connected to that bus.

use crate::carrier::Carrier;
use crate::error::{DispatchError, DispatchResult};

/// An unordered binding of one source port to one sink port on the same
/// carrier, identified by the owning assets' names rather than a live
/// variable handle — resolution against actual port variables happens in
/// the model assembler once all assets are materialized.
#[derive(Debug, Clone)]
pub struct Arc {
    pub bus: String,
    pub asset: String,
    pub carrier: Carrier,
}

impl Arc {
    pub fn new(bus: impl Into<String>, asset: impl Into<String>, carrier: Carrier) -> Self {
        Self {
            bus: bus.into(),
            asset: asset.into(),
            carrier,
        }
    }
}

/// Checks that every arc in a proposed connection list agrees on carrier
/// with the bus it targets; the composer forbids cross-carrier arcs.
pub fn check_carrier_match(expected: Carrier, arcs: &[Arc]) -> DispatchResult<()> {
    for arc in arcs {
        if arc.carrier != expected {
            return Err(DispatchError::CarrierMismatch(format!(
                "arc from '{}' to bus '{}' carries {} but bus expects {}",
                arc.asset, arc.bus, arc.carrier, expected
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_carriers_pass() {
        let arcs = vec![Arc::new("heat_bus", "chp_1", Carrier::Heat)];
        assert!(check_carrier_match(Carrier::Heat, &arcs).is_ok());
    }

    #[test]
    fn mismatched_carrier_fails() {
        let arcs = vec![Arc::new("heat_bus", "chp_1", Carrier::Power)];
        let err = check_carrier_match(Carrier::Heat, &arcs).unwrap_err();
        assert!(matches!(err, DispatchError::CarrierMismatch(_)));
    }
}
