//! Port and arc primitives tying an asset's flow variables to a bus.
//!
//! `dispatch-core` stays solver-agnostic (it does not depend on `good_lp`),
//! so [`Port`] and [`PortSet`] are generic over whatever variable handle the
//! caller's model builder uses (`dispatch-algo` instantiates them with
//! `good_lp::Variable`, which is `Copy`, so cloning a handle is free).

use crate::carrier::Carrier;

/// Whether a port sources flow into a bus or sinks flow from one.
///
/// Purely a labeling convention: conservation uses signed contribution
/// (sources add, sinks subtract on the bus side), not the direction tag
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Source,
    Sink,
}

/// A tuple (owner asset, carrier, direction, hour, flow variable handle).
///
/// `hour` is the 0-based time-step index, letting the bus composer group
/// ports by `(carrier, hour)` without threading a separate time axis
/// through every asset's port list.
#[derive(Debug, Clone)]
pub struct Port<V> {
    pub owner: String,
    pub carrier: Carrier,
    pub direction: Direction,
    pub hour: usize,
    pub variable: V,
}

impl<V> Port<V> {
    pub fn new(
        owner: impl Into<String>,
        carrier: Carrier,
        direction: Direction,
        hour: usize,
        variable: V,
    ) -> Self {
        Self {
            owner: owner.into(),
            carrier,
            direction,
            hour,
            variable,
        }
    }

    /// Signed contribution of this port to its bus's balance: +1 for a
    /// source, -1 for a sink.
    pub fn sign(&self) -> f64 {
        match self.direction {
            Direction::Source => 1.0,
            Direction::Sink => -1.0,
        }
    }
}

/// The set of ports an asset currently exposes.
///
/// A thin ordered collection over `Port<V>`, with `remove_by_carrier`
/// available for callers that build their port list incrementally and need
/// to rebind a carrier to a different variable mid-construction.
#[derive(Debug, Clone, Default)]
pub struct PortSet<V>(Vec<Port<V>>);

impl<V> PortSet<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, port: Port<V>) {
        self.0.push(port);
    }

    /// Removes every port on the given carrier, returning how many were
    /// removed. Used before rebinding a port to a new variable.
    pub fn remove_by_carrier(&mut self, carrier: Carrier) -> usize {
        let before = self.0.len();
        self.0.retain(|p| p.carrier != carrier);
        before - self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port<V>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Port<V>] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_then_readd_does_not_leak_old_binding() {
        let mut ports: PortSet<u32> = PortSet::new();
        ports.push(Port::new("chp_1", Carrier::NaturalGas, Direction::Sink, 0, 1));
        assert_eq!(ports.as_slice().len(), 1);

        let removed = ports.remove_by_carrier(Carrier::NaturalGas);
        assert_eq!(removed, 1);
        assert!(ports.as_slice().is_empty());

        ports.push(Port::new("chp_1", Carrier::NaturalGas, Direction::Sink, 0, 2));
        ports.push(Port::new("chp_1", Carrier::Hydrogen, Direction::Sink, 0, 3));
        assert_eq!(ports.as_slice().len(), 2);
        assert_eq!(ports.as_slice()[0].variable, 2);
    }

    #[test]
    fn sign_reflects_direction() {
        let source: Port<u32> = Port::new("pv", Carrier::Power, Direction::Source, 0, 0);
        let sink: Port<u32> = Port::new("battery", Carrier::Power, Direction::Sink, 0, 0);
        assert_eq!(source.sign(), 1.0);
        assert_eq!(sink.sign(), -1.0);
    }
}
