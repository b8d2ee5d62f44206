//! Wires assets and buses together into per-hour carrier conservation.
//!
//! Every port an asset or bus exposes is tagged with `(owner, carrier,
//! direction, hour)`. Since each [`Carrier`] variant denotes exactly one
//! shared pool (district heat, local heat, the FW-to-NW transfer channel,
//! and so on), conservation per carrier per hour reduces to a single sum:
//! sources push flow in, sinks draw it out, and the two must balance.
//!
//! This mirrors the per-hour `Var`/`Constraint` wiring in
//! `original_source/burn4h2/blocks/grid.py`, generalized from bespoke
//! `demand == sum(...)` lines per grid class into one carrier-indexed fold.

use std::collections::HashMap;

use dispatch_core::{Arc, Carrier, DispatchError, DispatchResult, Port};
use good_lp::{constraint, Expression, SolverModel, Variable};

/// Emits `sum(sources) - sum(sinks) == 0` for every `(carrier, hour)` pair
/// present in `ports`, across every asset and bus that owns a port on it.
pub fn add_conservation_constraints<S: SolverModel>(problem: S, ports: &[Port<Variable>]) -> S {
    let mut balances: HashMap<(Carrier, usize), Expression> = HashMap::new();
    for port in ports {
        let entry = balances
            .entry((port.carrier, port.hour))
            .or_insert_with(|| Expression::from(0.0));
        *entry += port.sign() * port.variable;
    }

    let mut problem = problem;
    for expr in balances.into_values() {
        problem = problem.with(constraint!(expr == 0.0));
    }
    problem
}

/// Cross-checks the declared wiring diagram against what assets actually
/// expose: every arc's `(asset, carrier)` must appear among `ports`, and
/// every port's carrier must be reachable via at least one arc into its
/// bus. Catches a misconfigured arc list before the solver ever sees it.
pub fn validate_arcs(ports: &[Port<Variable>], arcs: &[Arc]) -> DispatchResult<()> {
    let port_owners: std::collections::HashSet<(&str, Carrier)> =
        ports.iter().map(|p| (p.owner.as_str(), p.carrier)).collect();

    for arc in arcs {
        if !port_owners.contains(&(arc.asset.as_str(), arc.carrier)) {
            return Err(DispatchError::InputMissing(format!(
                "arc wires '{}' onto bus '{}' via {}, but that asset exposes no such port",
                arc.asset, arc.bus, arc.carrier
            )));
        }
    }

    let wired_carriers: std::collections::HashSet<Carrier> = arcs.iter().map(|a| a.carrier).collect();
    for port in ports {
        if !wired_carriers.contains(&port.carrier) {
            return Err(DispatchError::InputMissing(format!(
                "'{}' exposes a {} port with no arc connecting it to any bus",
                port.owner, port.carrier
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::Direction;
    use good_lp::solvers::clarabel::clarabel;
    use good_lp::ProblemVariables;

    #[test]
    fn balanced_source_and_sink_yields_one_constraint_per_hour() {
        let mut vars = ProblemVariables::new();
        let source_var = vars.add(good_lp::variable().min(0.0));
        let sink_var = vars.add(good_lp::variable().min(0.0));
        let ports = vec![
            Port::new("chp_1", Carrier::Heat, Direction::Source, 0, source_var),
            Port::new("heat_bus", Carrier::Heat, Direction::Sink, 0, sink_var),
        ];
        // Two ports sharing one (carrier, hour) key collapse to one constraint;
        // exercised indirectly via add_conservation_constraints not panicking.
        let problem = vars.minimise(Expression::from(0.0)).using(clarabel);
        let _ = add_conservation_constraints(problem, &ports);
    }

    #[test]
    fn arc_missing_matching_port_is_rejected() {
        let mut vars = ProblemVariables::new();
        let v = vars.add(good_lp::variable().min(0.0));
        let ports = vec![Port::new("chp_1", Carrier::Heat, Direction::Source, 0, v)];
        let arcs = vec![Arc::new("heat_bus", "chp_1", Carrier::Power)];
        let err = validate_arcs(&ports, &arcs).unwrap_err();
        assert!(matches!(err, DispatchError::InputMissing(_)));
    }

    #[test]
    fn fully_wired_ports_pass_validation() {
        let mut vars = ProblemVariables::new();
        let v = vars.add(good_lp::variable().min(0.0));
        let ports = vec![Port::new("chp_1", Carrier::Heat, Direction::Source, 0, v)];
        let arcs = vec![Arc::new("heat_bus", "chp_1", Carrier::Heat)];
        assert!(validate_arcs(&ports, &arcs).is_ok());
    }
}
