//! Solar-thermal collector: price-taking, heat output pinned to an
//! exogenous profile with no dispatch freedom of its own. Its whole output
//! feeds the stratified store, matching the single arc the collector
//! exposes in `original_source/burn4h2/blocks/collector.py`.

use dispatch_core::{Carrier, DispatchError, DispatchResult, Direction, Port};
use good_lp::{variable, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone)]
pub struct SolarThermalParams {
    pub name: String,
    /// Heat output per hour, MW, one entry per time step.
    pub profile: Vec<f64>,
}

impl SolarThermalParams {
    pub fn validate(&self, time_len: usize) -> DispatchResult<()> {
        if self.profile.len() != time_len {
            return Err(DispatchError::ConfigInvalid(format!(
                "{}: solar thermal profile has {} entries, expected {}",
                self.name,
                self.profile.len(),
                time_len
            )));
        }
        Ok(())
    }
}

pub struct SolarThermalVars {
    pub name: String,
    pub heat: Vec<Variable>,
}

pub fn build_vars(vars: &mut ProblemVariables, params: &SolarThermalParams) -> SolarThermalVars {
    let heat = params
        .profile
        .iter()
        .map(|&q| vars.add(variable().min(q).max(q)))
        .collect();
    SolarThermalVars {
        name: params.name.clone(),
        heat,
    }
}

impl AddConstraints for SolarThermalVars {
    fn add_constraints<S: SolverModel>(&self, problem: S) -> S {
        let _ = &self.heat;
        problem
    }
}

impl HasPorts for SolarThermalVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        self.heat
            .iter()
            .enumerate()
            .map(|(t, &q)| Port::new(&self.name, Carrier::StHeat, Direction::Source, t, q))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_profile_length_mismatch() {
        let params = SolarThermalParams {
            name: "solar_1".into(),
            profile: vec![0.0, 1.2, 0.8],
        };
        assert!(params.validate(3).is_ok());
        assert!(params.validate(4).is_err());
    }
}
