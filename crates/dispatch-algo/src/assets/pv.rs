//! Photovoltaic generator: power output pinned to an exogenous, normalized
//! capacity-factor profile scaled by installed power and inverter
//! efficiency. No binaries, no dispatch freedom.

use dispatch_core::{Carrier, DispatchError, DispatchResult, Direction, Port};
use good_lp::{variable, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone)]
pub struct PvParams {
    pub name: String,
    pub installed_power: f64,
    pub inverter_efficiency: f64,
    /// Normalized capacity factor per hour, one entry per time step.
    pub profile: Vec<f64>,
}

impl PvParams {
    pub fn validate(&self, time_len: usize) -> DispatchResult<()> {
        if self.profile.len() != time_len {
            return Err(DispatchError::ConfigInvalid(format!(
                "{}: pv profile has {} entries, expected {}",
                self.name,
                self.profile.len(),
                time_len
            )));
        }
        Ok(())
    }
}

pub struct PvVars {
    pub name: String,
    pub power: Vec<Variable>,
}

pub fn build_vars(vars: &mut ProblemVariables, params: &PvParams) -> PvVars {
    let power = params
        .profile
        .iter()
        .map(|cf| {
            let p = params.installed_power * params.inverter_efficiency * cf;
            vars.add(variable().min(p).max(p))
        })
        .collect();
    PvVars {
        name: params.name.clone(),
        power,
    }
}

impl AddConstraints for PvVars {
    fn add_constraints<S: SolverModel>(&self, problem: S) -> S {
        // Output is pinned at construction time via a fixed-bound variable;
        // no additional constraint is needed.
        let _ = &self.power;
        problem
    }
}

impl HasPorts for PvVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        self.power
            .iter()
            .enumerate()
            .map(|(t, &p)| Port::new(&self.name, Carrier::Power, Direction::Source, t, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_profile_length_mismatch() {
        let params = PvParams {
            name: "pv_1".into(),
            installed_power: 5.0,
            inverter_efficiency: 0.95,
            profile: vec![0.1, 0.2],
        };
        assert!(params.validate(3).is_err());
        assert!(params.validate(2).is_ok());
    }
}
