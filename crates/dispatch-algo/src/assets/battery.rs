//! Battery storage, with optional cyclic-behaviour bound: at most one
//! charge/discharge transition per `cyclic_behaviour`-hour window, encoded
//! via a modulo identity over auxiliary integer variables.
//!
//! Grounded on `original_source/burn4h2/blocks/storage.py` (battery block).

use dispatch_core::{Carrier, Direction, Port, TimeIndex};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone)]
pub struct BatteryParams {
    pub name: String,
    pub power_max: f64,
    pub content_min: f64,
    pub content_max: f64,
    pub initial_content: f64,
    /// Enforces at most one charge/discharge transition per this many
    /// hours, when set.
    pub cyclic_behaviour: Option<u32>,
}

pub struct BatteryVars {
    pub name: String,
    pub power_charging: Vec<Variable>,
    pub power_discharging: Vec<Variable>,
    pub power_content: Vec<Variable>,
    pub bin_charge: Vec<Variable>,
    pub bin_discharge: Vec<Variable>,
    pub bin_switch: Vec<Variable>,
    pub aux_remainder: Vec<Variable>,
    pub aux_quotient: Vec<Variable>,
    pub cyclic_switch_bin: Vec<Variable>,
    params: BatteryParams,
}

pub fn build_vars(vars: &mut ProblemVariables, time: TimeIndex, params: BatteryParams) -> BatteryVars {
    let n = time.len();
    let power_charging = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let power_discharging = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let power_content = (0..n)
        .map(|_| vars.add(variable().min(params.content_min).max(params.content_max)))
        .collect();
    let bin_charge = (0..n).map(|_| vars.add(variable().binary())).collect();
    let bin_discharge = (0..n).map(|_| vars.add(variable().binary())).collect();
    let bin_switch = (0..n).map(|_| vars.add(variable().binary())).collect();
    let aux_remainder = (0..n)
        .map(|_| vars.add(variable().integer().min(0.0).max(3.0)))
        .collect();
    let aux_quotient = (0..n)
        .map(|_| vars.add(variable().integer().min(0.0)))
        .collect();
    let cyclic_switch_bin = (0..n).map(|_| vars.add(variable().binary())).collect();

    BatteryVars {
        name: params.name.clone(),
        power_charging,
        power_discharging,
        power_content,
        bin_charge,
        bin_discharge,
        bin_switch,
        aux_remainder,
        aux_quotient,
        cyclic_switch_bin,
        params,
    }
}

impl AddConstraints for BatteryVars {
    fn add_constraints<S: SolverModel>(&self, mut problem: S) -> S {
        let p = &self.params;
        let n = self.power_charging.len();

        for t in 0..n {
            let charging = self.power_charging[t];
            let discharging = self.power_discharging[t];
            let bin_charge = self.bin_charge[t];
            let bin_discharge = self.bin_discharge[t];
            let content = self.power_content[t];

            problem = problem
                .with(constraint!(charging <= p.power_max * bin_charge))
                .with(constraint!(discharging <= p.power_max * bin_discharge))
                .with(constraint!(bin_charge + bin_discharge == 1.0));

            let balance: Expression = discharging - charging;
            let prior: Expression = if t == 0 {
                Expression::from(p.initial_content)
            } else {
                self.power_content[t - 1].into()
            };
            problem = problem.with(constraint!(content == prior - balance));
        }

        if let Some(period) = p.cyclic_behaviour {
            if n == 0 {
                return problem;
            }
            // No prior hour to compare against at t=0, so it never switches.
            problem = problem.with(constraint!(self.cyclic_switch_bin[0] == 0.0));

            for t in 1..n {
                let switch_state: Expression = (self.bin_charge[t] - self.bin_discharge[t])
                    - (self.bin_charge[t - 1] - self.bin_discharge[t - 1]);
                let bin_switch = self.bin_switch[t];
                let aux_remainder = self.aux_remainder[t];
                let aux_quotient = self.aux_quotient[t];

                problem = problem
                    .with(constraint!(switch_state.clone() >= -2.0 * bin_switch))
                    .with(constraint!(2.0 * bin_switch >= switch_state.clone()))
                    .with(constraint!(
                        switch_state + 2.0 == 4.0 * aux_quotient + aux_remainder
                    ));
                // aux_remainder * bin_switch == 0 is bilinear; both factors
                // are bounded integers so it is enforced via a big-M pair
                // instead, keeping the whole model MILP-linear.
                problem = problem
                    .with(constraint!(aux_remainder <= 3.0 * (1.0 - bin_switch)));

                let at_boundary = (t as u32) % period == 0;
                if at_boundary {
                    problem = problem.with(constraint!(self.cyclic_switch_bin[t] == 0.0));
                } else {
                    problem = problem.with(constraint!(self.cyclic_switch_bin[t] == bin_switch));
                }
            }

            let period = period as usize;
            let mut t = period;
            while t <= n {
                let window_start = t - period;
                let window: Expression = self.cyclic_switch_bin[window_start..t]
                    .iter()
                    .fold(Expression::from(0.0), |acc, &b| acc + b);
                problem = problem.with(constraint!(window <= 1.0));
                t += period;
            }
        }

        problem
    }
}

impl HasPorts for BatteryVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        let mut ports = Vec::new();
        for t in 0..self.power_charging.len() {
            ports.push(Port::new(&self.name, Carrier::Power, Direction::Sink, t, self.power_charging[t]));
            ports.push(Port::new(&self.name, Carrier::Power, Direction::Source, t, self.power_discharging[t]));
        }
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BatteryParams {
        BatteryParams {
            name: "battery_1".into(),
            power_max: 2.0,
            content_min: 0.0,
            content_max: 10.0,
            initial_content: 0.0,
            cyclic_behaviour: Some(24),
        }
    }

    #[test]
    fn build_vars_allocates_one_set_of_handles_per_hour() {
        let mut vars = ProblemVariables::new();
        let time = TimeIndex::new(48);
        let built = build_vars(&mut vars, time, params());
        assert_eq!(built.power_charging.len(), 48);
        assert_eq!(built.cyclic_switch_bin.len(), 48);
    }

    #[test]
    fn no_cyclic_behaviour_skips_switch_machinery_at_solve_time() {
        let mut p = params();
        p.cyclic_behaviour = None;
        let mut vars = ProblemVariables::new();
        let time = TimeIndex::new(10);
        let built = build_vars(&mut vars, time, p);
        assert_eq!(built.bin_switch.len(), 10);
    }
}
