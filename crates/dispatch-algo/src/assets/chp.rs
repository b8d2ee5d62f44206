//! Cogeneration unit: fuel input, electrical power,
//! district heat, CO2 emissions, and recoverable waste heat coupled to the
//! commitment state and electrical power output via chord linearization,
//! with an optional energy-weighted hydrogen/natural-gas fuel split.
//!
//! Grounded on `original_source/burn4h2/blocks/chp.py`.

use dispatch_core::{Carrier, DispatchError, DispatchResult, Direction, Port, TimeIndex};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, Chord, HasPorts};

/// Hydrogen heating value, MJ/kg.
const HV_H2: f64 = 120.0;
/// Natural gas heating value, MJ/kg.
const HV_NG: f64 = 47.0;
/// Hydrogen density, kg/m3.
const RHO_H2: f64 = 0.09;
/// Natural gas density, kg/m3.
const RHO_NG: f64 = 0.68;

/// Volumetric admixture factors this asset accepts.
pub const ALLOWED_ADMIXTURE: [f64; 4] = [0.0, 0.3, 0.5, 1.0];

#[derive(Debug, Clone)]
pub struct ChpParams {
    pub name: String,
    pub power: (f64, f64),
    pub gas: (f64, f64),
    pub heat: (f64, f64),
    pub co2: (f64, f64),
    pub waste_heat: (f64, f64),
    pub hydrogen_admixture_factor: f64,
    pub forced_operation_time: Option<u32>,
}

impl ChpParams {
    pub fn validate(&self) -> DispatchResult<()> {
        if !ALLOWED_ADMIXTURE.contains(&self.hydrogen_admixture_factor) {
            return Err(DispatchError::InvalidAdmixture(
                self.hydrogen_admixture_factor,
                self.name.clone(),
            ));
        }
        Ok(())
    }

    /// The energy-weighted hydrogen share of the fuel mix, `phi_H2`.
    /// Zero when admixture is disabled.
    pub fn phi_h2(&self) -> f64 {
        let f = self.hydrogen_admixture_factor;
        if f <= 0.0 {
            return 0.0;
        }
        let e_h2 = RHO_H2 * HV_H2;
        let e_ng = RHO_NG * HV_NG;
        (f * e_h2) / (f * e_h2 + (1.0 - f) * e_ng)
    }
}

pub struct ChpVars {
    pub name: String,
    pub bin: Vec<Variable>,
    pub gas: Vec<Variable>,
    pub power: Vec<Variable>,
    pub heat: Vec<Variable>,
    pub co2: Vec<Variable>,
    pub waste_heat: Vec<Variable>,
    /// Present only when `hydrogen_admixture_factor > 0`.
    pub hydrogen: Option<Vec<Variable>>,
    /// Present only when `hydrogen_admixture_factor > 0`; otherwise `gas`
    /// itself is the natural-gas port.
    pub natural_gas: Option<Vec<Variable>>,
    params: ChpParams,
}

impl ChpVars {
    /// The energy-weighted hydrogen share this unit was built with.
    pub fn phi_h2(&self) -> f64 {
        self.params.phi_h2()
    }
}

pub fn build_vars(vars: &mut ProblemVariables, time: TimeIndex, params: ChpParams) -> ChpVars {
    let n = time.len();
    let bin: Vec<Variable> = (0..n).map(|_| vars.add(variable().binary())).collect();
    let gas: Vec<Variable> = (0..n)
        .map(|_| vars.add(variable().min(0.0)))
        .collect();
    let power: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let heat: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let co2: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let waste_heat: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0))).collect();

    let admixture_enabled = params.hydrogen_admixture_factor > 0.0;
    let hydrogen = admixture_enabled
        .then(|| (0..n).map(|_| vars.add(variable().min(0.0))).collect());
    let natural_gas = admixture_enabled
        .then(|| (0..n).map(|_| vars.add(variable().min(0.0))).collect());

    ChpVars {
        name: params.name.clone(),
        bin,
        gas,
        power,
        heat,
        co2,
        waste_heat,
        hydrogen,
        natural_gas,
        params,
    }
}

impl AddConstraints for ChpVars {
    fn add_constraints<S: SolverModel>(&self, mut problem: S) -> S {
        let p = &self.params;
        let gas_chord = Chord::from_envelope(p.gas.0, p.gas.1, p.power.0, p.power.1);
        let heat_chord = Chord::from_envelope(p.heat.0, p.heat.1, p.power.0, p.power.1);
        let waste_chord = Chord::from_envelope(p.waste_heat.0, p.waste_heat.1, p.power.0, p.power.1);
        let co2_chord = Chord::from_envelope(p.co2.0, p.co2.1, p.power.0, p.power.1);
        let phi_h2 = p.phi_h2();

        for t in 0..self.bin.len() {
            let bin = self.bin[t];
            let power = self.power[t];
            problem = problem
                .with(constraint!(power <= p.power.1 * bin))
                .with(constraint!(p.power.0 * bin <= power))
                .with(constraint!(self.gas[t] == gas_chord.expr(power, bin)))
                .with(constraint!(self.heat[t] == heat_chord.expr(power, bin)));

            match (&self.hydrogen, &self.natural_gas) {
                (Some(hydrogen), Some(natural_gas)) => {
                    // CO2 coupling is scaled down by the H2 share when
                    // admixture is enabled; H2 combustion itself emits none.
                    let co2_expr: Expression = co2_chord.expr(power, bin) * (1.0 - phi_h2);
                    problem = problem
                        .with(constraint!(self.co2[t] == co2_expr))
                        .with(constraint!(hydrogen[t] == phi_h2 * self.gas[t]))
                        .with(constraint!(natural_gas[t] == (1.0 - phi_h2) * self.gas[t]));
                }
                _ => {
                    problem = problem.with(constraint!(self.co2[t] == co2_chord.expr(power, bin)));
                }
            }

            problem = problem
                .with(constraint!(self.waste_heat[t] == waste_chord.expr(power, bin)));
        }

        if let Some(forced) = p.forced_operation_time {
            let total: Expression = self.bin.iter().fold(Expression::from(0.0), |acc, &b| acc + b);
            problem = problem.with(constraint!(total >= forced as f64));
        }

        problem
    }
}

impl HasPorts for ChpVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        let mut ports = Vec::new();
        for t in 0..self.bin.len() {
            ports.push(Port::new(&self.name, Carrier::Power, Direction::Source, t, self.power[t]));
            ports.push(Port::new(&self.name, Carrier::Heat, Direction::Source, t, self.heat[t]));
            ports.push(Port::new(&self.name, Carrier::WasteHeat, Direction::Source, t, self.waste_heat[t]));
            match (&self.hydrogen, &self.natural_gas) {
                (Some(hydrogen), Some(natural_gas)) => {
                    ports.push(Port::new(&self.name, Carrier::Hydrogen, Direction::Sink, t, hydrogen[t]));
                    ports.push(Port::new(&self.name, Carrier::NaturalGas, Direction::Sink, t, natural_gas[t]));
                }
                _ => {
                    ports.push(Port::new(&self.name, Carrier::NaturalGas, Direction::Sink, t, self.gas[t]));
                }
            }
        }
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_2_params() -> ChpParams {
        ChpParams {
            name: "chp_1".into(),
            power: (1.0, 10.0),
            gas: (2.0, 15.0),
            heat: (0.5, 6.0),
            co2: (0.4, 3.0),
            waste_heat: (0.0, 1.0),
            hydrogen_admixture_factor: 0.0,
            forced_operation_time: None,
        }
    }

    #[test]
    fn phi_h2_is_zero_when_admixture_disabled() {
        assert_eq!(scenario_2_params().phi_h2(), 0.0);
    }

    #[test]
    fn phi_h2_matches_energy_weighted_split_for_f_0_3() {
        let mut params = scenario_2_params();
        params.hydrogen_admixture_factor = 0.3;
        let phi = params.phi_h2();
        // energy-weighted split at f=0.3 works out to hydrogen(1) ~= 1.265 / 10 = 0.1265
        assert!((phi - 0.1265).abs() < 1e-3);
    }

    #[test]
    fn validate_rejects_out_of_enum_admixture() {
        let mut params = scenario_2_params();
        params.hydrogen_admixture_factor = 0.42;
        let err = params.validate().unwrap_err();
        assert!(matches!(err, DispatchError::InvalidAdmixture(_, _)));
    }

    #[test]
    fn chord_matches_heat_envelope_at_power_max() {
        let params = scenario_2_params();
        let chord = Chord::from_envelope(params.heat.0, params.heat.1, params.power.0, params.power.1);
        // heat = (6-0.5)/(10-1) * 10 + (6 - a*10) with bin=1 -> 6.0
        let heat_at_max = chord.a * 10.0 + chord.b;
        assert!((heat_at_max - 6.0).abs() < 1e-9);
    }
}
