//! Two-zone stratified thermal store: the only asset owning a
//! thermodynamic state shared between zones through one physical vessel
//! (the coupled-volume constraint).
//!
//! No standalone Python block for this asset exists in the reference
//! material; the zone balance and port wiring follow the per-hour
//! `Var`/`Constraint`/`Port` idiom of `grid.py`'s `LocalHeatGrid` and
//! `HeatGrid` blocks, generalized to a two-state-variable asset.

use dispatch_core::{Carrier, Direction, Port, TimeIndex};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

/// Loss rate, shared by both zones.
pub const K_LOSS: f64 = 0.0534;
pub const DELTA_T_Z1: f64 = 38.0;
pub const DELTA_T_Z2: f64 = 23.0;
pub const V_MAX: f64 = 2000.0;
const WATER_DENSITY: f64 = 1000.0;
const SPECIFIC_HEAT: f64 = 4.1868 / 1000.0;

/// Energy density of a zone, MWh/m3, from its temperature lift.
pub fn energy_density(delta_t: f64) -> f64 {
    WATER_DENSITY * SPECIFIC_HEAT * delta_t / 3600.0
}

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone)]
pub struct StratifiedStoreParams {
    pub name: String,
    pub heat_max: f64,
    /// Fraction of `V_MAX` initially filled into Z1 (the remainder is Z2).
    pub initial_volume_share_z1: f64,
    pub initial_fill: f64,
    pub restrict_fw_discharge_in_winter: bool,
}

pub struct StratifiedStoreVars {
    pub name: String,
    pub q_st: Vec<Variable>,
    pub q_wp: Vec<Variable>,
    pub q_z1_fw: Vec<Variable>,
    pub q_z1_nw: Vec<Variable>,
    pub q_z2_nw: Vec<Variable>,
    pub u_z1: Vec<Variable>,
    pub u_z2: Vec<Variable>,
    time: TimeIndex,
    params: StratifiedStoreParams,
}

pub fn build_vars(
    vars: &mut ProblemVariables,
    time: TimeIndex,
    params: StratifiedStoreParams,
) -> StratifiedStoreVars {
    let n = time.len();
    let q_st = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let q_wp = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let q_z1_fw = (0..n).map(|_| vars.add(variable().min(0.0).max(params.heat_max))).collect();
    let q_z1_nw = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let q_z2_nw = (0..n).map(|_| vars.add(variable().min(0.0))).collect();
    let e_z1 = energy_density(DELTA_T_Z1);
    let e_z2 = energy_density(DELTA_T_Z2);
    let u_z1 = (0..n).map(|_| vars.add(variable().min(0.0).max(V_MAX * e_z1))).collect();
    let u_z2 = (0..n).map(|_| vars.add(variable().min(0.0).max(V_MAX * e_z2))).collect();

    StratifiedStoreVars {
        name: params.name.clone(),
        q_st,
        q_wp,
        q_z1_fw,
        q_z1_nw,
        q_z2_nw,
        u_z1,
        u_z2,
        time,
        params,
    }
}

impl AddConstraints for StratifiedStoreVars {
    fn add_constraints<S: SolverModel>(&self, mut problem: S) -> S {
        let p = &self.params;
        let e_z1 = energy_density(DELTA_T_Z1);
        let e_z2 = energy_density(DELTA_T_Z2);
        let initial_z1 = V_MAX * p.initial_volume_share_z1 * e_z1 * p.initial_fill;
        let initial_z2 = V_MAX * (1.0 - p.initial_volume_share_z1) * e_z2 * p.initial_fill;

        for t in 0..self.u_z1.len() {
            let u_z1 = self.u_z1[t];
            let u_z2 = self.u_z2[t];
            let q_st = self.q_st[t];
            let q_wp = self.q_wp[t];
            let q_z1_fw = self.q_z1_fw[t];
            let q_z1_nw = self.q_z1_nw[t];
            let q_z2_nw = self.q_z2_nw[t];

            let prior_z1: Expression = if t == 0 {
                Expression::from(initial_z1)
            } else {
                ((1.0 - K_LOSS) * self.u_z1[t - 1]).into()
            };
            let prior_z2: Expression = if t == 0 {
                Expression::from(initial_z2)
            } else {
                ((1.0 - K_LOSS) * self.u_z2[t - 1]).into()
            };

            problem = problem
                .with(constraint!(u_z1 == prior_z1 + (q_st - q_z1_fw - q_z1_nw)))
                .with(constraint!(u_z2 == prior_z2 + (q_wp - q_z2_nw)))
                .with(constraint!(u_z1 / e_z1 + u_z2 / e_z2 <= V_MAX))
                .with(constraint!(q_z1_fw <= p.heat_max))
                .with(constraint!(q_z1_nw + q_z2_nw <= p.heat_max));

            if p.restrict_fw_discharge_in_winter && self.time.is_winter(t + 1) {
                problem = problem.with(constraint!(q_z1_fw == 0.0));
            }
        }

        problem
    }
}

impl HasPorts for StratifiedStoreVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        let mut ports = Vec::new();
        for t in 0..self.u_z1.len() {
            ports.push(Port::new(&self.name, Carrier::StHeat, Direction::Sink, t, self.q_st[t]));
            ports.push(Port::new(&self.name, Carrier::WpHeat, Direction::Sink, t, self.q_wp[t]));
            ports.push(Port::new(&self.name, Carrier::NwExcessHeat, Direction::Source, t, self.q_z1_fw[t]));
            ports.push(Port::new(&self.name, Carrier::LocalHeat, Direction::Source, t, self.q_z1_nw[t]));
            ports.push(Port::new(&self.name, Carrier::LocalHeat, Direction::Source, t, self.q_z2_nw[t]));
        }
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_density_matches_z1_z2_constants() {
        let e_z1 = energy_density(DELTA_T_Z1);
        let e_z2 = energy_density(DELTA_T_Z2);
        assert!(e_z1 > e_z2);
        assert!((e_z1 - (1000.0 * (4.1868 / 1000.0) * 38.0 / 3600.0)).abs() < 1e-12);
    }

    #[test]
    fn coupled_volume_cap_uses_shared_v_max() {
        assert_eq!(V_MAX, 2000.0);
    }
}
