//! Two-stage heat pump cascade. Both stages are a refrigerant-cycle
//! surrogate with identical structure and stage-specific constants, so one
//! `HeatPumpStage` model serves both, parameterized by `StageConstants`.
//!
//! Grounded on `original_source/burn4h2/blocks/heatpump.py`
//! (`HeatpumpStageOne`/`HeatpumpStageTwo`).

use dispatch_core::{Carrier, Direction, Port, TimeIndex};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone, Copy)]
pub enum Stage {
    One,
    Two,
}

/// Physical constants for one refrigerant-cycle stage.
#[derive(Debug, Clone, Copy)]
pub struct StageConstants {
    pub r: f64,
    pub t1: f64,
    pub t3: f64,
    pub h1: f64,
    pub h2: f64,
    pub h4: f64,
    pub p1: f64,
    pub z: f64,
    pub n: f64,
    pub electrical_efficiency: f64,
    /// Stage 2 only: caps `heat_input` at 2.05 MW. `None` for stage 1.
    pub heat_input_cap: Option<f64>,
}

impl StageConstants {
    pub fn stage_one() -> Self {
        Self {
            r: 488.0,
            t1: 8.0 + 273.15,
            t3: 40.0 + 273.15,
            h1: 1480.0,
            h2: 1625.0,
            h4: 395.0,
            p1: 5.5e5,
            z: 6.0,
            n: 1500.0 / 60.0,
            electrical_efficiency: 0.9,
            heat_input_cap: None,
        }
    }

    pub fn stage_two() -> Self {
        Self {
            heat_input_cap: Some(2.05),
            ..Self::stage_one()
        }
    }

    /// Carnot ideal COP at the stage's fixed state points.
    pub fn cop_ideal(&self) -> f64 {
        self.t3 / (self.t3 - self.t1)
    }

    /// R-717 degradation factor.
    pub fn degradation(&self) -> f64 {
        0.6932 - 0.4851 / self.cop_ideal()
    }

    pub fn cop_real(&self) -> f64 {
        self.cop_ideal() * self.degradation()
    }
}

pub struct HeatPumpVars {
    pub name: String,
    pub stage: Stage,
    pub bin: Vec<Variable>,
    pub power: Vec<Variable>,
    pub heat_input: Vec<Variable>,
    pub heat: Vec<Variable>,
    pub capacity_compressor: Vec<Variable>,
    pub volume_flow: Vec<Variable>,
    pub massflow_refrigerant: Vec<Variable>,
    pub swept_volume: Vec<Variable>,
    constants: StageConstants,
}

pub fn build_vars(
    vars: &mut ProblemVariables,
    time: TimeIndex,
    name: impl Into<String>,
    stage: Stage,
    constants: StageConstants,
) -> HeatPumpVars {
    let n = time.len();
    let mut bin = Vec::with_capacity(n);
    let mut power = Vec::with_capacity(n);
    let mut heat_input = Vec::with_capacity(n);
    let mut heat = Vec::with_capacity(n);
    let mut capacity_compressor = Vec::with_capacity(n);
    let mut volume_flow = Vec::with_capacity(n);
    let mut massflow_refrigerant = Vec::with_capacity(n);
    let mut swept_volume = Vec::with_capacity(n);

    for _ in 0..n {
        bin.push(vars.add(variable().binary()));
        power.push(vars.add(variable().min(0.0)));
        let heat_input_var = match constants.heat_input_cap {
            Some(cap) => vars.add(variable().min(0.0).max(cap)),
            None => vars.add(variable().min(0.0)),
        };
        heat_input.push(heat_input_var);
        heat.push(vars.add(variable().min(0.0)));
        capacity_compressor.push(vars.add(variable().min(0.0)));
        volume_flow.push(vars.add(variable().min(0.0)));
        massflow_refrigerant.push(vars.add(variable().min(0.0)));
        swept_volume.push(vars.add(variable().min(0.0)));
    }

    HeatPumpVars {
        name: name.into(),
        stage,
        bin,
        power,
        heat_input,
        heat,
        capacity_compressor,
        volume_flow,
        massflow_refrigerant,
        swept_volume,
        constants,
    }
}

impl AddConstraints for HeatPumpVars {
    fn add_constraints<S: SolverModel>(&self, mut problem: S) -> S {
        let c = &self.constants;
        for t in 0..self.bin.len() {
            let heat = self.heat[t];
            let heat_input = self.heat_input[t];
            let capacity_compressor = self.capacity_compressor[t];
            let massflow = self.massflow_refrigerant[t];
            let volume_flow = self.volume_flow[t];
            let swept_volume = self.swept_volume[t];
            let power = self.power[t];

            problem = problem
                .with(constraint!(heat == capacity_compressor + heat_input))
                .with(constraint!(
                    capacity_compressor == massflow * (c.h2 - c.h1) / 1000.0
                ))
                .with(constraint!(
                    massflow == heat_input * 1000.0 / (c.h1 - c.h4)
                ))
                .with(constraint!(volume_flow == massflow * c.r * c.t1 / c.p1))
                .with(constraint!(swept_volume == volume_flow * c.z / c.n))
                .with(constraint!(power == capacity_compressor / c.electrical_efficiency));
        }
        problem
    }
}

impl HasPorts for HeatPumpVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        let mut ports = Vec::new();
        let out_carrier = match self.stage {
            Stage::One => Carrier::WasteHeat,
            Stage::Two => Carrier::WpHeat,
        };
        for t in 0..self.bin.len() {
            ports.push(Port::new(&self.name, Carrier::Power, Direction::Sink, t, self.power[t]));
            ports.push(Port::new(&self.name, Carrier::WasteHeat, Direction::Sink, t, self.heat_input[t]));
            ports.push(Port::new(&self.name, out_carrier, Direction::Source, t, self.heat[t]));
        }
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_one_ideal_cop_matches_carnot_ratio() {
        let c = StageConstants::stage_one();
        let expected = (40.0 + 273.15) / ((40.0 + 273.15) - (8.0 + 273.15));
        assert!((c.cop_ideal() - expected).abs() < 1e-9);
    }

    #[test]
    fn stage_two_caps_heat_input_at_2_05_mw() {
        let c = StageConstants::stage_two();
        assert_eq!(c.heat_input_cap, Some(2.05));
    }

    #[test]
    fn real_cop_applies_r717_degradation() {
        let c = StageConstants::stage_one();
        let degradation = 0.6932 - 0.4851 / c.cop_ideal();
        assert!((c.cop_real() - c.cop_ideal() * degradation).abs() < 1e-12);
    }
}
