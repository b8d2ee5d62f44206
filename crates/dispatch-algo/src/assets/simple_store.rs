//! Single-layer lossless buffer shared by heat storage, hydrogen storage,
//! and the geothermal store — identical skeleton, carrier and optional
//! decay coefficient differ. Unlike the battery (§4.B.5, `bin_charge +
//! bin_discharge == 1`), this family uses `<= 1` exclusivity.
//!
//! Grounded on `original_source/burn4h2/blocks/storage.py`.

use dispatch_core::{Carrier, Direction, Port, TimeIndex};
use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};

use super::{AddConstraints, HasPorts};

#[derive(Debug, Clone)]
pub struct SimpleStoreParams {
    pub name: String,
    pub carrier: Carrier,
    pub flow_max: f64,
    pub content_min: f64,
    pub content_max: f64,
    pub initial_content: f64,
    /// Only the geothermal store is configured with a nonzero decay rate.
    pub k_loss: f64,
}

pub struct SimpleStoreVars {
    pub name: String,
    pub carrier: Carrier,
    pub charging: Vec<Variable>,
    pub discharging: Vec<Variable>,
    pub content: Vec<Variable>,
    pub bin_charge: Vec<Variable>,
    pub bin_discharge: Vec<Variable>,
    params: SimpleStoreParams,
}

pub fn build_vars(vars: &mut ProblemVariables, time: TimeIndex, params: SimpleStoreParams) -> SimpleStoreVars {
    let n = time.len();
    let charging = (0..n).map(|_| vars.add(variable().min(0.0).max(params.flow_max))).collect();
    let discharging = (0..n).map(|_| vars.add(variable().min(0.0).max(params.flow_max))).collect();
    let content = (0..n)
        .map(|_| vars.add(variable().min(params.content_min).max(params.content_max)))
        .collect();
    let bin_charge = (0..n).map(|_| vars.add(variable().binary())).collect();
    let bin_discharge = (0..n).map(|_| vars.add(variable().binary())).collect();

    SimpleStoreVars {
        name: params.name.clone(),
        carrier: params.carrier,
        charging,
        discharging,
        content,
        bin_charge,
        bin_discharge,
        params,
    }
}

impl AddConstraints for SimpleStoreVars {
    fn add_constraints<S: SolverModel>(&self, mut problem: S) -> S {
        let p = &self.params;
        for t in 0..self.charging.len() {
            let charging = self.charging[t];
            let discharging = self.discharging[t];
            let bin_charge = self.bin_charge[t];
            let bin_discharge = self.bin_discharge[t];
            let content = self.content[t];

            problem = problem
                .with(constraint!(charging <= p.flow_max * bin_charge))
                .with(constraint!(discharging <= p.flow_max * bin_discharge))
                .with(constraint!(bin_charge + bin_discharge <= 1.0));

            let balance: Expression = discharging - charging;
            let prior: Expression = if t == 0 {
                Expression::from(p.initial_content)
            } else {
                ((1.0 - p.k_loss) * self.content[t - 1]).into()
            };
            problem = problem.with(constraint!(content == prior - balance));
        }
        problem
    }
}

impl HasPorts for SimpleStoreVars {
    fn ports(&self) -> Vec<Port<Variable>> {
        let mut ports = Vec::new();
        for t in 0..self.charging.len() {
            ports.push(Port::new(&self.name, self.carrier, Direction::Sink, t, self.charging[t]));
            ports.push(Port::new(&self.name, self.carrier, Direction::Source, t, self.discharging[t]));
        }
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geothermal_store_is_the_only_one_with_nonzero_decay() {
        let heat_store = SimpleStoreParams {
            name: "heat_store".into(),
            carrier: Carrier::Heat,
            flow_max: 3.0,
            content_min: 0.0,
            content_max: 20.0,
            initial_content: 0.0,
            k_loss: 0.0,
        };
        let geothermal = SimpleStoreParams {
            name: "geothermal".into(),
            carrier: Carrier::WasteHeat,
            flow_max: 3.0,
            content_min: 0.0,
            content_max: 20.0,
            initial_content: 0.0,
            k_loss: 0.01,
        };
        assert_eq!(heat_store.k_loss, 0.0);
        assert!(geothermal.k_loss > 0.0);
    }
}
