//! Model assembler: binds the time set, exogenous parameters, asset
//! instances, and bus arcs into a single MILP, then adds the objective.
//!
//! Builds in the order time set → exogenous parameters → instantiate
//! assets → open ports → register arcs → composer → objective. Performs
//! no I/O of its own; every input arrives already parsed by the caller
//! (`dispatch-io` loaders, `dispatch-cli`'s scenario loop).

use dispatch_core::{Arc, Carrier, DispatchResult, Port, TimeIndex};
use good_lp::{Expression, ProblemVariables, Variable};

use crate::assets::{
    battery::{self, BatteryParams, BatteryVars},
    buses::{self, HeatBus, LocalHeatBus, SupplyBus, WasteHeatBus},
    chp::{self, ChpParams, ChpVars},
    heat_pump::{self, HeatPumpVars, Stage, StageConstants},
    pv::{self, PvParams, PvVars},
    simple_store::{self, SimpleStoreParams, SimpleStoreVars},
    solar_thermal::{self, SolarThermalParams, SolarThermalVars},
    stratified_store::{self, StratifiedStoreParams, StratifiedStoreVars},
    HasPorts,
};
use crate::composer;

/// Scalar prices and scenario-level settings read from
/// `ScenarioConfig::parameters`.
#[derive(Debug, Clone)]
pub struct ScalarPrices {
    pub co2_price: f64,
    pub heat_price: f64,
    pub h2_price: f64,
    pub use_const_h2_price: bool,
}

/// Every exogenous value and asset parameter the assembler needs. The
/// caller (`dispatch-cli`) is responsible for resolving this from config
/// files and CSVs via `dispatch-io` before calling [`build_model`].
pub struct ModelInputs {
    pub time: TimeIndex,
    pub scalars: ScalarPrices,
    pub gas_price: Vec<f64>,
    pub power_price: Vec<f64>,
    pub hydrogen_price: Vec<f64>,
    pub heat_demand: Vec<f64>,
    pub local_heat_demand: Vec<f64>,
    pub chp_1: ChpParams,
    pub chp_2: ChpParams,
    pub pv: PvParams,
    pub solar_thermal: SolarThermalParams,
    pub battery: BatteryParams,
    pub heat_store: SimpleStoreParams,
    pub hydrogen_store: SimpleStoreParams,
    pub geothermal_store: SimpleStoreParams,
    pub stratified_store: StratifiedStoreParams,
    pub electrical_supply_max: f64,
    pub hydrogen_supply_max: f64,
    pub natural_gas_supply_max: f64,
    pub local_heat_max_district_feedin: f64,
}

/// The assembled-but-unsolved model: every asset's variable handles, the
/// objective, and the full port list the composer already validated.
/// Generic over no solver backend yet — `add_constraints` is called once
/// the driver has picked one via `.using(..)`.
pub struct DispatchModel {
    pub vars: ProblemVariables,
    pub objective: Expression,
    pub ports: Vec<Port<Variable>>,

    pub chp_1: ChpVars,
    pub chp_2: ChpVars,
    pub heat_pump_1: HeatPumpVars,
    pub heat_pump_2: HeatPumpVars,
    pub pv: PvVars,
    pub solar_thermal: SolarThermalVars,
    pub battery: BatteryVars,
    pub heat_store: SimpleStoreVars,
    pub hydrogen_store: SimpleStoreVars,
    pub geothermal_store: SimpleStoreVars,
    pub stratified_store: StratifiedStoreVars,

    pub electrical_bus: SupplyBus,
    pub hydrogen_bus: SupplyBus,
    pub ngas_bus: SupplyBus,
    pub heat_bus: HeatBus,
    pub local_heat_bus: LocalHeatBus,
    pub waste_heat_bus: WasteHeatBus,
}

impl DispatchModel {
    /// Every asset's and bus's constraints, applied in one pass, then the
    /// composer's per-carrier conservation equalities. Generic over the
    /// solver backend the driver chose.
    pub fn add_constraints<S: good_lp::SolverModel>(&self, mut problem: S) -> S {
        use crate::assets::AddConstraints;
        use crate::assets::buses::Bus;

        problem = self.chp_1.add_constraints(problem);
        problem = self.chp_2.add_constraints(problem);
        problem = self.heat_pump_1.add_constraints(problem);
        problem = self.heat_pump_2.add_constraints(problem);
        problem = self.pv.add_constraints(problem);
        problem = self.solar_thermal.add_constraints(problem);
        problem = self.battery.add_constraints(problem);
        problem = self.heat_store.add_constraints(problem);
        problem = self.hydrogen_store.add_constraints(problem);
        problem = self.geothermal_store.add_constraints(problem);
        problem = self.stratified_store.add_constraints(problem);

        problem = self.electrical_bus.add_constraints(problem);
        problem = self.hydrogen_bus.add_constraints(problem);
        problem = self.ngas_bus.add_constraints(problem);
        problem = self.heat_bus.add_constraints(problem);
        problem = self.local_heat_bus.add_constraints(problem);
        problem = self.waste_heat_bus.add_constraints(problem);

        composer::add_conservation_constraints(problem, &self.ports)
    }
}

/// The wiring diagram: one arc per asset port this system connects. Used
/// only to validate that every port an asset exposes actually has a
/// matching bus connection declared, before the composer runs.
fn wiring_diagram() -> Vec<Arc> {
    vec![
        Arc::new("electrical_bus", "chp_1", Carrier::Power),
        Arc::new("electrical_bus", "chp_2", Carrier::Power),
        Arc::new("electrical_bus", "pv", Carrier::Power),
        Arc::new("electrical_bus", "battery", Carrier::Power),
        Arc::new("electrical_bus", "heat_pump_1", Carrier::Power),
        Arc::new("electrical_bus", "heat_pump_2", Carrier::Power),
        Arc::new("hydrogen_bus", "chp_1", Carrier::Hydrogen),
        Arc::new("hydrogen_bus", "chp_2", Carrier::Hydrogen),
        Arc::new("hydrogen_bus", "hydrogen_store", Carrier::Hydrogen),
        Arc::new("ngas_bus", "chp_1", Carrier::NaturalGas),
        Arc::new("ngas_bus", "chp_2", Carrier::NaturalGas),
        Arc::new("heat_bus", "chp_1", Carrier::Heat),
        Arc::new("heat_bus", "chp_2", Carrier::Heat),
        Arc::new("heat_bus", "heat_store", Carrier::Heat),
        Arc::new("heat_bus", "stratified_store", Carrier::NwExcessHeat),
        Arc::new("heat_bus", "local_heat_bus", Carrier::FwHeat),
        Arc::new("local_heat_bus", "stratified_store", Carrier::LocalHeat),
        Arc::new("local_heat_bus", "heat_bus", Carrier::FwHeat),
        Arc::new("waste_heat_bus", "chp_1", Carrier::WasteHeat),
        Arc::new("waste_heat_bus", "chp_2", Carrier::WasteHeat),
        Arc::new("waste_heat_bus", "heat_pump_1", Carrier::WasteHeat),
        Arc::new("waste_heat_bus", "heat_pump_2", Carrier::WasteHeat),
        Arc::new("waste_heat_bus", "geothermal_store", Carrier::WasteHeat),
        Arc::new("stratified_store", "solar_thermal", Carrier::StHeat),
        Arc::new("stratified_store", "heat_pump_2", Carrier::WpHeat),
    ]
}

pub fn build_model(inputs: ModelInputs) -> DispatchResult<DispatchModel> {
    inputs.chp_1.validate()?;
    inputs.chp_2.validate()?;
    let time_len = inputs.time.len();
    inputs.pv.validate(time_len)?;
    inputs.solar_thermal.validate(time_len)?;

    let mut vars = ProblemVariables::new();
    let time = inputs.time;

    let chp_1 = chp::build_vars(&mut vars, time.clone(), inputs.chp_1);
    let chp_2 = chp::build_vars(&mut vars, time.clone(), inputs.chp_2);
    let heat_pump_1 = heat_pump::build_vars(&mut vars, time.clone(), "heat_pump_1", Stage::One, StageConstants::stage_one());
    let heat_pump_2 = heat_pump::build_vars(&mut vars, time.clone(), "heat_pump_2", Stage::Two, StageConstants::stage_two());
    let pv = pv::build_vars(&mut vars, &inputs.pv);
    let solar_thermal = solar_thermal::build_vars(&mut vars, &inputs.solar_thermal);
    let battery = battery::build_vars(&mut vars, time.clone(), inputs.battery);
    let heat_store = simple_store::build_vars(&mut vars, time.clone(), inputs.heat_store);
    let hydrogen_store = simple_store::build_vars(&mut vars, time.clone(), inputs.hydrogen_store);
    let geothermal_store = simple_store::build_vars(&mut vars, time.clone(), inputs.geothermal_store);
    let stratified_store = stratified_store::build_vars(&mut vars, time.clone(), inputs.stratified_store);

    let electrical_bus = buses::build_supply_bus(&mut vars, time.clone(), "electrical_bus", Carrier::Power, inputs.electrical_supply_max);
    let hydrogen_bus = buses::build_supply_bus(&mut vars, time.clone(), "hydrogen_bus", Carrier::Hydrogen, inputs.hydrogen_supply_max);
    let ngas_bus = buses::build_supply_bus(&mut vars, time.clone(), "ngas_bus", Carrier::NaturalGas, inputs.natural_gas_supply_max);
    let heat_bus = buses::build_heat_bus(&mut vars, inputs.heat_demand, "heat_bus");
    let local_heat_bus = buses::build_local_heat_bus(
        &mut vars,
        inputs.local_heat_demand,
        inputs.local_heat_max_district_feedin,
        "local_heat_bus",
    );
    let waste_heat_bus = buses::build_waste_heat_bus(&mut vars, time.clone(), "waste_heat_bus");

    let mut ports = Vec::new();
    ports.extend(chp_1.ports());
    ports.extend(chp_2.ports());
    ports.extend(heat_pump_1.ports());
    ports.extend(heat_pump_2.ports());
    ports.extend(pv.ports());
    ports.extend(solar_thermal.ports());
    ports.extend(battery.ports());
    ports.extend(heat_store.ports());
    ports.extend(hydrogen_store.ports());
    ports.extend(geothermal_store.ports());
    ports.extend(stratified_store.ports());
    {
        use crate::assets::buses::Bus;
        ports.extend(electrical_bus.ports());
        ports.extend(hydrogen_bus.ports());
        ports.extend(ngas_bus.ports());
        ports.extend(heat_bus.ports());
        ports.extend(local_heat_bus.ports());
        ports.extend(waste_heat_bus.ports());
    }

    composer::validate_arcs(&ports, &wiring_diagram())?;

    let mut objective = Expression::from(0.0);
    for t in 0..time_len {
        objective += inputs.gas_price[t] * ngas_bus.supply[t];
        objective += inputs.scalars.co2_price * (chp_1.co2[t] + chp_2.co2[t]);
        objective += inputs.power_price[t] * electrical_bus.balance[t];
        let h2_cost = if inputs.scalars.use_const_h2_price {
            inputs.scalars.h2_price
        } else {
            inputs.hydrogen_price[t]
        };
        objective += h2_cost * hydrogen_bus.supply[t];
        objective -= inputs.scalars.heat_price * heat_bus.heat_feedin[t];
    }

    Ok(DispatchModel {
        vars,
        objective,
        ports,
        chp_1,
        chp_2,
        heat_pump_1,
        heat_pump_2,
        pv,
        solar_thermal,
        battery,
        heat_store,
        hydrogen_store,
        geothermal_store,
        stratified_store,
        electrical_bus,
        hydrogen_bus,
        ngas_bus,
        heat_bus,
        local_heat_bus,
        waste_heat_bus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chp_params(name: &str) -> ChpParams {
        ChpParams {
            name: name.into(),
            power: (1.0, 10.0),
            gas: (2.0, 15.0),
            heat: (0.5, 6.0),
            co2: (0.4, 3.0),
            waste_heat: (0.0, 1.0),
            hydrogen_admixture_factor: 0.0,
            forced_operation_time: None,
        }
    }

    fn minimal_inputs(n: usize) -> ModelInputs {
        ModelInputs {
            time: TimeIndex::new(n),
            scalars: ScalarPrices {
                co2_price: 100.0,
                heat_price: 80.0,
                h2_price: 40.0,
                use_const_h2_price: true,
            },
            gas_price: vec![20.0; n],
            power_price: vec![50.0; n],
            hydrogen_price: vec![40.0; n],
            heat_demand: vec![0.0; n],
            local_heat_demand: vec![0.0; n],
            chp_1: chp_params("chp_1"),
            chp_2: chp_params("chp_2"),
            pv: PvParams {
                name: "pv".into(),
                installed_power: 5.0,
                inverter_efficiency: 0.95,
                profile: vec![0.0; n],
            },
            solar_thermal: SolarThermalParams {
                name: "solar_thermal".into(),
                profile: vec![0.0; n],
            },
            battery: BatteryParams {
                name: "battery".into(),
                power_max: 2.0,
                content_min: 0.0,
                content_max: 10.0,
                initial_content: 0.0,
                cyclic_behaviour: None,
            },
            heat_store: SimpleStoreParams {
                name: "heat_store".into(),
                carrier: Carrier::Heat,
                flow_max: 3.0,
                content_min: 0.0,
                content_max: 20.0,
                initial_content: 0.0,
                k_loss: 0.0,
            },
            hydrogen_store: SimpleStoreParams {
                name: "hydrogen_store".into(),
                carrier: Carrier::Hydrogen,
                flow_max: 3.0,
                content_min: 0.0,
                content_max: 20.0,
                initial_content: 0.0,
                k_loss: 0.0,
            },
            geothermal_store: SimpleStoreParams {
                name: "geothermal_store".into(),
                carrier: Carrier::WasteHeat,
                flow_max: 3.0,
                content_min: 0.0,
                content_max: 20.0,
                initial_content: 0.0,
                k_loss: 0.01,
            },
            stratified_store: StratifiedStoreParams {
                name: "stratified_store".into(),
                heat_max: 2.0,
                initial_volume_share_z1: 0.5,
                initial_fill: 0.0,
                restrict_fw_discharge_in_winter: false,
            },
            electrical_supply_max: 100.0,
            hydrogen_supply_max: 100.0,
            natural_gas_supply_max: 100.0,
            local_heat_max_district_feedin: 5.0,
        }
    }

    #[test]
    fn build_model_wires_every_declared_arc() {
        let model = build_model(minimal_inputs(1)).unwrap();
        assert!(!model.ports.is_empty());
    }

    #[test]
    fn rejects_mismatched_profile_length() {
        let mut inputs = minimal_inputs(2);
        inputs.pv.profile = vec![0.0];
        let err = build_model(inputs).unwrap_err();
        assert!(matches!(err, dispatch_core::DispatchError::ConfigInvalid(_)));
    }
}
