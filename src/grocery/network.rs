//! Assembling the store
//!
//! [`GroceryStore`] wires generator, distributor, lanes, payment, traveler and
//! the online [`PickupSystem`] into one [`Simulation`]. The returned handles
//! carry the component ids, so callers can connect extra inputs or inspect
//! models once the engine is built.

use super::config::StoreConfig;
use super::curbside::CurbsideDispatcher;
use super::customer::CustomerData;
use super::distributor::{lane_port, Distributor};
use super::generator::Generator;
use super::lane::Lane;
use super::packer::Packer;
use super::payment::PaymentProcessor;
use super::script::ScriptedSource;
use super::sink::CustomerSink;
use super::traveler::Traveler;
use crate::core::builder::Simulation;
use crate::core::error::SimError;
use crate::core::execution::SimulationEngine;
use crate::core::types::{ComponentId, InputPort, OutputPort, SimulationTime};
use log::info;

/// Packer followed by the curbside dispatcher
#[derive(Debug, Clone)]
pub struct PickupSystem {
    pub packer: ComponentId,
    pub curbside: ComponentId,
}

impl PickupSystem {
    pub fn build(sim: &mut Simulation, config: &StoreConfig) -> Result<Self, SimError> {
        let packer = sim.add_named_component(
            "packer",
            Packer::with_overflow(config.pack_time_per_item, config.packer_overflow),
        )?;
        let curbside = sim.add_named_component("curbside", CurbsideDispatcher::new())?;

        sim.connect(
            packer.output(Packer::OUT_PACKED),
            curbside.input(CurbsideDispatcher::IN_ORDER),
        )?;

        Ok(Self { packer, curbside })
    }

    /// Where online orders enter
    pub fn input(&self) -> InputPort {
        self.packer.input(Packer::IN_ORDER)
    }

    /// Orders handed to their customers
    pub fn output(&self) -> OutputPort {
        self.curbside.output(CurbsideDispatcher::OUT_COLLECTED)
    }
}

/// The complete checkout network
#[derive(Debug, Clone)]
pub struct GroceryStore {
    /// Absent when customers are fed from outside
    pub generator: Option<ComponentId>,
    pub distributor: ComponentId,
    /// Indexed by lane id: cash lanes first, then self-checkout
    pub lanes: Vec<ComponentId>,
    pub payment: ComponentId,
    pub traveler: ComponentId,
    pub pickup: PickupSystem,
    pub walk_in_sink: ComponentId,
    pub online_sink: ComponentId,
}

impl GroceryStore {
    /// Store driven by its own customer generator
    pub fn build(sim: &mut Simulation, config: &StoreConfig) -> Result<Self, SimError> {
        let generator = sim.add_named_component("generator", Generator::new(&config.generator)?)?;
        let mut store = Self::without_generator(sim, config)?;

        sim.connect(
            generator.output(Generator::OUT_CUSTOMER),
            store.customer_input(),
        )?;
        sim.connect(
            store.distributor.output(Distributor::OUT_HOLD),
            generator.input(Generator::IN_HOLD),
        )?;
        sim.connect(
            store.distributor.output(Distributor::OUT_OK),
            generator.input(Generator::IN_OK),
        )?;

        store.generator = Some(generator);
        Ok(store)
    }

    /// Store whose customers arrive on [`GroceryStore::customer_input`]
    pub fn without_generator(sim: &mut Simulation, config: &StoreConfig) -> Result<Self, SimError> {
        config.validate()?;

        let distributor = sim.add_named_component("distributor", Distributor::from_config(config))?;

        let mut lanes = Vec::with_capacity(config.total_lanes());
        for lane_id in 0..config.total_lanes() {
            let name = if lane_id < config.cash_lanes {
                format!("cash{}", lane_id)
            } else {
                format!("self{}", lane_id - config.cash_lanes)
            };
            let lane = sim.add_named_component(&name, Lane::new(lane_id, config.time_per_item(lane_id)))?;
            lanes.push(lane);
        }

        let payment = sim.add_named_component(
            "payment",
            PaymentProcessor::new(config.card_payment, config.cash_payment),
        )?;
        let traveler = sim.add_named_component("traveler", Traveler::new())?;
        let pickup = PickupSystem::build(sim, config)?;
        let walk_in_sink = sim.add_named_component("sink_walkin", CustomerSink::new())?;
        let online_sink = sim.add_named_component("sink_online", CustomerSink::new())?;

        for (lane_id, lane) in lanes.iter().enumerate() {
            sim.connect(distributor.output(&lane_port(lane_id)), lane.input(Lane::IN_CUSTOMER))?;
            sim.connect(lane.output(Lane::OUT_TO_PAYMENT), payment.input(PaymentProcessor::IN_CUSTOMER))?;
            sim.connect(lane.output(Lane::OUT_FREE), distributor.input(Distributor::IN_LANE_FREED))?;
        }

        sim.connect(
            payment.output(PaymentProcessor::OUT_CUSTOMER),
            traveler.input(Traveler::IN_CUSTOMER),
        )?;
        sim.connect(
            traveler.output(Traveler::OUT_ARRIVED),
            walk_in_sink.input(CustomerSink::IN),
        )?;
        sim.connect(distributor.output(Distributor::OUT_ONLINE), pickup.input())?;
        sim.connect(pickup.output(), online_sink.input(CustomerSink::IN))?;

        info!(
            "assembled store: {} cash + {} self lanes, max queue {}",
            config.cash_lanes, config.self_lanes, config.max_queue
        );

        Ok(Self {
            generator: None,
            distributor,
            lanes,
            payment,
            traveler,
            pickup,
            walk_in_sink,
            online_sink,
        })
    }

    /// Store fed by a fixed arrival script instead of a generator
    pub fn with_script(
        sim: &mut Simulation,
        config: &StoreConfig,
        arrivals: Vec<(SimulationTime, CustomerData)>,
    ) -> Result<(Self, ComponentId), SimError> {
        let store = Self::without_generator(sim, config)?;
        let source = sim.add_named_component("arrivals", ScriptedSource::new(arrivals))?;
        sim.connect(source.output(ScriptedSource::<CustomerData>::OUT), store.customer_input())?;
        Ok((store, source))
    }

    pub fn customer_input(&self) -> InputPort {
        self.distributor.input(Distributor::IN_CUSTOMER)
    }

    /// Walk-in customers that reached the exit
    pub fn walk_in_done(&self) -> OutputPort {
        self.traveler.output(Traveler::OUT_ARRIVED)
    }

    /// Online orders collected at the curb
    pub fn online_done(&self) -> OutputPort {
        self.pickup.output()
    }

    pub fn distributor_model<'e>(&self, engine: &'e SimulationEngine) -> Result<&'e Distributor, SimError> {
        engine.component::<Distributor>(&self.distributor)
    }

    pub fn lane_model<'e>(&self, engine: &'e SimulationEngine, lane_id: usize) -> Result<&'e Lane, SimError> {
        let id = self
            .lanes
            .get(lane_id)
            .ok_or_else(|| SimError::ComponentNotFound(format!("lane {}", lane_id)))?;
        engine.component::<Lane>(id)
    }

    pub fn walk_in_sink_model<'e>(&self, engine: &'e SimulationEngine) -> Result<&'e CustomerSink, SimError> {
        engine.component::<CustomerSink>(&self.walk_in_sink)
    }

    pub fn online_sink_model<'e>(&self, engine: &'e SimulationEngine) -> Result<&'e CustomerSink, SimError> {
        engine.component::<CustomerSink>(&self.online_sink)
    }
}
