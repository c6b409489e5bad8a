use super::config::SimulationConfig;
use super::event_scheduler::EventScheduler;
use crate::core::builder::simulation_builder::ComponentInstance;
use crate::core::components::port_specs::{port_names, PortType};
use crate::core::components::state::{downcast_state, downcast_state_mut, ComponentState};
use crate::core::components::traits::{AtomicModel, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{ComponentId, InputPort, OutputPort, SimulationTime};
use crate::core::values::{Event, InputBag, OutputBag};
use crate::core::values::traits::{EventInputs, EventOutputs};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the simulation clock advances
    fn on_time_advance(&mut self, _old_time: SimulationTime, _new_time: SimulationTime) {}

    /// Called for every message a component emits
    fn on_output(&mut self, _time: SimulationTime, _source: &OutputPort, _event: &Event) {}

    /// Called when a simulation step completes
    fn on_step_complete(&mut self, _time: SimulationTime, _components_touched: usize) {}
}

/// One emitted message, kept when output recording is enabled
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub time: SimulationTime,
    pub source: OutputPort,
    pub event: Event,
}

struct Slot {
    id: ComponentId,
    output_ports: Vec<String>,
    model: Box<dyn AtomicModel>,
    rng: StdRng,
    last_time: SimulationTime,
}

/// Derive a per-component seed so each model owns an independent stream
fn component_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Flat coordinator for a network of atomic models.
///
/// Each step advances the clock to the earliest wake-up, collects the outputs
/// of every imminent model, delivers them as per-port bags in the same
/// instant, then runs exactly one transition per touched model.
pub struct SimulationEngine {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    routes: HashMap<(usize, String), Vec<(usize, String)>>,
    scheduler: EventScheduler,
    current_time: SimulationTime,
    step_count: u64,
    config: SimulationConfig,
    observers: Vec<Box<dyn SimulationObserver>>,
    trace: Vec<OutputRecord>,
    run_id: Uuid,
}

impl SimulationEngine {
    /// Create an engine from validated components and couplings
    pub fn new(
        components: Vec<ComponentInstance>,
        connections: Vec<(OutputPort, InputPort)>,
        config: SimulationConfig,
    ) -> Result<Self, SimError> {
        let mut slots = Vec::with_capacity(components.len());
        let mut index = HashMap::new();

        for (i, instance) in components.into_iter().enumerate() {
            index.insert(instance.id.id().to_string(), i);
            slots.push(Slot {
                output_ports: port_names(&instance.ports, PortType::Output),
                id: instance.id,
                model: instance.model,
                rng: StdRng::seed_from_u64(component_seed(config.seed, i)),
                last_time: 0.0,
            });
        }

        let mut routes: HashMap<(usize, String), Vec<(usize, String)>> = HashMap::new();
        for (source, target) in connections {
            let source_index = Self::lookup(&index, source.component_id())?;
            let target_index = Self::lookup(&index, target.component_id())?;
            routes
                .entry((source_index, source.port_name))
                .or_default()
                .push((target_index, target.port_name));
        }

        let mut engine = Self {
            scheduler: EventScheduler::new(slots.len()),
            slots,
            index,
            routes,
            current_time: 0.0,
            step_count: 0,
            config,
            observers: Vec::new(),
            trace: Vec::new(),
            run_id: Uuid::new_v4(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn lookup(index: &HashMap<String, usize>, id: &ComponentId) -> Result<usize, SimError> {
        index
            .get(id.id())
            .copied()
            .ok_or_else(|| SimError::ComponentNotFound(id.id().to_string()))
    }

    fn initialize(&mut self) -> Result<(), SimError> {
        for i in 0..self.slots.len() {
            let slot = &mut self.slots[i];
            let mut ctx = TransitionContext::new(0.0, &slot.id, &mut slot.rng);
            slot.model.initialize(&mut ctx)?;
            self.reschedule(i, 0.0)?;
        }
        info!(
            "[run {}] network assembled: {} components, seed {}",
            self.run_id,
            self.slots.len(),
            self.config.seed
        );
        Ok(())
    }

    /// Record the transition instant of component `i` and re-arm its timer
    fn reschedule(&mut self, i: usize, now: SimulationTime) -> Result<(), SimError> {
        let slot = &mut self.slots[i];
        let ta = slot.model.time_advance();
        if ta.is_nan() || ta < 0.0 {
            return Err(SimError::InvalidTimeAdvance {
                component: slot.id.id().to_string(),
                value: ta,
            });
        }
        slot.last_time = now;
        self.scheduler.schedule(i, now + ta);
        Ok(())
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Time of the next scheduled event, `None` once every model is passive
    pub fn next_event_time(&mut self) -> Option<SimulationTime> {
        self.scheduler.peek_next_time()
    }

    /// Process one instant. Returns `false` if nothing was pending.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(now) = self.scheduler.peek_next_time() else {
            return Ok(false);
        };

        let old_time = self.current_time;
        self.current_time = now;
        if old_time != now {
            for observer in &mut self.observers {
                observer.on_time_advance(old_time, now);
            }
        }

        debug!("=== Simulation time {:.3} (step {}) ===", now, self.step_count);

        let imminent = self.scheduler.take_imminent(now);
        let inboxes = self.collect_outputs(&imminent, now)?;

        let mut touched: Vec<usize> = imminent.clone();
        touched.extend(inboxes.keys().copied().filter(|i| !imminent.contains(i)));
        touched.sort_unstable();

        for &i in &touched {
            let is_imminent = imminent.binary_search(&i).is_ok();
            let slot = &mut self.slots[i];
            let elapsed = now - slot.last_time;
            let mut ctx = TransitionContext::new(now, &slot.id, &mut slot.rng);

            match (is_imminent, inboxes.get(&i)) {
                (true, Some(bag)) => {
                    trace!("{} confluent with {} messages", slot.id, bag.len());
                    slot.model.confluent_transition(bag, &mut ctx)?;
                }
                (true, None) => slot.model.internal_transition(&mut ctx)?,
                (false, Some(bag)) => {
                    trace!("{} external with {} messages", slot.id, bag.len());
                    slot.model.external_transition(elapsed, bag, &mut ctx)?;
                }
                (false, None) => {}
            }
            self.reschedule(i, now)?;
        }

        self.step_count += 1;
        for observer in &mut self.observers {
            observer.on_step_complete(now, touched.len());
        }
        Ok(true)
    }

    /// Run `output` on every imminent model and route the results into bags
    fn collect_outputs(
        &mut self,
        imminent: &[usize],
        now: SimulationTime,
    ) -> Result<BTreeMap<usize, InputBag>, SimError> {
        let mut inboxes: BTreeMap<usize, InputBag> = BTreeMap::new();

        for &i in imminent {
            let slot = &self.slots[i];
            let mut outputs = OutputBag::new(slot.output_ports.iter().cloned(), now);
            slot.model.output(&mut outputs).map_err(|err| match err {
                SimError::PortNotFound { port, valid, .. } => SimError::PortNotFound {
                    component: slot.id.id().to_string(),
                    port,
                    valid,
                },
                other => other,
            })?;

            for (port, events) in outputs.into_event_map() {
                let source = slot.id.output(&port);
                for event in &events {
                    for observer in &mut self.observers {
                        observer.on_output(now, &source, event);
                    }
                    if self.config.record_outputs {
                        self.trace.push(OutputRecord {
                            time: now,
                            source: source.clone(),
                            event: event.clone(),
                        });
                    }
                }

                if let Some(targets) = self.routes.get(&(i, port)) {
                    for (target, target_port) in targets {
                        let inbox = inboxes.entry(*target).or_default();
                        for event in &events {
                            inbox.push_event(target_port, event.clone());
                        }
                    }
                }
            }
        }

        Ok(inboxes)
    }

    /// Process every event with time `<= end_time`; the clock ends at `end_time`
    pub fn run_until(&mut self, end_time: SimulationTime) -> Result<SimulationTime, SimError> {
        info!("[run {}] simulating until t={}", self.run_id, end_time);
        while let Some(next) = self.scheduler.peek_next_time() {
            if next > end_time {
                break;
            }
            self.step()?;
        }
        if end_time.is_finite() && end_time > self.current_time {
            self.current_time = end_time;
        }
        info!(
            "[run {}] stopped at t={} after {} steps",
            self.run_id, self.current_time, self.step_count
        );
        Ok(self.current_time)
    }

    /// Run until every model is passive or `max_steps` is reached
    pub fn run(&mut self) -> Result<u64, SimError> {
        while self.scheduler.has_events() {
            if let Some(max) = self.config.max_steps {
                if self.step_count >= max {
                    info!("[run {}] step limit {} reached", self.run_id, max);
                    break;
                }
            }
            self.step()?;
        }
        Ok(self.step_count)
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimulationTime {
        self.current_time
    }

    /// Number of instants processed so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Borrow a component's model as its concrete type
    pub fn component<T: 'static>(&self, id: &ComponentId) -> Result<&T, SimError> {
        let i = Self::lookup(&self.index, id)?;
        let model: &dyn AtomicModel = self.slots[i].model.as_ref();
        downcast_state::<T>(<dyn AtomicModel as ComponentState>::as_any(model))
    }

    /// Mutably borrow a component's model as its concrete type
    pub fn component_mut<T: 'static>(&mut self, id: &ComponentId) -> Result<&mut T, SimError> {
        let i = Self::lookup(&self.index, id)?;
        let model: &mut dyn AtomicModel = self.slots[i].model.as_mut();
        downcast_state_mut::<T>(<dyn AtomicModel as ComponentState>::as_any_mut(model))
    }

    /// Current time advance of a component
    pub fn time_advance_of(&self, id: &ComponentId) -> Result<SimulationTime, SimError> {
        let i = Self::lookup(&self.index, id)?;
        Ok(self.slots[i].model.time_advance())
    }

    /// All component IDs, in insertion order
    pub fn component_ids(&self) -> Vec<&ComponentId> {
        self.slots.iter().map(|slot| &slot.id).collect()
    }

    /// Recorded outputs, in emission order (empty unless recording is enabled)
    pub fn output_trace(&self) -> &[OutputRecord] {
        &self.trace
    }

    /// Typed payloads emitted on `port`, with their emission times
    pub fn outputs<T: Clone + 'static>(
        &self,
        port: &OutputPort,
    ) -> Result<Vec<(SimulationTime, T)>, SimError> {
        self.trace
            .iter()
            .filter(|record| &record.source == port)
            .map(|record| Ok((record.time, record.event.get_payload::<T>()?.clone())))
            .collect()
    }
}
