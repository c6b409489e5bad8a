//! Helpers for driving a single model by hand in unit tests

use crate::core::components::{AtomicModel, TransitionContext};
use crate::core::types::{ComponentId, SimulationTime};
use crate::core::values::{Event, EventOutputs, InputBag, OutputBag};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Drives one model with a fixed random stream and its own clock
pub struct Harness<M: AtomicModel> {
    pub model: M,
    id: ComponentId,
    rng: StdRng,
    now: SimulationTime,
    last: SimulationTime,
}

impl<M: AtomicModel> Harness<M> {
    pub fn new(model: M) -> Self {
        Self::with_seed(model, 0)
    }

    pub fn with_seed(mut model: M, seed: u64) -> Self {
        let id = ComponentId::new("under_test".to_string(), model.model_name().to_string());
        let mut rng = StdRng::seed_from_u64(seed);
        {
            let mut ctx = TransitionContext::new(0.0, &id, &mut rng);
            model.initialize(&mut ctx).unwrap();
        }
        Self {
            model,
            id,
            rng,
            now: 0.0,
            last: 0.0,
        }
    }

    pub fn now(&self) -> SimulationTime {
        self.now
    }

    pub fn sigma(&self) -> SimulationTime {
        self.model.time_advance()
    }

    /// Copy of the model's random stream as it stands, to replay upcoming draws
    pub fn rng_snapshot(&self) -> StdRng {
        self.rng.clone()
    }

    /// Deliver `inputs` at absolute time `at`
    pub fn external(&mut self, at: SimulationTime, inputs: InputBag) {
        self.now = at;
        let elapsed = at - self.last;
        let mut ctx = TransitionContext::new(at, &self.id, &mut self.rng);
        self.model.external_transition(elapsed, &inputs, &mut ctx).unwrap();
        self.last = at;
    }

    /// Fire the model's own timer: collect its outputs, then run the internal transition
    pub fn fire(&mut self) -> BTreeMap<String, Vec<Event>> {
        let at = self.last + self.model.time_advance();
        assert!(at.is_finite(), "fired a passive model");
        self.now = at;

        let mut outputs = OutputBag::new(
            self.model
                .define_ports()
                .into_iter()
                .filter(|p| p.is_output())
                .map(|p| p.name),
            at,
        );
        self.model.output(&mut outputs).unwrap();

        let mut ctx = TransitionContext::new(at, &self.id, &mut self.rng);
        self.model.internal_transition(&mut ctx).unwrap();
        self.last = at;
        outputs.into_event_map()
    }
}

/// One-port input bag
pub fn bag_of<T: Send + Sync + Clone + 'static>(port: &str, values: Vec<T>) -> InputBag {
    let mut inputs = InputBag::new();
    for value in values {
        inputs.push(port, 0.0, value);
    }
    inputs
}

/// Typed payloads emitted on `port`
pub fn payloads<T: Clone + 'static>(events: &BTreeMap<String, Vec<Event>>, port: &str) -> Vec<T> {
    events
        .get(port)
        .map(|bag| {
            bag.iter()
                .map(|event| event.get_payload::<T>().unwrap().clone())
                .collect()
        })
        .unwrap_or_default()
}
