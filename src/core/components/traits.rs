use crate::core::components::port_specs::PortSpec;
use crate::core::components::state::ComponentState;
use crate::core::error::SimError;
use crate::core::types::{ComponentId, SimulationTime};
use crate::core::values::{InputBag, OutputBag};
use rand::rngs::StdRng;

/// Context handed to every transition of an atomic model.
///
/// Carries the current simulated time and the component's own random stream,
/// seeded when the network is assembled. Models never keep a generator of
/// their own, so a run is reproducible from its seed.
pub struct TransitionContext<'a> {
    pub now: SimulationTime,
    pub component_id: &'a ComponentId,
    pub rng: &'a mut StdRng,
}

impl<'a> TransitionContext<'a> {
    pub fn new(now: SimulationTime, component_id: &'a ComponentId, rng: &'a mut StdRng) -> Self {
        Self {
            now,
            component_id,
            rng,
        }
    }
}

/// Atomic model: one component with its own phase/timer state machine.
///
/// The engine calls, per component per instant, `output` followed by exactly
/// one of `internal_transition` (own timer fired), `external_transition`
/// (messages arrived) or `confluent_transition` (both).
pub trait AtomicModel: ComponentState {
    /// Define all ports for this model
    fn define_ports(&self) -> Vec<PortSpec>;

    /// Called once when the engine is built, before the first time advance is read
    fn initialize(&mut self, _ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        Ok(())
    }

    /// Remaining time until the next self-triggered event; `PASSIVE` if none
    fn time_advance(&self) -> SimulationTime;

    /// The model's own timer expired
    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError>;

    /// Messages arrived `elapsed` after the previous transition
    fn external_transition(
        &mut self,
        elapsed: SimulationTime,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError>;

    /// Timer expiry and arrivals in the same instant
    fn confluent_transition(
        &mut self,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        self.internal_transition(ctx)?;
        self.external_transition(0.0, inputs, ctx)
    }

    /// Emit outputs at the instant the timer expires (before the internal transition)
    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError>;

    /// Human-readable type name used for auto-generated ids
    fn model_name(&self) -> &'static str {
        let type_name = std::any::type_name::<Self>();
        let base = type_name.split('<').next().unwrap_or(type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}
