use super::customer::CustomerData;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{SimulationTime, PASSIVE};
use crate::core::values::{EventInputs, InputBag, OutputBag};

/// Absorbs finished customers and counts them
#[derive(Debug, Default)]
pub struct CustomerSink {
    count: u64,
    customer_ids: Vec<i64>,
    last_arrival: Option<SimulationTime>,
}

impl CustomerSink {
    pub const IN: &'static str = "in";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Absorbed ids, in arrival order
    pub fn customer_ids(&self) -> &[i64] {
        &self.customer_ids
    }

    pub fn last_arrival(&self) -> Option<SimulationTime> {
        self.last_arrival
    }
}

impl AtomicModel for CustomerSink {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::input(Self::IN)]
    }

    fn time_advance(&self) -> SimulationTime {
        PASSIVE
    }

    fn internal_transition(&mut self, _ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        Ok(())
    }

    fn external_transition(
        &mut self,
        _elapsed: SimulationTime,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        let customers = inputs.bag::<CustomerData>(Self::IN)?;
        if customers.is_empty() {
            return Ok(());
        }
        self.count += customers.len() as u64;
        self.customer_ids
            .extend(customers.iter().map(|c| c.customer_id));
        self.last_arrival = Some(ctx.now);
        Ok(())
    }

    fn output(&self, _outputs: &mut OutputBag) -> Result<(), SimError> {
        Ok(())
    }
}
