use super::config::GeneratorConfig;
use super::customer::CustomerData;
use super::sampling::CustomerSampler;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{SimulationTime, PASSIVE};
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorPhase {
    /// Next arrival due after `sigma`
    Running { sigma: SimulationTime },
    /// Held by the distributor until an ok arrives
    Paused,
}

/// Source of new customers, throttled by hold/ok pulses.
///
/// The customer to be emitted next is drawn as soon as its arrival is
/// scheduled, so `output` only publishes state and consumes no randomness.
pub struct Generator {
    sampler: CustomerSampler,
    phase: GeneratorPhase,
    next_customer_id: i64,
    pending: Option<CustomerData>,
    generated: u64,
    pauses: u64,
}

impl Generator {
    pub const IN_OK: &'static str = "in_ok";
    pub const IN_HOLD: &'static str = "in_hold";
    pub const OUT_CUSTOMER: &'static str = "out_customer";

    pub fn new(config: &GeneratorConfig) -> Result<Self, SimError> {
        Ok(Self {
            sampler: CustomerSampler::new(config)?,
            phase: GeneratorPhase::Running { sigma: 0.0 },
            next_customer_id: 0,
            pending: None,
            generated: 0,
            pauses: 0,
        })
    }

    fn schedule_next(&mut self, ctx: &mut TransitionContext<'_>, delay: SimulationTime) {
        self.pending = Some(self.sampler.customer(&mut *ctx.rng, self.next_customer_id));
        self.phase = GeneratorPhase::Running { sigma: delay };
    }

    fn resample_arrival(&mut self, ctx: &mut TransitionContext<'_>) {
        let delay = self.sampler.inter_arrival(&mut *ctx.rng);
        self.schedule_next(ctx, delay);
    }

    pub fn phase(&self) -> GeneratorPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GeneratorPhase::Paused
    }

    /// Id the next emitted customer will carry
    pub fn next_customer_id(&self) -> i64 {
        self.next_customer_id
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Number of times a hold paused the generator
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

impl AtomicModel for Generator {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_OK),
            PortSpec::input(Self::IN_HOLD),
            PortSpec::output(Self::OUT_CUSTOMER),
        ]
    }

    fn initialize(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        self.schedule_next(ctx, 0.0);
        Ok(())
    }

    fn time_advance(&self) -> SimulationTime {
        match self.phase {
            GeneratorPhase::Running { sigma } => sigma,
            GeneratorPhase::Paused => PASSIVE,
        }
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        if let GeneratorPhase::Running { .. } = self.phase {
            if self.pending.take().is_some() {
                self.generated += 1;
                self.next_customer_id += 1;
            }
            self.resample_arrival(ctx);
        }
        Ok(())
    }

    fn external_transition(
        &mut self,
        elapsed: SimulationTime,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        if let GeneratorPhase::Running { sigma } = &mut self.phase {
            *sigma = (*sigma - elapsed).max(0.0);
        }

        let hold = inputs.has_input(Self::IN_HOLD);
        let ok = inputs.has_input(Self::IN_OK);

        match self.phase {
            GeneratorPhase::Running { .. } if hold => {
                info!("[t={:.3}] generator paused by hold", ctx.now);
                self.phase = GeneratorPhase::Paused;
                self.pauses += 1;
            }
            GeneratorPhase::Paused if ok && !hold => {
                self.resample_arrival(ctx);
                debug!(
                    "[t={:.3}] generator resumed, next arrival in {:.3}",
                    ctx.now,
                    self.time_advance()
                );
            }
            _ => {}
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if let (GeneratorPhase::Running { .. }, Some(customer)) = (self.phase, &self.pending) {
            outputs.add(Self::OUT_CUSTOMER, customer.clone())?;
        }
        Ok(())
    }
}
