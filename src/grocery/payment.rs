use super::config::ServiceRange;
use super::customer::{CustomerData, PaymentMethod};
use super::phase::Phase;
use super::sampling::sample_service_time;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::debug;
use rand::Rng;
use std::collections::VecDeque;

/// Single payment server shared by every lane, with an unbounded FIFO queue
pub struct PaymentProcessor {
    card: ServiceRange,
    cash: ServiceRange,
    phase: Phase<CustomerData>,
    queue: VecDeque<CustomerData>,
    processed: u64,
}

impl PaymentProcessor {
    pub const IN_CUSTOMER: &'static str = "in_customer";
    pub const OUT_CUSTOMER: &'static str = "out_customer";

    pub fn new(card: ServiceRange, cash: ServiceRange) -> Self {
        Self {
            card,
            cash,
            phase: Phase::Idle,
            queue: VecDeque::new(),
            processed: 0,
        }
    }

    fn sample_duration<R: Rng + ?Sized>(&self, rng: &mut R, customer: &CustomerData) -> f64 {
        match customer.payment {
            PaymentMethod::Card => sample_service_time(rng, &self.card),
            PaymentMethod::Cash => sample_service_time(rng, &self.cash),
        }
    }

    fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R, customer: CustomerData) {
        let duration = self.sample_duration(rng, &customer);
        self.phase = Phase::start(customer, duration);
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn current(&self) -> Option<&CustomerData> {
        self.phase.job()
    }

    /// Customers waiting behind the one being served
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        Self::new(ServiceRange::new(5.0, 15.0), ServiceRange::new(30.0, 120.0))
    }
}

impl AtomicModel for PaymentProcessor {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_CUSTOMER),
            PortSpec::output(Self::OUT_CUSTOMER),
        ]
    }

    fn time_advance(&self) -> SimulationTime {
        self.phase.sigma()
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        if self.phase.take().is_some() {
            self.processed += 1;
        }
        if let Some(next) = self.queue.pop_front() {
            self.begin(&mut *ctx.rng, next);
        }
        Ok(())
    }

    fn external_transition(
        &mut self,
        elapsed: SimulationTime,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        self.phase.elapse(elapsed);

        for customer in inputs.bag::<CustomerData>(Self::IN_CUSTOMER)? {
            if self.phase.is_idle() {
                debug!(
                    "[t={:.3}] payment starts customer {} ({})",
                    ctx.now, customer.customer_id, customer.payment
                );
                self.begin(&mut *ctx.rng, customer);
            } else {
                self.queue.push_back(customer);
            }
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if let Some(customer) = self.phase.job() {
            outputs.add(Self::OUT_CUSTOMER, customer.clone())?;
        }
        Ok(())
    }
}
