use super::customer::CustomerData;
use super::phase::Phase;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::debug;
use std::collections::VecDeque;

/// A staffed cash lane or a self-checkout lane.
///
/// Serves one customer at a time for `num_items * time_per_item` seconds and
/// then hands the customer to payment while announcing its own id as free.
/// Customers routed here while it is busy wait in line; the distributor caps
/// the line, so its occupancy counter for this lane always equals
/// [`Lane::occupancy`].
pub struct Lane {
    lane_id: usize,
    time_per_item: f64,
    phase: Phase<CustomerData>,
    waiting: VecDeque<CustomerData>,
    served: u64,
}

impl Lane {
    pub const IN_CUSTOMER: &'static str = "in_customer";
    pub const OUT_TO_PAYMENT: &'static str = "out_to_payment";
    pub const OUT_FREE: &'static str = "out_free";

    pub fn new(lane_id: usize, time_per_item: f64) -> Self {
        Self {
            lane_id,
            time_per_item,
            phase: Phase::Idle,
            waiting: VecDeque::new(),
            served: 0,
        }
    }

    pub fn lane_id(&self) -> usize {
        self.lane_id
    }

    /// Scan time for a customer; an empty basket still takes one item's time
    pub fn service_time(&self, customer: &CustomerData) -> SimulationTime {
        if customer.num_items > 0 {
            f64::from(customer.num_items) * self.time_per_item
        } else {
            self.time_per_item
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn current(&self) -> Option<&CustomerData> {
        self.phase.job()
    }

    /// Customers that finished service here
    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Customers in service plus those waiting in line
    pub fn occupancy(&self) -> usize {
        self.waiting.len() + usize::from(self.phase.is_busy())
    }

    fn begin(&mut self, customer: CustomerData, now: SimulationTime) {
        let duration = self.service_time(&customer);
        debug!(
            "[t={:.3}] lane {} serving customer {} for {:.3}",
            now, self.lane_id, customer.customer_id, duration
        );
        self.phase = Phase::start(customer, duration);
    }
}

impl AtomicModel for Lane {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_CUSTOMER),
            PortSpec::output(Self::OUT_TO_PAYMENT),
            PortSpec::output(Self::OUT_FREE).with_description("lane id, once per completed customer"),
        ]
    }

    fn time_advance(&self) -> SimulationTime {
        self.phase.sigma()
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        if self.phase.take().is_some() {
            self.served += 1;
        }
        if let Some(next) = self.waiting.pop_front() {
            self.begin(next, ctx.now);
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
            if self.phase.is_busy() {
                debug!(
                    "[t={:.3}] lane {} busy, customer {} waits ({} ahead)",
                    ctx.now,
                    self.lane_id,
                    customer.customer_id,
                    self.occupancy()
                );
                self.waiting.push_back(customer);
            } else {
                self.begin(customer, ctx.now);
            }
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if let Some(customer) = self.phase.job() {
            outputs.add(Self::OUT_TO_PAYMENT, customer.clone())?;
            outputs.add(Self::OUT_FREE, self.lane_id)?;
        }
        Ok(())
    }
}
