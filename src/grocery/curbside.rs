use super::customer::CustomerData;
use super::phase::Phase;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::debug;
use std::collections::VecDeque;

/// Hands packed orders to customers at the curb, one at a time.
///
/// An order is held for the customer's `travel_time`, read as the time until
/// the customer shows up to collect it.
pub struct CurbsideDispatcher {
    phase: Phase<CustomerData>,
    queue: VecDeque<CustomerData>,
    collected: u64,
}

impl CurbsideDispatcher {
    pub const IN_ORDER: &'static str = "in_order";
    pub const OUT_COLLECTED: &'static str = "out_collected";

    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            queue: VecDeque::new(),
            collected: 0,
        }
    }

    fn begin(&mut self, order: CustomerData) {
        let wait = order.travel_time.max(0.0);
        self.phase = Phase::start(order, wait);
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn collected(&self) -> u64 {
        self.collected
    }
}

impl Default for CurbsideDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicModel for CurbsideDispatcher {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_ORDER),
            PortSpec::output(Self::OUT_COLLECTED),
        ]
    }

    fn time_advance(&self) -> SimulationTime {
        self.phase.sigma()
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        if let Some(order) = self.phase.take() {
            self.collected += 1;
            debug!("[t={:.3}] order {} collected", ctx.now, order.customer_id);
        }
        if let Some(next) = self.queue.pop_front() {
            self.begin(next);
        }
        Ok(())
    }

    fn external_transition(
        &mut self,
        elapsed: SimulationTime,
        inputs: &InputBag,
        _ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        self.phase.elapse(elapsed);

        for order in inputs.bag::<CustomerData>(Self::IN_ORDER)? {
            if self.phase.is_idle() {
                self.begin(order);
            } else {
                self.queue.push_back(order);
            }
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if let Some(order) = self.phase.job() {
            outputs.add(Self::OUT_COLLECTED, order.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PASSIVE;
    use crate::grocery::test_support::{bag_of, payloads, Harness};

    #[test]
    fn test_wait_is_customer_travel_time() {
        let mut h = Harness::new(CurbsideDispatcher::new());
        h.external(10.0, bag_of(CurbsideDispatcher::IN_ORDER, vec![CustomerData::online(1, 5, 42.0, 0.0)]));
        assert_eq!(h.sigma(), 42.0);

        let events = h.fire();
        assert_eq!(h.now(), 52.0);
        assert_eq!(payloads::<CustomerData>(&events, CurbsideDispatcher::OUT_COLLECTED)[0].customer_id, 1);
        assert_eq!(h.sigma(), PASSIVE);
    }

    #[test]
    fn test_queued_orders_start_their_own_wait() {
        let mut h = Harness::new(CurbsideDispatcher::new());
        h.external(
            0.0,
            bag_of(
                CurbsideDispatcher::IN_ORDER,
                vec![CustomerData::online(1, 5, 10.0, 0.0), CustomerData::online(2, 5, 4.0, 0.0)],
            ),
        );
        assert_eq!(h.model.queue_len(), 1);

        h.fire();
        assert_eq!(h.now(), 10.0);
        assert_eq!(h.sigma(), 4.0);

        let events = h.fire();
        assert_eq!(h.now(), 14.0);
        assert_eq!(payloads::<CustomerData>(&events, CurbsideDispatcher::OUT_COLLECTED)[0].customer_id, 2);
        assert_eq!(h.model.collected(), 2);
    }
}
