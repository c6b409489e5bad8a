use super::config::PackerOverflow;
use super::customer::CustomerData;
use super::phase::Phase;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::SimulationTime;
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::{debug, warn};
use std::collections::VecDeque;

/// Packs online orders one at a time.
///
/// Walk-in customers that reach the packer are discarded. What happens to an
/// order arriving while another is being packed depends on [`PackerOverflow`].
pub struct Packer {
    time_per_item: f64,
    overflow: PackerOverflow,
    phase: Phase<CustomerData>,
    backlog: VecDeque<CustomerData>,
    packed: u64,
    rejected: u64,
    dropped: u64,
}

impl Packer {
    pub const IN_ORDER: &'static str = "in_order";
    pub const OUT_PACKED: &'static str = "out_packed";

    pub fn new(time_per_item: f64) -> Self {
        Self::with_overflow(time_per_item, PackerOverflow::default())
    }

    pub fn with_overflow(time_per_item: f64, overflow: PackerOverflow) -> Self {
        Self {
            time_per_item,
            overflow,
            phase: Phase::Idle,
            backlog: VecDeque::new(),
            packed: 0,
            rejected: 0,
            dropped: 0,
        }
    }

    /// `search_time` when positive, otherwise derived from the item count
    pub fn pack_time(&self, order: &CustomerData) -> SimulationTime {
        if order.search_time > 0.0 {
            order.search_time
        } else if order.num_items > 0 {
            f64::from(order.num_items) * self.time_per_item
        } else {
            self.time_per_item
        }
    }

    fn begin(&mut self, order: CustomerData) {
        let duration = self.pack_time(&order);
        self.phase = Phase::start(order, duration);
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn packed(&self) -> u64 {
        self.packed
    }

    /// Walk-in customers discarded at the input
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Online orders discarded because the packer was busy
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl AtomicModel for Packer {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_ORDER),
            PortSpec::output(Self::OUT_PACKED),
        ]
    }

    fn time_advance(&self) -> SimulationTime {
        self.phase.sigma()
    }

    fn internal_transition(&mut self, _ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        if self.phase.take().is_some() {
            self.packed += 1;
        }
        if let Some(next) = self.backlog.pop_front() {
            self.begin(next);
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

        for order in inputs.bag::<CustomerData>(Self::IN_ORDER)? {
            if !order.is_online_order {
                self.rejected += 1;
                debug!(
                    "[t={:.3}] packer discards walk-in customer {}",
                    ctx.now, order.customer_id
                );
                continue;
            }

            if self.phase.is_idle() {
                self.begin(order);
                continue;
            }

            match self.overflow {
                PackerOverflow::Queue => self.backlog.push_back(order),
                PackerOverflow::Drop => {
                    self.dropped += 1;
                    warn!(
                        "[t={:.3}] packer busy, dropping online order {}",
                        ctx.now, order.customer_id
                    );
                }
            }
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if let Some(order) = self.phase.job() {
            outputs.add(Self::OUT_PACKED, order.clone())?;
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
    fn test_pack_time_rules() {
        let packer = Packer::new(1.5);
        assert_eq!(packer.pack_time(&CustomerData::online(1, 4, 10.0, 30.0)), 30.0);
        assert_eq!(packer.pack_time(&CustomerData::online(1, 4, 10.0, 0.0)), 6.0);
        assert_eq!(packer.pack_time(&CustomerData::online(1, 0, 10.0, 0.0)), 1.5);
    }

    #[test]
    fn test_walk_in_customers_discarded() {
        let mut h = Harness::new(Packer::new(1.0));
        h.external(0.0, bag_of(Packer::IN_ORDER, vec![CustomerData::walk_in(1, 3, 5.0)]));
        assert!(!h.model.is_busy());
        assert_eq!(h.sigma(), PASSIVE);
        assert_eq!(h.model.rejected(), 1);
    }

    #[test]
    fn test_queue_overflow_packs_in_order() {
        let mut h = Harness::new(Packer::with_overflow(1.0, PackerOverflow::Queue));
        h.external(
            0.0,
            bag_of(
                Packer::IN_ORDER,
                vec![CustomerData::online(1, 2, 5.0, 0.0), CustomerData::online(2, 3, 5.0, 0.0)],
            ),
        );
        assert_eq!(h.model.backlog_len(), 1);

        let first = h.fire();
        assert_eq!(h.now(), 2.0);
        assert_eq!(payloads::<CustomerData>(&first, Packer::OUT_PACKED)[0].customer_id, 1);

        let second = h.fire();
        assert_eq!(h.now(), 5.0);
        assert_eq!(payloads::<CustomerData>(&second, Packer::OUT_PACKED)[0].customer_id, 2);
        assert_eq!(h.model.packed(), 2);
        assert_eq!(h.sigma(), PASSIVE);
    }

    #[test]
    fn test_drop_overflow_discards_second_order() {
        let mut h = Harness::new(Packer::with_overflow(1.0, PackerOverflow::Drop));
        h.external(0.0, bag_of(Packer::IN_ORDER, vec![CustomerData::online(1, 2, 5.0, 0.0)]));
        h.external(1.0, bag_of(Packer::IN_ORDER, vec![CustomerData::online(2, 2, 5.0, 0.0)]));

        assert_eq!(h.model.dropped(), 1);
        assert_eq!(h.sigma(), 1.0);
        h.fire();
        assert_eq!(h.sigma(), PASSIVE);
        assert_eq!(h.model.packed(), 1);
    }
}
