use super::config::StoreConfig;
use super::customer::CustomerData;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{SimulationTime, PASSIVE};
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::{debug, info, warn};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributorPhase {
    Idle,
    /// Buffered messages go out at the current instant
    Send,
}

/// Output port of lane `lane_id`
pub fn lane_port(lane_id: usize) -> String {
    format!("out_lane{}", lane_id)
}

/// Routes customers to lanes and throttles the generator.
///
/// Lanes `0..cash_lanes` are staffed, the rest are self-checkout. The
/// distributor keeps one occupancy counter per lane: incremented when a
/// customer is routed there, decremented when that lane reports itself free.
/// Online orders skip the lanes entirely.
pub struct Distributor {
    cash_lanes: usize,
    self_lanes: usize,
    self_item_limit: u32,
    max_queue: u32,
    queues: Vec<u32>,
    phase: DistributorPhase,

    // Flushed by `output`, cleared by the following internal transition
    routed_now: Vec<(usize, CustomerData)>,
    online_now: Vec<CustomerData>,
    holds_now: usize,
    oks_now: usize,

    routed_per_lane: Vec<u64>,
    freed_per_lane: Vec<u64>,
    online_forwarded: u64,
    dropped: Vec<i64>,
    ignored_frees: u64,
    holds_issued: u64,
    oks_issued: u64,
}

impl Distributor {
    pub const IN_CUSTOMER: &'static str = "in_customer";
    pub const IN_LANE_FREED: &'static str = "in_lane_freed";
    pub const OUT_ONLINE: &'static str = "out_online";
    pub const OUT_HOLD: &'static str = "out_hold";
    pub const OUT_OK: &'static str = "out_ok";
    pub const OUT_WHICH_LANE: &'static str = "out_which_lane";

    pub fn new(cash_lanes: usize, self_lanes: usize, self_item_limit: u32, max_queue: u32) -> Self {
        let total = cash_lanes + self_lanes;
        Self {
            cash_lanes,
            self_lanes,
            self_item_limit,
            max_queue,
            queues: vec![0; total],
            phase: DistributorPhase::Idle,
            routed_now: Vec::new(),
            online_now: Vec::new(),
            holds_now: 0,
            oks_now: 0,
            routed_per_lane: vec![0; total],
            freed_per_lane: vec![0; total],
            online_forwarded: 0,
            dropped: Vec::new(),
            ignored_frees: 0,
            holds_issued: 0,
            oks_issued: 0,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            config.cash_lanes,
            config.self_lanes,
            config.self_item_limit,
            config.max_queue,
        )
    }

    pub fn total_lanes(&self) -> usize {
        self.queues.len()
    }

    fn cash_range(&self) -> Range<usize> {
        0..self.cash_lanes
    }

    fn self_range(&self) -> Range<usize> {
        self.cash_lanes..self.cash_lanes + self.self_lanes
    }

    /// Least occupied lane in `lanes` with room left; lowest index wins ties
    fn least_occupied(&self, lanes: Range<usize>) -> Option<usize> {
        lanes
            .filter(|&lane| self.queues[lane] < self.max_queue)
            .min_by_key(|&lane| (self.queues[lane], lane))
    }

    /// Lane a walk-in customer would be sent to, given the current occupancy.
    ///
    /// Small baskets prefer self-checkout and large ones the staffed lanes;
    /// the other group is the fallback when the preferred one is full.
    pub fn choose_lane(&self, customer: &CustomerData) -> Option<usize> {
        let (preferred, fallback) = if customer.num_items <= self.self_item_limit {
            (self.self_range(), self.cash_range())
        } else {
            (self.cash_range(), self.self_range())
        };
        self.least_occupied(preferred)
            .or_else(|| self.least_occupied(fallback))
    }

    fn lane_freed(&mut self, lane_id: usize, now: SimulationTime) {
        match self.queues.get_mut(lane_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.freed_per_lane[lane_id] += 1;
            }
            _ => {
                self.ignored_frees += 1;
                debug!("[t={:.3}] ignoring lane-freed signal for lane {}", now, lane_id);
            }
        }
        self.oks_now += 1;
    }

    fn route(&mut self, customer: CustomerData, now: SimulationTime) {
        if customer.is_online_order {
            debug!(
                "[t={:.3}] online order {} sent to pickup",
                now, customer.customer_id
            );
            self.online_forwarded += 1;
            self.online_now.push(customer);
            return;
        }

        match self.choose_lane(&customer) {
            Some(lane) => {
                self.queues[lane] += 1;
                self.routed_per_lane[lane] += 1;
                debug!(
                    "[t={:.3}] customer {} ({} items) -> lane {}, occupancy {:?}",
                    now, customer.customer_id, customer.num_items, lane, self.queues
                );
                self.routed_now.push((lane, customer));
            }
            None => {
                warn!(
                    "[t={:.3}] every lane full, dropping customer {} and holding arrivals",
                    now, customer.customer_id
                );
                self.dropped.push(customer.customer_id);
                self.holds_now += 1;
            }
        }
    }

    pub fn phase(&self) -> DistributorPhase {
        self.phase
    }

    /// Current occupancy counter of every lane
    pub fn queue_lengths(&self) -> &[u32] {
        &self.queues
    }

    pub fn max_queue(&self) -> u32 {
        self.max_queue
    }

    /// Customers ever routed to each lane
    pub fn routed_per_lane(&self) -> &[u64] {
        &self.routed_per_lane
    }

    /// Lane-freed signals that decremented each lane
    pub fn freed_per_lane(&self) -> &[u64] {
        &self.freed_per_lane
    }

    pub fn routed(&self) -> u64 {
        self.routed_per_lane.iter().sum()
    }

    pub fn online_forwarded(&self) -> u64 {
        self.online_forwarded
    }

    /// Ids of customers turned away because every lane was full
    pub fn dropped(&self) -> &[i64] {
        &self.dropped
    }

    pub fn ignored_frees(&self) -> u64 {
        self.ignored_frees
    }

    pub fn holds_issued(&self) -> u64 {
        self.holds_issued
    }

    pub fn oks_issued(&self) -> u64 {
        self.oks_issued
    }

    /// True when nothing is buffered for output
    pub fn is_drained(&self) -> bool {
        self.routed_now.is_empty()
            && self.online_now.is_empty()
            && self.holds_now == 0
            && self.oks_now == 0
    }
}

impl AtomicModel for Distributor {
    fn define_ports(&self) -> Vec<PortSpec> {
        let mut ports = vec![
            PortSpec::input(Self::IN_CUSTOMER),
            PortSpec::input(Self::IN_LANE_FREED).with_description("id of a lane that finished a customer"),
        ];
        ports.extend((0..self.total_lanes()).map(|lane| PortSpec::output(&lane_port(lane))));
        ports.push(PortSpec::output(Self::OUT_ONLINE));
        ports.push(PortSpec::output(Self::OUT_HOLD));
        ports.push(PortSpec::output(Self::OUT_OK));
        ports.push(PortSpec::output(Self::OUT_WHICH_LANE));
        ports
    }

    fn time_advance(&self) -> SimulationTime {
        match self.phase {
            DistributorPhase::Idle => PASSIVE,
            DistributorPhase::Send => 0.0,
        }
    }

    fn internal_transition(&mut self, _ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        self.holds_issued += self.holds_now as u64;
        self.oks_issued += self.oks_now as u64;

        self.routed_now.clear();
        self.online_now.clear();
        self.holds_now = 0;
        self.oks_now = 0;
        self.phase = DistributorPhase::Idle;
        Ok(())
    }

    fn external_transition(
        &mut self,
        _elapsed: SimulationTime,
        inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        let now = ctx.now;

        // Freed capacity is visible to customers arriving in the same bag
        for lane_id in inputs.bag::<usize>(Self::IN_LANE_FREED)? {
            self.lane_freed(lane_id, now);
        }
        for customer in inputs.bag::<CustomerData>(Self::IN_CUSTOMER)? {
            self.route(customer, now);
        }

        if !self.is_drained() {
            self.phase = DistributorPhase::Send;
        }
        if self.holds_now > 0 {
            info!(
                "[t={:.3}] hold raised, occupancy {:?} (max {})",
                now, self.queues, self.max_queue
            );
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        if self.phase != DistributorPhase::Send {
            return Ok(());
        }

        for _ in 0..self.holds_now {
            outputs.add(Self::OUT_HOLD, true)?;
        }
        for _ in 0..self.oks_now {
            outputs.add(Self::OUT_OK, true)?;
        }
        for (lane, customer) in &self.routed_now {
            outputs.add(&lane_port(*lane), customer.clone())?;
            outputs.add(Self::OUT_WHICH_LANE, *lane)?;
        }
        for customer in &self.online_now {
            outputs.add(Self::OUT_ONLINE, customer.clone())?;
        }
        Ok(())
    }
}
