use super::customer::CustomerData;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{SimulationTime, PASSIVE};
use crate::core::values::{EventInputs, EventOutputs, InputBag, OutputBag};
use log::trace;

/// Remaining times at or below this count as arrived
pub const ARRIVAL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct InFlight {
    remaining: SimulationTime,
    customer: CustomerData,
}

/// Every paid customer walking to the exit, each with its own countdown.
///
/// Entries stay sorted by remaining time (stable for ties), so the head is
/// always the next arrival and the time advance is the head's remaining time.
pub struct Traveler {
    in_flight: Vec<InFlight>,
    arrived: u64,
}

impl Traveler {
    pub const IN_CUSTOMER: &'static str = "in_customer";
    pub const OUT_ARRIVED: &'static str = "out_arrived";

    pub fn new() -> Self {
        Self {
            in_flight: Vec::new(),
            arrived: 0,
        }
    }

    fn elapse(&mut self, elapsed: SimulationTime) {
        for entry in &mut self.in_flight {
            entry.remaining = (entry.remaining - elapsed).max(0.0);
        }
    }

    fn insert(&mut self, customer: CustomerData) {
        let remaining = customer.travel_time.max(0.0);
        let at = self
            .in_flight
            .partition_point(|entry| entry.remaining <= remaining);
        self.in_flight.insert(at, InFlight { remaining, customer });
    }

    /// Entries due at the next wake-up
    fn due(&self) -> impl Iterator<Item = &InFlight> {
        let head = self.time_advance();
        self.in_flight
            .iter()
            .take_while(move |entry| entry.remaining <= head + ARRIVAL_EPSILON)
    }

    /// Customers currently walking
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Ids of walking customers, soonest first
    pub fn in_flight_ids(&self) -> Vec<i64> {
        self.in_flight.iter().map(|e| e.customer.customer_id).collect()
    }

    pub fn arrived(&self) -> u64 {
        self.arrived
    }
}

impl Default for Traveler {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicModel for Traveler {
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::IN_CUSTOMER),
            PortSpec::output(Self::OUT_ARRIVED),
        ]
    }

    fn time_advance(&self) -> SimulationTime {
        self.in_flight.first().map_or(PASSIVE, |entry| entry.remaining)
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        let step = self.time_advance();
        if !step.is_finite() {
            return Ok(());
        }
        self.elapse(step);

        let before = self.in_flight.len();
        self.in_flight.retain(|entry| entry.remaining > ARRIVAL_EPSILON);
        let arrived = before - self.in_flight.len();
        self.arrived += arrived as u64;

        trace!(
            "[t={:.3}] {} customers reached the exit, {} still walking",
            ctx.now,
            arrived,
            self.in_flight.len()
        );
        Ok(())
    }

    fn external_transition(
        &mut self,
        elapsed: SimulationTime,
        inputs: &InputBag,
        _ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        self.elapse(elapsed);
        for customer in inputs.bag::<CustomerData>(Self::IN_CUSTOMER)? {
            self.insert(customer);
        }
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        for entry in self.due() {
            outputs.add(Self::OUT_ARRIVED, entry.customer.clone())?;
        }
        Ok(())
    }
}
