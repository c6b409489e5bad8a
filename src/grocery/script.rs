//! Replaying recorded inputs
//!
//! A [`ScriptedSource`] emits a fixed list of timed values on its `out` port.
//! Customer scripts are plain text, one arrival per line:
//!
//! ```text
//! # time id items online pay travel search
//! 0.0  1  5 0 card 120 0
//! 12.5 2 30 1 cash  60 45
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use super::customer::CustomerData;
use crate::core::components::{AtomicModel, PortSpec, TransitionContext};
use crate::core::error::SimError;
use crate::core::types::{SimulationTime, PASSIVE};
use crate::core::values::{EventOutputs, InputBag, OutputBag};
use log::debug;
use std::fs;
use std::path::Path;

const SAME_INSTANT: f64 = 1e-9;

/// Emits each scheduled value at its time; values sharing a time leave in one bag
pub struct ScriptedSource<T> {
    schedule: Vec<(SimulationTime, T)>,
    next: usize,
    clock: SimulationTime,
}

impl<T> ScriptedSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub const OUT: &'static str = "out";

    /// Values are sorted by time; entries with equal times keep their order
    pub fn new(mut schedule: Vec<(SimulationTime, T)>) -> Self {
        schedule.retain(|(t, _)| t.is_finite());
        schedule.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            schedule,
            next: 0,
            clock: 0.0,
        }
    }

    /// Values not yet emitted
    pub fn remaining(&self) -> usize {
        self.schedule.len() - self.next
    }

    fn due(&self) -> &[(SimulationTime, T)] {
        let Some((head, _)) = self.schedule.get(self.next) else {
            return &[];
        };
        let end = self.schedule[self.next..]
            .iter()
            .position(|(t, _)| *t > head + SAME_INSTANT)
            .map_or(self.schedule.len(), |offset| self.next + offset);
        &self.schedule[self.next..end]
    }
}

impl<T> AtomicModel for ScriptedSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn define_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::output(Self::OUT)]
    }

    fn initialize(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        self.clock = ctx.now;
        Ok(())
    }

    fn time_advance(&self) -> SimulationTime {
        match self.schedule.get(self.next) {
            Some((t, _)) => (t - self.clock).max(0.0),
            None => PASSIVE,
        }
    }

    fn internal_transition(&mut self, ctx: &mut TransitionContext<'_>) -> Result<(), SimError> {
        self.next += self.due().len();
        self.clock = ctx.now;
        debug!(
            "[t={:.3}] {} scripted values remaining",
            ctx.now,
            self.remaining()
        );
        Ok(())
    }

    fn external_transition(
        &mut self,
        _elapsed: SimulationTime,
        _inputs: &InputBag,
        ctx: &mut TransitionContext<'_>,
    ) -> Result<(), SimError> {
        self.clock = ctx.now;
        Ok(())
    }

    fn output(&self, outputs: &mut OutputBag) -> Result<(), SimError> {
        for (_, value) in self.due() {
            outputs.add(Self::OUT, value.clone())?;
        }
        Ok(())
    }
}

/// Parse a customer script held in memory
pub fn parse_customer_script(text: &str) -> Result<Vec<(SimulationTime, CustomerData)>, SimError> {
    let mut arrivals = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let parse_error = |reason: String| SimError::Parse {
            line: index + 1,
            reason,
        };

        let Some((time, record)) = fields.split_first() else {
            continue;
        };
        let time = time
            .parse::<f64>()
            .map_err(|e| parse_error(format!("arrival time '{}': {}", time, e)))?;
        if !(time >= 0.0) || !time.is_finite() {
            return Err(parse_error(format!("arrival time {} is not a valid instant", time)));
        }
        let customer = CustomerData::from_fields(record, index + 1)?;
        arrivals.push((time, customer));
    }

    Ok(arrivals)
}

/// Read a customer script from disk
pub fn load_customer_script<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<(SimulationTime, CustomerData)>, SimError> {
    let text = fs::read_to_string(path)?;
    parse_customer_script(&text)
}
