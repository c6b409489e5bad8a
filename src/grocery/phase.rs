use crate::core::types::{SimulationTime, PASSIVE};

/// Phase of a single-server component.
///
/// The remaining time only exists while busy, so an idle component always
/// reports an infinite time advance and a busy one never does.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Busy { sigma: SimulationTime, job: T },
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    /// Start serving `job` for `duration`; negative durations are clamped
    pub fn start(job: T, duration: SimulationTime) -> Self {
        Phase::Busy {
            sigma: duration.max(0.0),
            job,
        }
    }

    /// Remaining time until completion, `PASSIVE` when idle
    pub fn sigma(&self) -> SimulationTime {
        match self {
            Phase::Idle => PASSIVE,
            Phase::Busy { sigma, .. } => *sigma,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    /// Account for `elapsed` time passing without completion
    pub fn elapse(&mut self, elapsed: SimulationTime) {
        if let Phase::Busy { sigma, .. } = self {
            *sigma = (*sigma - elapsed).max(0.0);
        }
    }

    /// The job in service, if any
    pub fn job(&self) -> Option<&T> {
        match self {
            Phase::Idle => None,
            Phase::Busy { job, .. } => Some(job),
        }
    }

    /// Finish service and return the job, leaving the phase idle
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Phase::Idle => None,
            Phase::Busy { job, .. } => Some(job),
        }
    }
}
