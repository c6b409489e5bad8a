use crate::core::types::SimulationTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A component's next self-triggered event
#[derive(Debug, Clone, Copy)]
pub struct ScheduledWakeup {
    pub time: SimulationTime,
    pub sequence_num: u64,
    pub component: usize,
    generation: u64,
}

impl PartialEq for ScheduledWakeup {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledWakeup {}

impl PartialOrd for ScheduledWakeup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledWakeup {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Min-heap of component wake-up times.
///
/// Rescheduling a component bumps its generation; superseded heap entries are
/// discarded lazily when they reach the top. Passive components
/// (infinite time advance) have no entry at all.
pub struct EventScheduler {
    queue: BinaryHeap<ScheduledWakeup>,
    generations: Vec<u64>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a scheduler for `component_count` components, all passive
    pub fn new(component_count: usize) -> Self {
        Self {
            queue: BinaryHeap::new(),
            generations: vec![0; component_count],
            sequence_counter: 0,
        }
    }

    /// Replace the wake-up time of `component`
    pub fn schedule(&mut self, component: usize, time: SimulationTime) {
        self.generations[component] += 1;
        if !time.is_finite() {
            return;
        }

        self.queue.push(ScheduledWakeup {
            time,
            sequence_num: self.sequence_counter,
            component,
            generation: self.generations[component],
        });
        self.sequence_counter += 1;
    }

    /// Earliest pending wake-up time, if any component is active
    pub fn peek_next_time(&mut self) -> Option<SimulationTime> {
        self.discard_stale();
        self.queue.peek().map(|wakeup| wakeup.time)
    }

    /// Remove and return every component due at `time`, in insertion order
    pub fn take_imminent(&mut self, time: SimulationTime) -> Vec<usize> {
        let mut imminent = Vec::new();

        loop {
            self.discard_stale();
            match self.queue.peek() {
                Some(wakeup) if wakeup.time == time => {
                    imminent.push(wakeup.component);
                    self.queue.pop();
                }
                _ => break,
            }
        }

        imminent.sort_unstable();
        imminent
    }

    /// Check if any component has a pending wake-up
    pub fn has_events(&mut self) -> bool {
        self.peek_next_time().is_some()
    }

    fn discard_stale(&mut self) {
        while let Some(wakeup) = self.queue.peek() {
            if wakeup.generation == self.generations[wakeup.component] {
                break;
            }
            self.queue.pop();
        }
    }
}
