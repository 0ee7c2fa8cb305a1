/// Where a generation is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting signals and dispatching orders.
    Running,
    /// Threshold reached or input closed; waiting for in-flight orders only.
    Draining,
    /// Drained; a fresh generation is about to start.
    Restarting,
    /// Input closed and drained; no further generations.
    Completed,
}

/// Snapshot of the active generation, published on every transition.
///
/// All counts belong to `generation` and start from zero in each new one.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorStatus {
    pub generation: u64,
    pub phase: Phase,
    /// Orders dispatched this generation, counted on receipt.
    pub processed: u32,
    pub in_flight: usize,
    pub succeeded: u64,
    pub failed: u64,
    /// Signals dead-lettered this generation.
    pub rejected: u64,
}

impl OrchestratorStatus {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            phase: Phase::Running,
            processed: 0,
            in_flight: 0,
            succeeded: 0,
            failed: 0,
            rejected: 0,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.in_flight == 0
    }
}
