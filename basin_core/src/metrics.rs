use std::hash::Hasher;

use serde::Serialize;

use crate::events::FloodEvent;

/// Counters collected while a solver runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolveMetrics {
    pub events: u64,
    pub selects: u64,
    pub zeros: u64,
    pub lowerings: u64,
    pub expansions: u64,
    pub rim_rounds: u64,
    pub drain_floods: u64,
}

impl SolveMetrics {
    pub fn record(&mut self, event: &FloodEvent) {
        self.events += 1;
        match event {
            FloodEvent::Select { .. } => self.selects += 1,
            FloodEvent::Zero { .. } => self.zeros += 1,
            FloodEvent::LowerHeight { .. } => self.lowerings += 1,
            FloodEvent::ExpandOver { .. } => self.expansions += 1,
            FloodEvent::NextMinimalBorder { .. } => self.rim_rounds += 1,
        }
    }

    pub fn mutations(&self) -> u64 {
        self.zeros + self.lowerings
    }
}

/// Deterministic FNV-1a digest of an event sequence.
///
/// Two runs over the same terrain and configuration must produce the same
/// fingerprint; `DefaultHasher` is randomized per process and cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFingerprint {
    state: u64,
}

impl TraceFingerprint {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    pub fn record(&mut self, event: &FloodEvent) {
        let cell = event.cell();
        self.write_u8(event.tag());
        self.write(&cell.row.to_le_bytes());
        self.write(&cell.col.to_le_bytes());
        if let FloodEvent::LowerHeight { depth, .. } = event {
            self.write(&depth.to_le_bytes());
        }
    }

    pub fn of<'a>(events: impl IntoIterator<Item = &'a FloodEvent>) -> u64 {
        let mut fingerprint = Self::new();
        for event in events {
            fingerprint.record(event);
        }
        fingerprint.finish()
    }
}

impl Default for TraceFingerprint {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for TraceFingerprint {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}
