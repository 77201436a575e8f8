//! Lap ledger.

/// Result of recording a lap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LapOutcome {
    /// The lap was appended
    Recorded(String),
    /// An identical lap already exists; nothing changed
    Duplicate(String),
}

/// Insertion-ordered set of formatted lap times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LapLedger {
    laps: Vec<String>,
}

impl LapLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `lap` unless an equal entry exists.
    pub fn record(&mut self, lap: String) -> LapOutcome {
        if self.laps.contains(&lap) {
            return LapOutcome::Duplicate(lap);
        }
        self.laps.push(lap.clone());
        LapOutcome::Recorded(lap)
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.laps
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }
}
