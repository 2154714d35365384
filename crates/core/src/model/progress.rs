/// Upper bound for level progress.
pub const LEVEL_PROGRESS_MAX: u32 = 100;

/// Minutes of reading needed before leaving a book earns any credit.
pub const EXIT_CREDIT_MIN_MINUTES: i64 = 2;

/// Progress points earned for the given whole minutes of reading.
///
/// One point per two full minutes; negative input earns nothing.
#[must_use]
pub fn gained_progress(elapsed_minutes: i64) -> u32 {
    u32::try_from(elapsed_minutes.max(0) / 2).unwrap_or(u32::MAX)
}

/// Reader-wide progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    level_progress: u32,
    completed_count: u32,
}

impl ProgressState {
    /// Rehydrate from persisted counters, clamping level progress into range.
    #[must_use]
    pub fn from_persisted(level_progress: u32, completed_count: u32) -> Self {
        Self {
            level_progress: level_progress.min(LEVEL_PROGRESS_MAX),
            completed_count,
        }
    }

    #[must_use]
    pub fn level_progress(&self) -> u32 {
        self.level_progress
    }

    #[must_use]
    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    /// Add progress points, saturating at `LEVEL_PROGRESS_MAX`.
    #[must_use]
    pub fn with_credit(self, gained: u32) -> Self {
        Self {
            level_progress: self
                .level_progress
                .saturating_add(gained)
                .min(LEVEL_PROGRESS_MAX),
            ..self
        }
    }

    #[must_use]
    pub fn with_completion(self) -> Self {
        Self {
            completed_count: self.completed_count.saturating_add(1),
            ..self
        }
    }
}
