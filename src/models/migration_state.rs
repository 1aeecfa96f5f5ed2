use std::fmt;

/// Whether the one-time format migration has completed. Persisted as the
/// boolean `migrated` key; anything other than `true` reads as `NotRun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationState {
    #[default]
    NotRun,
    Completed,
}

impl MigrationState {
    pub fn from_flag(flag: Option<&serde_json::Value>) -> Self {
        match flag.and_then(|v| v.as_bool()) {
            Some(true) => MigrationState::Completed,
            _ => MigrationState::NotRun,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MigrationState::Completed)
    }
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::NotRun => f.write_str("not run"),
            MigrationState::Completed => f.write_str("completed"),
        }
    }
}
