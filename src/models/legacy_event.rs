use serde::{Deserialize, Serialize};

/// Punch label used by the single-event storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    ClockIn,
    ClockOut,
}

impl LegacyKind {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "上班" => Some(Self::ClockIn),
            "下班" => Some(Self::ClockOut),
            _ => None,
        }
    }
}

/// One clock-in or clock-out punch from the pre-period storage format.
/// Only ever read as migration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEvent {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
}

impl LegacyEvent {
    pub fn legacy_kind(&self) -> Option<LegacyKind> {
        LegacyKind::from_label(&self.kind)
    }
}
