use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[default]
    Main,
    Overtime,
}

impl PeriodType {
    pub const ALL: [PeriodType; 2] = [PeriodType::Main, PeriodType::Overtime];

    /// Accepts the stored names and the labels used by the old
    /// mobile app export (`主时段` / `加班时段`).
    pub fn pt_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "main" | "m" | "主时段" => Some(Self::Main),
            "overtime" | "ot" | "o" | "加班时段" => Some(Self::Overtime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Main => "main",
            PeriodType::Overtime => "overtime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PeriodType::Main => "Main",
            PeriodType::Overtime => "Overtime",
        }
    }

    pub fn is_overtime(&self) -> bool {
        matches!(self, PeriodType::Overtime)
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
