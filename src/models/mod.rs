pub mod bet;
pub mod profile;
pub mod report;
pub mod selection;

pub use bet::{Bet, BetInput, BetRow};
pub use profile::{Profile, TipsterBook};
pub use report::report_type;
pub use selection::{Selection, SelectionInput, SelectionRow};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored value that does not map onto one of the known variants.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown bet status: {0}")]
    UnknownStatus(String),

    #[error("unknown bet kind: {0}")]
    UnknownKind(String),

    #[error("unknown timing: {0}")]
    UnknownTiming(String),
}

// ---------------------------------------------------------------------------
// BetStatus
// ---------------------------------------------------------------------------

/// Outcome of a bet or of one of its selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Cashout,
    Void,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Cashout => "cashout",
            BetStatus::Void => "void",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(BetStatus::Pending),
            "won" => Some(BetStatus::Won),
            "lost" => Some(BetStatus::Lost),
            "cashout" => Some(BetStatus::Cashout),
            "void" => Some(BetStatus::Void),
            _ => None,
        }
    }

    /// Statuses that count towards tipster rankings and monthly reports.
    pub fn is_rankable(&self) -> bool {
        matches!(self, BetStatus::Won | BetStatus::Lost | BetStatus::Cashout)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses eligible for ranking, in the form repositories filter on.
pub const RANKABLE_STATUSES: [BetStatus; 3] = [BetStatus::Won, BetStatus::Lost, BetStatus::Cashout];

// ---------------------------------------------------------------------------
// BetKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    Single,
    Multiple,
    System,
    Exchange,
}

impl BetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetKind::Single => "single",
            BetKind::Multiple => "multiple",
            BetKind::System => "system",
            BetKind::Exchange => "exchange",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(BetKind::Single),
            "multiple" => Some(BetKind::Multiple),
            "system" => Some(BetKind::System),
            "exchange" => Some(BetKind::Exchange),
            _ => None,
        }
    }

    /// Kinds whose odds and status come from their selections.
    pub fn is_multi_leg(&self) -> bool {
        matches!(self, BetKind::Multiple | BetKind::System)
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Prematch,
    Live,
}

impl Timing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timing::Prematch => "prematch",
            Timing::Live => "live",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "prematch" => Some(Timing::Prematch),
            "live" => Some(Timing::Live),
            _ => None,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
