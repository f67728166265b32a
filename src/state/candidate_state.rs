/// Candidate state definitions for tracking a single visit
///
/// A candidate only lives for the duration of one visit, so these states are
/// never persisted; they exist for logging and for the pass report.
use std::fmt;

/// Represents the current state of a candidate during its visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateState {
    // ===== Active States =====
    /// Candidate was removed from the frontier
    Drawn,

    /// Profile, timeline or followers are being fetched
    Fetching,

    /// Posts are being run through the language gate
    Classifying,

    // ===== Terminal States =====
    /// Candidate passed the gate and was committed
    Accepted,

    /// Candidate was protected, had no posts, or failed the gate
    Rejected,

    /// A remote error ended the visit
    Errored,
}

impl CandidateState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Errored)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: CandidateState) -> bool {
        use CandidateState::*;
        matches!(
            (self, next),
            (Drawn, Fetching)
                | (Fetching, Classifying)
                | (Fetching, Rejected)
                | (Fetching, Errored)
                | (Classifying, Accepted)
                | (Classifying, Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drawn => "drawn",
            Self::Fetching => "fetching",
            Self::Classifying => "classifying",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for CandidateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
