/// One normalized spreadsheet row representing a recruiting candidate.
///
/// All string fields are trimmed during parsing; `profile_link` is empty when
/// the source row had no link. `score` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub role: String,
    pub location: String,
    pub profile_link: String,
    pub score: f64,
}

impl Candidate {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::for_score(self.score)
    }
}

/// Presentational bucket derived from a candidate's score. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "tier-high",
            Self::Medium => "tier-medium",
            Self::Low => "tier-low",
        }
    }
}

/// Whether the latest fetch produced trustworthy data. A degraded snapshot
/// still renders, but the page shows a warning instead of an empty-sheet
/// message so throttling is distinguishable from a genuinely empty tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAvailability {
    Available,
    Degraded(DegradedReason),
}

impl DataAvailability {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    MissingCredentials,
    Throttled,
    PermissionDenied,
    Unreachable,
}

impl DegradedReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "credentials unavailable",
            Self::Throttled => "rate limited by the spreadsheet API",
            Self::PermissionDenied => "spreadsheet access denied",
            Self::Unreachable => "spreadsheet unreachable",
        }
    }
}
