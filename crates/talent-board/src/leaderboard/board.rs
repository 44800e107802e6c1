use std::cmp::Ordering;

use crate::leaderboard::domain::{Candidate, ScoreTier};

/// Everything the page needs for one render: ranked rows, the filter options
/// drawn from the unfiltered list, and the summary metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub rows: Vec<BoardRow>,
    pub role_options: Vec<String>,
    pub metrics: BoardMetrics,
    pub active_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub rank: usize,
    pub candidate: Candidate,
    pub tier: ScoreTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardMetrics {
    pub total: usize,
    pub average_score: f64,
    pub top_name: String,
}

impl BoardView {
    pub fn build(candidates: &[Candidate], role_filter: Option<&str>) -> Self {
        let active_role = role_filter
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string);

        // Options always come from the unfiltered list so switching roles
        // never narrows the selector itself.
        let mut role_options: Vec<String> = candidates
            .iter()
            .map(|candidate| candidate.role.trim())
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();
        role_options.sort();
        role_options.dedup();

        let mut ranked: Vec<&Candidate> = match &active_role {
            Some(role) => candidates
                .iter()
                .filter(|candidate| candidate.role.trim() == role)
                .collect(),
            None => candidates.iter().collect(),
        };
        // Stable sort: equal scores keep their tab-then-row order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let metrics = BoardMetrics::from_ranked(&ranked);
        let rows = ranked
            .into_iter()
            .enumerate()
            .map(|(position, candidate)| BoardRow {
                rank: position + 1,
                tier: candidate.tier(),
                candidate: candidate.clone(),
            })
            .collect();

        Self {
            rows,
            role_options,
            metrics,
            active_role,
        }
    }
}

impl BoardMetrics {
    fn from_ranked(ranked: &[&Candidate]) -> Self {
        let total = ranked.len();
        let average_score = if total == 0 {
            0.0
        } else {
            ranked.iter().map(|candidate| candidate.score).sum::<f64>() / total as f64
        };
        let top_name = ranked
            .first()
            .map(|candidate| candidate.name.clone())
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            total,
            average_score,
            top_name,
        }
    }
}
