use crate::leaderboard::domain::Candidate;

const NAME_COLUMN: &str = "Nome";
const ROLE_COLUMN: &str = "Cargo";
const LOCATION_COLUMN: &str = "Local";
const LINK_COLUMN: &str = "Link";
const SCORE_COLUMN: &str = "Nota";

/// Positions of the known columns within one tab's header row. Extra columns
/// are ignored; a missing column leaves its slot `None` and every candidate
/// field sourced from it defaults to empty.
#[derive(Debug, Default)]
struct HeaderIndex {
    name: Option<usize>,
    role: Option<usize>,
    location: Option<usize>,
    link: Option<usize>,
    score: Option<usize>,
}

impl HeaderIndex {
    fn from_header(cells: &[String]) -> Self {
        let mut index = Self::default();
        for (position, cell) in cells.iter().enumerate() {
            match cell.trim() {
                NAME_COLUMN => index.name.get_or_insert(position),
                ROLE_COLUMN => index.role.get_or_insert(position),
                LOCATION_COLUMN => index.location.get_or_insert(position),
                LINK_COLUMN => index.link.get_or_insert(position),
                SCORE_COLUMN => index.score.get_or_insert(position),
                _ => continue,
            };
        }
        index
    }

    fn candidate(&self, row: &[String]) -> Candidate {
        Candidate {
            name: field(row, self.name),
            role: field(row, self.role),
            location: field(row, self.location),
            profile_link: field(row, self.link),
            score: parse_score(&field(row, self.score)),
        }
    }
}

/// Converts one tab's grid (header row first) into candidates, preserving row
/// order.
pub(crate) fn parse_tab(rows: &[Vec<String>]) -> Vec<Candidate> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    let index = HeaderIndex::from_header(header);
    body.iter().map(|row| index.candidate(row)).collect()
}

fn field(row: &[String], slot: Option<usize>) -> String {
    slot.and_then(|position| row.get(position))
        .map(|cell| cell.trim().to_string())
        .unwrap_or_default()
}

/// Scores arrive as free text. Anything that is not a finite, non-negative
/// number coerces to 0.
fn parse_score(raw: &str) -> f64 {
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    if parsed.is_finite() && parsed > 0.0 {
        parsed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn maps_columns_by_header_name_and_trims_fields() {
        let rows = grid(&[
            &["Extra", "Nome", "Cargo", "Local", "Link", "Nota"],
            &["x", "  Ana Souza ", " Engenheira ", "Recife", " https://l.in/ana ", "87.5"],
        ]);

        let candidates = parse_tab(&rows);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Ana Souza");
        assert_eq!(candidates[0].role, "Engenheira");
        assert_eq!(candidates[0].location, "Recife");
        assert_eq!(candidates[0].profile_link, "https://l.in/ana");
        assert_eq!(candidates[0].score, 87.5);
    }

    #[test]
    fn missing_columns_and_short_rows_default_to_empty() {
        let rows = grid(&[&["Nome", "Nota"], &["Bruno"]]);

        let candidates = parse_tab(&rows);
        assert_eq!(candidates[0].name, "Bruno");
        assert_eq!(candidates[0].role, "");
        assert_eq!(candidates[0].location, "");
        assert_eq!(candidates[0].profile_link, "");
        assert_eq!(candidates[0].score, 0.0);
    }

    #[test]
    fn unparseable_or_negative_scores_coerce_to_zero() {
        let rows = grid(&[
            &["Nome", "Nota"],
            &["Ana", "abc"],
            &["Bia", "-12"],
            &["Caio", "70"],
            &["Duda", "NaN"],
        ]);

        let scores: Vec<f64> = parse_tab(&rows).iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.0, 0.0, 70.0, 0.0]);
    }

    #[test]
    fn header_only_and_empty_tabs_yield_no_candidates() {
        assert!(parse_tab(&[]).is_empty());
        assert!(parse_tab(&grid(&[&["Nome", "Cargo"]])).is_empty());
    }
}
