use std::fmt::Write as _;

use crate::leaderboard::board::BoardView;
use crate::leaderboard::directory::CandidateSnapshot;
use crate::leaderboard::domain::DataAvailability;

const PAGE_TITLE: &str = "Hunting Leaderboard";

const PAGE_STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f6f7f9;color:#1c1e21}\
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}\
header{display:flex;flex-wrap:wrap;gap:1rem;align-items:center;justify-content:space-between}\
form{display:flex;gap:0.5rem;align-items:center}\
select{min-width:14rem;padding:0.4rem}\
.warning{background:#fff3cd;border:1px solid #e0c36b;border-radius:0.5rem;padding:0.75rem 1rem;margin:1rem 0}\
.metrics{display:grid;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr));gap:1rem;margin:1.5rem 0}\
.metric{background:#fff;border:1px solid #e3e5e8;border-radius:0.5rem;padding:1rem}\
.metric h2{font-size:0.85rem;margin:0;color:#5f6672;text-transform:uppercase}\
.metric p{font-size:1.6rem;font-weight:700;margin:0.25rem 0 0}\
table{width:100%;border-collapse:collapse;background:#fff;border:1px solid #e3e5e8;border-radius:0.5rem}\
th,td{padding:0.6rem 0.75rem;text-align:left;border-top:1px solid #eceef1}\
thead th{border-top:none;font-size:0.8rem;text-transform:uppercase;color:#5f6672}\
.badge{display:inline-block;padding:0.15rem 0.6rem;border-radius:1rem;font-size:0.8rem;font-weight:600}\
.tier-high{background:#d9f2e3;color:#1a7a43}\
.tier-medium{background:#fdf0d3;color:#8a6410}\
.tier-low{background:#fbdcdc;color:#a12626}\
.empty{text-align:center;color:#5f6672;padding:2rem 0}\
footer{color:#5f6672;font-size:0.85rem;margin-top:1.5rem}";

/// Renders the full leaderboard page as a standalone HTML document.
pub fn render_board_page(
    view: &BoardView,
    snapshot: &CandidateSnapshot,
    revalidate_secs: u64,
) -> String {
    let mut html = String::new();
    let refresh_href = page_href(view.active_role.as_deref());

    writeln!(html, "<!DOCTYPE html>").expect("write doctype");
    writeln!(html, "<html lang=\"en\"><head><meta charset=\"utf-8\">").expect("write head");
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )
    .expect("write viewport");
    writeln!(html, "<title>{}</title>", PAGE_TITLE).expect("write title");
    writeln!(html, "<style>{}</style></head><body><main>", PAGE_STYLE).expect("write style");

    render_header(&mut html, view, &refresh_href);

    if let DataAvailability::Degraded(reason) = snapshot.availability {
        writeln!(
            html,
            "<section class=\"warning\"><p>Candidate data is temporarily unavailable ({}). \
             The board refreshes automatically within {} seconds. \
             <a href=\"{}\">Refresh now</a></p></section>",
            escape_html(reason.label()),
            revalidate_secs,
            refresh_href,
        )
        .expect("write warning");
    }

    render_metrics(&mut html, view);
    render_table(&mut html, view);

    writeln!(
        html,
        "<footer>Data fetched at {} UTC. Cached for up to {} seconds.</footer>",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        revalidate_secs,
    )
    .expect("write footer");
    writeln!(html, "</main></body></html>").expect("write closing tags");

    html
}

fn render_header(html: &mut String, view: &BoardView, refresh_href: &str) {
    writeln!(html, "<header><h1>{}</h1>", PAGE_TITLE).expect("write heading");
    writeln!(html, "<form method=\"get\" action=\"/\">").expect("write form");
    writeln!(html, "<select name=\"cargo\">").expect("write select");
    writeln!(html, "<option value=\"\">All roles</option>").expect("write default option");
    for role in &view.role_options {
        let selected = if view.active_role.as_deref() == Some(role.as_str()) {
            " selected"
        } else {
            ""
        };
        writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(role),
            selected,
            escape_html(role)
        )
        .expect("write role option");
    }
    writeln!(html, "</select>").expect("close select");
    writeln!(html, "<button type=\"submit\">Filter</button>").expect("write filter button");
    writeln!(html, "<a href=\"{}\">Refresh</a>", refresh_href).expect("write refresh link");
    writeln!(html, "</form></header>").expect("close header");
}

fn render_metrics(html: &mut String, view: &BoardView) {
    writeln!(html, "<section class=\"metrics\">").expect("open metrics");
    writeln!(
        html,
        "<div class=\"metric\"><h2>Total Candidates</h2><p>{}</p></div>",
        view.metrics.total
    )
    .expect("write total metric");
    writeln!(
        html,
        "<div class=\"metric\"><h2>Average Match</h2><p>{:.1}%</p></div>",
        view.metrics.average_score
    )
    .expect("write average metric");
    writeln!(
        html,
        "<div class=\"metric\"><h2>Top Talent</h2><p>{}</p></div>",
        escape_html(&view.metrics.top_name)
    )
    .expect("write top metric");
    writeln!(html, "</section>").expect("close metrics");
}

fn render_table(html: &mut String, view: &BoardView) {
    if view.rows.is_empty() {
        writeln!(html, "<p class=\"empty\">No candidates found</p>").expect("write empty message");
        return;
    }

    writeln!(html, "<table><thead><tr>").expect("open table");
    writeln!(
        html,
        "<th>#</th><th>Nome</th><th>Cargo</th><th>Local</th><th>Nota</th><th>Score</th><th>Link</th>"
    )
    .expect("write table header");
    writeln!(html, "</tr></thead><tbody>").expect("open body");

    for row in &view.rows {
        let candidate = &row.candidate;
        writeln!(html, "<tr><td>{}</td>", row.rank).expect("write rank");
        writeln!(html, "<td>{}</td>", escape_html(&candidate.name)).expect("write name");
        writeln!(html, "<td>{}</td>", escape_html(&candidate.role)).expect("write role");
        writeln!(html, "<td>{}</td>", escape_html(&candidate.location)).expect("write location");
        writeln!(html, "<td>{:.1}</td>", candidate.score).expect("write score");
        writeln!(
            html,
            "<td><span class=\"badge {}\">{}</span></td>",
            row.tier.css_class(),
            row.tier.label()
        )
        .expect("write tier badge");
        if candidate.profile_link.is_empty() {
            writeln!(html, "<td>N/A</td></tr>").expect("write missing link");
        } else {
            writeln!(
                html,
                "<td><a href=\"{}\" rel=\"noopener noreferrer\">Profile</a></td></tr>",
                escape_html(&candidate.profile_link)
            )
            .expect("write profile link");
        }
    }

    writeln!(html, "</tbody></table>").expect("close table");
}

/// Builds the page URL carrying the current role filter, so refreshing keeps
/// the selection.
fn page_href(active_role: Option<&str>) -> String {
    match active_role {
        Some(role) => format!("/?cargo={}", encode_query_component(role)),
        None => "/".to_string(),
    }
}

fn encode_query_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push_str("%20"),
            other => {
                write!(encoded, "%{:02X}", other).expect("write escape");
            }
        }
    }
    encoded
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::domain::{Candidate, DataAvailability, DegradedReason};
    use chrono::Utc;

    fn candidate(name: &str, role: &str, score: f64, link: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            role: role.to_string(),
            location: "Recife".to_string(),
            profile_link: link.to_string(),
            score,
        }
    }

    fn snapshot(candidates: Vec<Candidate>, availability: DataAvailability) -> CandidateSnapshot {
        CandidateSnapshot {
            candidates,
            availability,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn page_lists_candidates_with_tiers_and_links() {
        let candidates = vec![
            candidate("Ana & Co", "Engenheira", 87.0, "https://l.in/ana"),
            candidate("Bruno", "Designer", 42.0, ""),
        ];
        let snap = snapshot(candidates, DataAvailability::Available);
        let view = BoardView::build(&snap.candidates, None);

        let html = render_board_page(&view, &snap, 60);

        assert!(html.contains("Ana &amp; Co"));
        assert!(html.contains("tier-high"));
        assert!(html.contains("tier-low"));
        assert!(html.contains("https://l.in/ana"));
        assert!(html.contains("<td>N/A</td>"));
        assert!(!html.contains("class=\"warning\""));
    }

    #[test]
    fn degraded_snapshot_renders_warning_with_refresh_link() {
        let snap = snapshot(
            Vec::new(),
            DataAvailability::Degraded(DegradedReason::Throttled),
        );
        let view = BoardView::build(&snap.candidates, None);

        let html = render_board_page(&view, &snap, 45);

        assert!(html.contains("class=\"warning\""));
        assert!(html.contains("rate limited"));
        assert!(html.contains("within 45 seconds"));
        assert!(html.contains("No candidates found"));
    }

    #[test]
    fn active_role_is_preselected_and_kept_in_the_refresh_link() {
        let candidates = vec![candidate("Ana", "Engenheira de Dados", 87.0, "")];
        let snap = snapshot(candidates, DataAvailability::Available);
        let view = BoardView::build(&snap.candidates, Some("Engenheira de Dados"));

        let html = render_board_page(&view, &snap, 60);

        assert!(html.contains("selected"));
        assert!(html.contains("/?cargo=Engenheira%20de%20Dados"));
    }

    #[test]
    fn query_components_are_percent_encoded() {
        assert_eq!(encode_query_component("Engenheira"), "Engenheira");
        assert_eq!(encode_query_component("QA Pleno"), "QA%20Pleno");
        assert_eq!(encode_query_component("C&T"), "C%26T");
    }
}
