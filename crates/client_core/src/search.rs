//! Query filter over the cached paper list.

use shared::domain::Paper;

use crate::console::{LineTone, OutputLine};

/// Typing this (any case, surrounding whitespace ignored) opens the admin
/// upload flow instead of searching. It is a convenience shortcut, not an
/// access check.
pub const ADMIN_KEYWORD: &str = "upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAction<'a> {
    Ignore,
    AdminShortcut,
    Search(&'a str),
}

pub fn classify_query(query: &str) -> QueryAction<'_> {
    if query.is_empty() {
        QueryAction::Ignore
    } else if query.trim().to_lowercase() == ADMIN_KEYWORD {
        QueryAction::AdminShortcut
    } else {
        QueryAction::Search(query)
    }
}

/// Lower-cased text a query is matched against.
pub fn search_text(paper: &Paper) -> String {
    format!(
        "{} {} {} {} {}",
        paper.class_name, paper.subject, paper.year, paper.original_name, paper.exam_type
    )
    .to_lowercase()
}

/// Papers whose search text contains `query`, case-insensitively, in their
/// original order.
pub fn filter_papers<'a>(papers: &'a [Paper], query: &str) -> Vec<&'a Paper> {
    let needle = query.to_lowercase();
    papers
        .iter()
        .filter(|paper| search_text(paper).contains(&needle))
        .collect()
}

/// Count line plus one line per match, or the single no-results line.
/// `resolve` turns a paper's server-relative URL into a link target.
pub fn result_lines(matches: &[&Paper], resolve: impl Fn(&str) -> String) -> Vec<OutputLine> {
    if matches.is_empty() {
        return vec![OutputLine::plain("No results found for your query.")];
    }

    let mut lines = Vec::with_capacity(matches.len() + 1);
    lines.push(
        OutputLine::plain("Found ")
            .highlight(matches.len().to_string())
            .text(" result(s):"),
    );
    lines.extend(matches.iter().map(|paper| {
        OutputLine::new(LineTone::Result)
            .text(format!("  [{}] ", paper.year))
            .link(paper.title(), resolve(&paper.url))
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(year: &str, subject: &str) -> Paper {
        Paper {
            year: year.into(),
            subject: subject.into(),
            ..Paper::default()
        }
    }

    fn sample() -> Vec<Paper> {
        vec![paper("2020", "Math"), paper("2021", "Physics")]
    }

    #[test]
    fn empty_query_is_ignored() {
        assert_eq!(classify_query(""), QueryAction::Ignore);
    }

    #[test]
    fn admin_keyword_matches_any_case_and_padding() {
        for query in ["upload", "UPLOAD", "  Upload  ", "\tupload\n"] {
            assert_eq!(classify_query(query), QueryAction::AdminShortcut, "{query:?}");
        }
        assert_eq!(classify_query("uploads"), QueryAction::Search("uploads"));
    }

    #[test]
    fn whitespace_query_is_searched_verbatim() {
        assert_eq!(classify_query("  "), QueryAction::Search("  "));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let papers = sample();
        let math = filter_papers(&papers, "math");
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].year, "2020");

        assert_eq!(filter_papers(&papers, "MATH").len(), 1);
        assert!(filter_papers(&papers, "chemistry").is_empty());
    }

    #[test]
    fn filter_preserves_original_order() {
        let papers = sample();
        let years: Vec<_> = filter_papers(&papers, "20")
            .iter()
            .map(|p| p.year.as_str())
            .collect();
        assert_eq!(years, ["2020", "2021"]);
    }

    #[test]
    fn filter_ignores_fields_outside_search_text() {
        let papers = vec![Paper {
            medium: "Bengali".into(),
            uploader: "alice".into(),
            ..Paper::default()
        }];
        assert!(filter_papers(&papers, "bengali").is_empty());
        assert!(filter_papers(&papers, "alice").is_empty());
    }

    #[test]
    fn result_lines_count_and_link_each_match() {
        let papers = vec![Paper {
            class_name: "BSc".into(),
            subject: "Math".into(),
            semester: "2".into(),
            year: "2020".into(),
            url: "/uploads/a.pdf".into(),
            ..Paper::default()
        }];
        let matches = filter_papers(&papers, "math");
        let lines = result_lines(&matches, |url| format!("http://archive{url}"));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].plain_text(), "Found 1 result(s):");
        assert_eq!(lines[1].tone, LineTone::Result);
        assert_eq!(lines[1].plain_text(), "  [2020] BSc Math (Sem 2) - 2020");
        assert_eq!(
            lines[1].segments[1].style,
            crate::console::SegmentStyle::Link {
                url: "http://archive/uploads/a.pdf".into()
            }
        );
    }

    #[test]
    fn no_matches_yield_single_line() {
        let lines = result_lines(&[], |url| url.to_string());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].plain_text(), "No results found for your query.");
    }
}
