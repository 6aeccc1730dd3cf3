//! Case-insensitive regex search over a store snapshot.
//!
//! Matches are wrapped in markdown bold markers on copies of the records; the
//! snapshot passed in is never modified.

use regex::{Regex, RegexBuilder};
use sheets_types::{MemorySheet, NavSheet, SearchHit};

use super::error::{Result, SheetError};

pub const HIGHLIGHT_MARKER: &str = "**";

/// A record with a title and a body that search can look into.
pub trait Searchable {
    fn search_title(&self) -> String;
    fn search_text(&self) -> &str;
}

impl Searchable for MemorySheet {
    fn search_title(&self) -> String {
        self.display_date()
    }

    fn search_text(&self) -> &str {
        &self.text
    }
}

impl Searchable for NavSheet {
    fn search_title(&self) -> String {
        self.title.clone()
    }

    fn search_text(&self) -> &str {
        &self.text
    }
}

/// Compile a user query the way search uses it.
pub fn compile_query(query: &str) -> Result<Regex> {
    RegexBuilder::new(query)
        .case_insensitive(true)
        .build()
        .map_err(|e| SheetError::InvalidPattern(format!("invalid search pattern: {}", e)))
}

/// Wrap every non-empty match in `haystack`. Returns `None` when nothing matched.
fn highlight(re: &Regex, haystack: &str) -> Option<String> {
    let mut out = String::with_capacity(haystack.len() + 16);
    let mut last = 0;
    let mut matched = false;

    for m in re.find_iter(haystack) {
        if m.is_empty() {
            continue;
        }
        out.push_str(&haystack[last..m.start()]);
        out.push_str(HIGHLIGHT_MARKER);
        out.push_str(m.as_str());
        out.push_str(HIGHLIGHT_MARKER);
        last = m.end();
        matched = true;
    }

    if !matched {
        return None;
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

/// Search `snapshot` for `query`, keeping snapshot order.
///
/// An empty query returns every record with its title and text untouched.
pub fn search<S: Searchable>(snapshot: Vec<S>, query: &str) -> Result<Vec<SearchHit<S>>> {
    if query.is_empty() {
        return Ok(snapshot
            .into_iter()
            .map(|sheet| SearchHit {
                title: sheet.search_title(),
                text: sheet.search_text().to_string(),
                sheet,
            })
            .collect());
    }

    let re = compile_query(query)?;

    let hits = snapshot
        .into_iter()
        .filter_map(|sheet| {
            let title = sheet.search_title();
            let hl_title = highlight(&re, &title);
            let hl_text = highlight(&re, sheet.search_text());
            if hl_title.is_none() && hl_text.is_none() {
                return None;
            }
            Some(SearchHit {
                title: hl_title.unwrap_or(title),
                text: hl_text.unwrap_or_else(|| sheet.search_text().to_string()),
                sheet,
            })
        })
        .collect();

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn nav(title: &str, text: &str) -> NavSheet {
        NavSheet::new(title, text)
    }

    #[test]
    fn test_empty_query_returns_everything_unmodified() {
        let sheets = vec![nav("a", "alpha"), nav("b", "beta"), nav("c", "gamma")];
        let hits = search(sheets.clone(), "").unwrap();
        assert_eq!(hits.len(), 3);
        for (hit, sheet) in hits.iter().zip(&sheets) {
            assert_eq!(&hit.sheet, sheet);
            assert_eq!(hit.title, sheet.title);
            assert_eq!(hit.text, sheet.text);
            assert!(!hit.text.contains(HIGHLIGHT_MARKER));
        }
    }

    #[test]
    fn test_case_insensitive_highlighting() {
        let sheets = vec![
            nav("upper", "say ABC now"),
            nav("lower", "say abc now"),
            nav("mixed", "AbC and aBc"),
            nav("none", "nothing here"),
        ];
        let hits = search(sheets, "abc").unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["say **ABC** now", "say **abc** now", "**AbC** and **aBc**"]
        );
        // Source records carried along untouched
        assert_eq!(hits[0].sheet.text, "say ABC now");
    }

    #[test]
    fn test_title_only_match() {
        let hits = search(vec![nav("Rust/ownership", "borrowing rules")], "rust").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "**Rust**/ownership");
        assert_eq!(hits[0].text, "borrowing rules");
        assert_eq!(hits[0].sheet.title, "Rust/ownership");
    }

    #[test]
    fn test_regex_query() {
        let hits = search(vec![nav("t", "call 555-1234 or 555-9876")], r"\d{3}-\d{4}").unwrap();
        assert_eq!(hits[0].text, "call **555-1234** or **555-9876**");
    }

    #[test]
    fn test_long_unicode_repetition_compiles() {
        let word = "a".repeat(50);
        let sheets = vec![nav("t", &format!("x {} y", word)), nav("short", "tiny")];
        for query in [r"\w{30}", r"\w{50}"] {
            let hits = search(sheets.clone(), query).unwrap();
            assert_eq!(hits.len(), 1, "query {}", query);
            assert!(hits[0].text.starts_with("x **a"));
        }
    }

    #[test]
    fn test_invalid_regex() {
        let err = search(vec![nav("t", "x")], "(unclosed").unwrap_err();
        assert!(matches!(err, SheetError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_matches_are_not_hits() {
        let hits = search(vec![nav("t", "bbb")], "a*").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_memory_sheet_title_is_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let hits = search(vec![MemorySheet::new(date, "text")], "2025-01").unwrap();
        assert_eq!(hits[0].title, "**2025-01**-02");
        assert_eq!(hits[0].sheet.date, date);
    }
}
