//! Text normalisation: turn per-page text into the document text.
//!
//! Only pages that succeeded *and* contain non-whitespace text contribute.
//! A blank page still counts towards the page count (see
//! [`crate::pipeline::aggregate`]) but adds nothing here.

use crate::output::ExtractedPage;

/// Concatenate contributing pages and collapse all whitespace.
///
/// Pages are joined with a line break before collapsing, so the boundary
/// between two pages always becomes exactly one space.
pub fn normalize(pages: &[ExtractedPage]) -> String {
    let mut full_text = String::new();
    for page in pages.iter().filter(|p| p.has_text()) {
        full_text.push_str(&page.text);
        full_text.push('\n');
    }
    collapse_whitespace(&full_text)
}

/// Whitespace as text extraction sees it: Unicode `White_Space` plus the
/// ASCII information separators U+001C..=U+001F.
pub fn is_text_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Split on any whitespace run and rejoin with single ASCII spaces.
///
/// The output has no leading/trailing whitespace and no two consecutive
/// whitespace characters, so the function is idempotent.
pub fn collapse_whitespace(input: &str) -> String {
    input
        .split(is_text_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable variant keeping page boundaries:
///
/// ```text
/// --- Page 1 ---
/// <raw page text>
///
/// --- Page 3 ---
/// <raw page text>
/// ```
pub fn sectioned(pages: &[ExtractedPage]) -> String {
    pages
        .iter()
        .filter(|p| p.has_text())
        .map(|p| {
            let text = p.text.trim_end_matches(is_text_whitespace);
            format!("--- Page {} ---\n{}", p.page_num(), text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(
            collapse_whitespace("  Hello,\t\tworld!\r\n\n  Second   line \u{00A0} end  "),
            "Hello, world! Second line end"
        );
    }

    #[test]
    fn collapse_is_idempotent() {
        let samples = [
            "",
            "   ",
            "a",
            " a  b\n\nc\t",
            "line one\nline two\u{2003}wide space",
            "already normalised text",
        ];
        for s in samples {
            let once = collapse_whitespace(s);
            assert_eq!(collapse_whitespace(&once), once, "input {s:?}");
            assert!(!once.contains("  "));
            assert_eq!(once.trim(), once);
        }
    }

    #[test]
    fn information_separators_count_as_whitespace() {
        assert_eq!(collapse_whitespace("a\u{1f}b\u{1c}c"), "a b c");
        assert_eq!(collapse_whitespace("\u{1d} x \u{1e}\u{1e} y\u{1f}"), "x y");
        assert!(is_text_whitespace('\u{1c}'));
        assert!(!is_text_whitespace('\u{1b}'));
    }

    #[test]
    fn separator_only_page_contributes_nothing() {
        let pages = vec![
            ExtractedPage::extracted(0, "alpha"),
            ExtractedPage::extracted(1, "\u{1c}\u{1f} \n"),
            ExtractedPage::extracted(2, "omega"),
        ];
        assert!(!pages[1].has_text());
        assert_eq!(normalize(&pages), "alpha omega");
        assert_eq!(
            sectioned(&pages),
            "--- Page 1 ---\nalpha\n\n--- Page 3 ---\nomega"
        );
    }

    #[test]
    fn page_boundary_becomes_single_space() {
        let pages = vec![
            ExtractedPage::extracted(0, "end of one"),
            ExtractedPage::extracted(1, "start of two"),
        ];
        assert_eq!(normalize(&pages), "end of one start of two");
    }

    #[test]
    fn failed_and_blank_pages_contribute_nothing() {
        let pages = vec![
            ExtractedPage::extracted(0, "alpha"),
            ExtractedPage::failed(1),
            ExtractedPage::extracted(2, " \n\t "),
            ExtractedPage::extracted(3, "omega"),
        ];
        assert_eq!(normalize(&pages), "alpha omega");
    }

    #[test]
    fn empty_document_normalises_to_empty_string() {
        assert_eq!(normalize(&[]), "");
        assert_eq!(normalize(&[ExtractedPage::failed(0)]), "");
    }

    #[test]
    fn sectioned_keeps_page_numbers() {
        let pages = vec![
            ExtractedPage::extracted(0, "first\n"),
            ExtractedPage::failed(1),
            ExtractedPage::extracted(2, "third"),
        ];
        assert_eq!(
            sectioned(&pages),
            "--- Page 1 ---\nfirst\n\n--- Page 3 ---\nthird"
        );
    }
}
