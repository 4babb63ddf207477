//! `[SEARCH_IMAGE: <phrase>]` marker extraction.
//!
//! Only the first marker in a completion is recognised. The phrase runs from
//! the opening token to the next `]`; the whole span, brackets included, is
//! removed from the visible text. Any later markers stay where they are.

/// Opening token of the image marker.
pub const MARKER_OPEN: &str = "[SEARCH_IMAGE:";

const MARKER_CLOSE: char = ']';

/// A marker found in a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMarker {
    /// The trimmed search phrase. May be empty for `[SEARCH_IMAGE: ]`.
    pub query: String,
    /// The completion with the marker span removed, trimmed.
    pub visible_text: String,
}

impl ImageMarker {
    /// The phrase to search for, if the marker carried one.
    pub fn search_query(&self) -> Option<&str> {
        if self.query.is_empty() {
            None
        } else {
            Some(&self.query)
        }
    }
}

/// Find and strip the first image marker in `text`.
///
/// Returns `None` when there is no opening token, or when the opening token is
/// never closed (the text is then left untouched by the caller).
pub fn extract_image_marker(text: &str) -> Option<ImageMarker> {
    let start = text.find(MARKER_OPEN)?;
    let phrase_start = start + MARKER_OPEN.len();
    let close_offset = text[phrase_start..].find(MARKER_CLOSE)?;
    let phrase_end = phrase_start + close_offset;
    let span_end = phrase_end + MARKER_CLOSE.len_utf8();

    let query = text[phrase_start..phrase_end].trim().to_string();

    let mut visible = String::with_capacity(text.len() - (span_end - start));
    visible.push_str(&text[..start]);
    visible.push_str(&text[span_end..]);

    Some(ImageMarker {
        query,
        visible_text: visible.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_phrase_and_strips_marker() {
        let text = "[SEARCH_IMAGE: sql joins diagram]\n\n### 🧠 Concept Summary\nJoins combine rows.";
        let marker = extract_image_marker(text).unwrap();
        assert_eq!(marker.query, "sql joins diagram");
        assert!(!marker.visible_text.contains("[SEARCH_IMAGE: sql joins diagram]"));
        assert!(marker.visible_text.starts_with("### 🧠 Concept Summary"));
    }

    #[test]
    fn test_marker_without_space_after_colon() {
        let marker = extract_image_marker("intro [SEARCH_IMAGE:venn diagram] outro").unwrap();
        assert_eq!(marker.query, "venn diagram");
        assert_eq!(marker.visible_text, "intro  outro");
    }

    #[test]
    fn test_marker_mid_text() {
        let text = "### Summary\nA join...\n[SEARCH_IMAGE: inner join venn]\n### Quiz";
        let marker = extract_image_marker(text).unwrap();
        assert_eq!(marker.query, "inner join venn");
        assert_eq!(marker.visible_text, "### Summary\nA join...\n\n### Quiz");
    }

    #[test]
    fn test_no_marker() {
        assert!(extract_image_marker("### Concept Summary\nNo image here.").is_none());
    }

    #[test]
    fn test_unclosed_marker_is_ignored() {
        assert!(extract_image_marker("text [SEARCH_IMAGE: never closed").is_none());
    }

    #[test]
    fn test_only_first_marker_is_removed() {
        let text = "[SEARCH_IMAGE: first] body [SEARCH_IMAGE: second]";
        let marker = extract_image_marker(text).unwrap();
        assert_eq!(marker.query, "first");
        assert_eq!(marker.visible_text, "body [SEARCH_IMAGE: second]");
    }

    #[test]
    fn test_empty_phrase_has_no_search_query() {
        let marker = extract_image_marker("[SEARCH_IMAGE: ] body").unwrap();
        assert_eq!(marker.search_query(), None);
        assert_eq!(marker.visible_text, "body");
    }

    #[test]
    fn test_multibyte_text_around_marker() {
        let marker = extract_image_marker("🎯 Quiz [SEARCH_IMAGE: café menu] ✅").unwrap();
        assert_eq!(marker.query, "café menu");
        assert_eq!(marker.visible_text, "🎯 Quiz  ✅");
    }
}
