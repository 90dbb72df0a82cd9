//! Text helpers for card previews and encyclopedia extracts.

/// Number of characters shown in a card's description preview.
pub const PREVIEW_CHARS: usize = 150;

/// Marker appended to a preview that was cut short.
pub const ELLIPSIS: &str = "...";

/// Shorten a description for the card preview.
///
/// Text of at most `max_chars` characters is returned unchanged. Longer text
/// is cut to its first `max_chars` characters, trimmed, and suffixed with
/// [`ELLIPSIS`]. Counting is by `char`, so multi-byte text never splits.
///
/// # Examples
///
/// ```
/// use species_catalog::utils::truncate_preview;
///
/// assert_eq!(truncate_preview("Big cat", 150), "Big cat");
/// assert_eq!(truncate_preview("Panthera leo", 8), "Panthera...");
/// ```
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", text[..cut].trim(), ELLIPSIS),
    }
}

/// The first line of an extract, i.e. its introductory paragraph.
///
/// ```
/// use species_catalog::utils::first_paragraph;
///
/// assert_eq!(first_paragraph("First sentence.\nSecond sentence."), "First sentence.");
/// ```
pub fn first_paragraph(extract: &str) -> &str {
    extract.split('\n').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_verbatim() {
        let text = "  The lion is a large cat.  ";
        assert_eq!(truncate_preview(text, PREVIEW_CHARS), text);
    }

    #[test]
    fn test_exactly_limit_is_verbatim() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(truncate_preview(&text, PREVIEW_CHARS), text);
    }

    #[test]
    fn test_long_text_is_cut_with_marker() {
        let text = "b".repeat(PREVIEW_CHARS + 40);
        let preview = truncate_preview(&text, PREVIEW_CHARS);

        assert!(preview.ends_with(ELLIPSIS));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn test_cut_is_trimmed() {
        let text = format!("{} tail", "c".repeat(9));
        // The tenth character is the space before "tail"
        assert_eq!(truncate_preview(&text, 10), "ccccccccc...");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "é".repeat(200);
        let preview = truncate_preview(&text, PREVIEW_CHARS);
        assert_eq!(preview.chars().filter(|c| *c == 'é').count(), PREVIEW_CHARS);
    }

    #[test]
    fn test_first_paragraph() {
        assert_eq!(
            first_paragraph("First sentence.\nSecond sentence."),
            "First sentence."
        );
        assert_eq!(first_paragraph("Only one"), "Only one");
        assert_eq!(first_paragraph(""), "");
        assert_eq!(first_paragraph("\nAfter a blank line"), "");
    }
}
