//! Bounded snippet extraction around a pattern match.

use crate::source::SourceText;

/// Characters taken on each side of a match before trimming to line bounds.
const WINDOW: usize = 100;

/// Number of collapsed-snippet characters that participate in the dedup key.
pub const DEDUP_PREFIX_LEN: usize = 100;

/// Extract a bounded, line-trimmed window of source around the first match
/// of `pattern`. Returns an empty string when the pattern is absent;
/// callers must treat that as "snippet unavailable", not as an error.
pub fn extract(source: &SourceText, pattern: &str) -> String {
    let Some(pos) = source.find(pattern) else {
        return String::new();
    };
    extract_at(source.as_str(), pos, pattern.len())
}

/// Extract a window around a known match position (byte offset + length).
pub fn extract_at(source: &str, pos: usize, match_len: usize) -> String {
    let mut start = pos.saturating_sub(WINDOW);
    let mut end = (pos + match_len + WINDOW).min(source.len());
    // Window edges may land inside a multi-byte character (comments are not
    // always ASCII); widen to the nearest boundaries.
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    while !source.is_char_boundary(end) {
        end += 1;
    }
    let window = &source[start..end];

    // Trim the ragged partial lines at both edges of the window, unless the
    // window already begins/ends at the source boundary.
    let from = if start == 0 {
        0
    } else {
        window.find('\n').map_or(0, |i| i + 1)
    };
    let to = if end == source.len() {
        window.len()
    } else {
        window.rfind('\n').unwrap_or(window.len())
    };
    if from >= to {
        return window.trim().to_string();
    }
    window[from..to].trim().to_string()
}

/// Collapse all whitespace runs to single spaces and trim. Used to build the
/// aggregation dedup key, so formatting differences between two extractions
/// of the same code do not defeat deduplication.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Dedup key prefix for a snippet: the first `DEDUP_PREFIX_LEN` characters
/// of its collapsed, trimmed form.
pub fn dedup_prefix(snippet: &str) -> String {
    collapse_whitespace(snippet)
        .chars()
        .take(DEDUP_PREFIX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(text: &str) -> SourceText {
        SourceText::new(text.to_string())
    }

    #[test]
    fn test_no_match_yields_empty() {
        let source = src("contract Token {}");
        assert_eq!(extract(&source, "selfdestruct"), "");
    }

    #[test]
    fn test_window_trims_to_whole_lines() {
        let mut text = String::new();
        for i in 0..40 {
            text.push_str(&format!("uint256 filler{i};\n"));
        }
        text.push_str("selfdestruct(payable(owner));\n");
        for i in 0..40 {
            text.push_str(&format!("uint256 trailer{i};\n"));
        }
        let source = src(&text);
        let snippet = extract(&source, "selfdestruct");
        assert!(snippet.contains("selfdestruct(payable(owner));"));
        // Whole lines only: no partial identifier at either edge.
        for line in snippet.lines() {
            assert!(line.ends_with(';'), "partial line in snippet: {line:?}");
        }
    }

    #[test]
    fn test_match_near_start_keeps_first_line() {
        let source = src("selfdestruct(payable(owner));\nuint256 x;");
        let snippet = extract(&source, "selfdestruct");
        assert!(snippet.starts_with("selfdestruct"));
    }

    #[test]
    fn test_case_insensitive_lookup_extracts_original_case() {
        let source = src("function kill() public { SelfDestruct(payable(owner)); }");
        let snippet = extract(&source, "selfdestruct");
        assert!(snippet.contains("SelfDestruct"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  uint256\t x =\n  1;  "),
            "uint256 x = 1;"
        );
    }

    #[test]
    fn test_dedup_prefix_bounded() {
        let long = "a ".repeat(400);
        assert_eq!(dedup_prefix(&long).chars().count(), DEDUP_PREFIX_LEN);
    }
}
