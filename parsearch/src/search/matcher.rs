use crate::errors::{SearchError, SearchResult};

/// Finds every offset in `[from, to)` where `pattern` starts in `text`.
///
/// `text` is the logical content of the buffer. A candidate starting near `to`
/// is compared against bytes past `to`, but never past `text.len()`, so a
/// match that does not fit in the text is simply not found. Offsets come back
/// in ascending order.
///
/// Returns [`SearchError::TaskFailure`] if the window is reversed or extends
/// past the end of the text.
pub fn find_in_window(
    text: &[u8],
    pattern: &[u8],
    from: usize,
    to: usize,
) -> SearchResult<Vec<usize>> {
    if from > to || to > text.len() {
        return Err(SearchError::task_failure(format!(
            "search window {}..{} outside buffer of length {}",
            from,
            to,
            text.len()
        )));
    }

    let mut positions = Vec::new();
    if pattern.is_empty() || pattern.len() > text.len() {
        return Ok(positions);
    }

    // Last offset at which the whole pattern still fits
    let last = text.len() - pattern.len();
    let end = to.min(last + 1);

    let first = pattern[0];
    for pos in from..end {
        if text[pos] != first {
            continue;
        }
        if text[pos + 1..pos + pattern.len()] == pattern[1..] {
            positions.push(pos);
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_text() {
        let text = b"this is a test string with test pattern";
        let positions = find_in_window(text, b"test", 0, text.len()).unwrap();
        assert_eq!(positions, vec![10, 28]);
    }

    #[test]
    fn test_overlapping_occurrences() {
        let positions = find_in_window(b"aaaaa", b"aa", 0, 5).unwrap();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reads_past_window_end() {
        // "bca" starts at 4 and ends at 6, beyond the window end of 5
        let positions = find_in_window(b"abcabcabc", b"bca", 3, 5).unwrap();
        assert_eq!(positions, vec![4]);
    }

    #[test]
    fn test_never_reads_past_text() {
        // Offset 7 would need "bca" but only "bc" remains
        let positions = find_in_window(b"abcabcabc", b"bca", 6, 9).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_match_at_last_offset() {
        let text = b"xxxxend";
        let positions = find_in_window(text, b"end", 0, text.len()).unwrap();
        assert_eq!(positions, vec![4]);
    }

    #[test]
    fn test_empty_window() {
        assert!(find_in_window(b"abcabc", b"abc", 3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_pattern_longer_than_text() {
        assert!(find_in_window(b"abc", b"abcd", 0, 3).unwrap().is_empty());
    }

    #[test]
    fn test_single_byte_pattern() {
        let positions = find_in_window(b"a.b.c", b".", 0, 5).unwrap();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn test_window_out_of_bounds() {
        let err = find_in_window(b"abc", b"a", 0, 4).unwrap_err();
        assert!(matches!(err, SearchError::TaskFailure(_)));

        let err = find_in_window(b"abc", b"a", 2, 1).unwrap_err();
        assert!(matches!(err, SearchError::TaskFailure(_)));
    }
}
