//! Recursive separator-based text splitting.
//!
//! Splitting tries the coarsest separator first (paragraph break), re-splitting
//! any oversized segment with the next finer separator, down to a hard
//! character split. Segments are then merged into windows of at most
//! `target_size` characters, with `overlap` characters of trailing context
//! carried into the start of the next window. The whole process is a pure
//! function of its inputs.
//!
//! Lengths are measured in characters, not bytes, and all slicing happens on
//! char boundaries.

use std::collections::VecDeque;

/// Ordered separator list, coarse to fine. The empty separator means a hard
/// character split.
pub const SEPARATORS: [&str; 7] = ["\n\n", "\n", ". ", "! ", "? ", " ", ""];

/// Default chunk size in characters.
pub const DEFAULT_TARGET_SIZE: usize = 800;

/// Selects the chunk size for a document of `total_chars` length.
///
/// Large documents get smaller chunks to keep index size and embedding cost
/// bounded: 600 above 2M characters, 400 above 5M.
pub fn target_size_for(total_chars: usize) -> usize {
    if total_chars > 5_000_000 {
        400
    } else if total_chars > 2_000_000 {
        600
    } else {
        DEFAULT_TARGET_SIZE
    }
}

/// Overlap companion to [`target_size_for`]: a quarter of the chunk size.
pub fn overlap_for(target_size: usize) -> usize {
    target_size / 4
}

/// Splits `text` into an ordered sequence of chunks.
///
/// Guarantees:
/// - Every chunk is a contiguous substring of `text`; concatenating chunks
///   while dropping overlap regions covers the whole input.
/// - Chunk length ≤ `target_size` characters (a lone indivisible unit can
///   only arise when `target_size` is 0, which yields no chunks).
/// - Identical input and parameters always yield an identical sequence.
/// - Empty or whitespace-only input yields an empty sequence, not an error.
pub fn split_text(text: &str, target_size: usize, overlap: usize) -> Vec<String> {
    if target_size == 0 || text.trim().is_empty() {
        return Vec::new();
    }
    let pieces = split_recursive(text, target_size, &SEPARATORS);
    merge_pieces(&pieces, target_size, overlap)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Recursively splits `text` until every piece fits `target` characters.
/// Separators stay attached to the preceding piece, so pieces concatenate
/// back to the original text.
fn split_recursive<'a>(text: &'a str, target: usize, seps: &[&str]) -> Vec<&'a str> {
    if char_len(text) <= target {
        return vec![text];
    }
    let Some((sep, rest)) = seps.split_first() else {
        return vec![text];
    };
    if sep.is_empty() {
        return hard_split(text, target);
    }

    let parts = split_keep_sep(text, sep);
    if parts.len() == 1 {
        return split_recursive(text, target, rest);
    }

    let mut out = Vec::new();
    for p in parts {
        if char_len(p) <= target {
            out.push(p);
        } else {
            out.extend(split_recursive(p, target, rest));
        }
    }
    out
}

/// Splits on `sep`, keeping the separator at the end of each piece.
fn split_keep_sep<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(sep) {
        let end = search_from + pos + sep.len();
        out.push(&text[start..end]);
        start = end;
        search_from = end;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    if out.is_empty() {
        out.push(text);
    }
    out
}

/// Hard split into pieces of at most `target` characters, on char boundaries.
fn hard_split(text: &str, target: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (i, _) in text.char_indices() {
        if count == target {
            out.push(&text[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Merges pieces into windows of ≤ `target` characters. When a window closes,
/// trailing pieces totalling at most `overlap` characters are kept as the
/// start of the next window. Windows that are entirely whitespace are dropped.
fn merge_pieces(pieces: &[&str], target: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in pieces {
        let len = char_len(piece);
        if total + len > target && !window.is_empty() {
            let chunk: String = window.iter().copied().collect();
            if !chunk.trim().is_empty() {
                chunks.push(chunk);
            }
            // Shrink the window to the overlap budget, and further if the
            // incoming piece would not fit next to it.
            while total > overlap || (total + len > target && total > 0) {
                let Some(front) = window.pop_front() else {
                    break;
                };
                total -= char_len(front);
            }
        }
        window.push_back(piece);
        total += len;
    }

    let chunk: String = window.iter().copied().collect();
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text(sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("Sentence number {i} talks about data frames. "))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_text("", 800, 200).is_empty());
        assert!(split_text("   \n\n  ", 800, 200).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("hello world", 800, 200);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn chunks_respect_target_size() {
        let text = sample_text(200);
        let chunks = split_text(&text, 100, 25);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= 100, "chunk too long: {}", c.len());
        }
    }

    #[test]
    fn chunks_cover_the_input_without_gaps() {
        let text = sample_text(120);
        let chunks = split_text(&text, 100, 25);

        let mut prev_start = 0usize;
        let mut prev_end = 0usize;
        for c in &chunks {
            let start = text[prev_start..]
                .find(c.as_str())
                .map(|p| p + prev_start)
                .expect("every chunk is a contiguous substring of the input");
            assert!(start <= prev_end, "gap between consecutive chunks");
            prev_start = start;
            prev_end = start + c.len();
        }
        assert_eq!(prev_end, text.len(), "tail of the input not covered");
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let text = "first paragraph here.\n\nsecond paragraph here.\n\nthird paragraph here.";
        let chunks = split_text(text, 30, 0);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("first paragraph"));
        assert!(chunks[1].starts_with("second paragraph"));
        assert!(chunks[2].starts_with("third paragraph"));
    }

    #[test]
    fn overlap_repeats_trailing_context() {
        let text = sample_text(40);
        let with_overlap = split_text(&text, 120, 60);
        let without_overlap = split_text(&text, 120, 0);
        let sum_with: usize = with_overlap.iter().map(|c| c.chars().count()).sum();
        let sum_without: usize = without_overlap.iter().map(|c| c.chars().count()).sum();
        assert!(sum_with > sum_without, "overlap should duplicate characters");
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = sample_text(300);
        assert_eq!(split_text(&text, 100, 25), split_text(&text, 100, 25));
    }

    #[test]
    fn hard_split_handles_separatorless_runs() {
        let text = "x".repeat(1000);
        let chunks = split_text(&text, 100, 0);
        assert_eq!(chunks.len(), 10);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    }

    #[test]
    fn hard_split_respects_char_boundaries() {
        let text = "é".repeat(250);
        let chunks = split_text(&text, 100, 0);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn size_policy_thresholds() {
        assert_eq!(target_size_for(1_000), 800);
        assert_eq!(target_size_for(2_000_001), 600);
        assert_eq!(target_size_for(5_000_001), 400);
        assert_eq!(overlap_for(800), 200);
        assert_eq!(overlap_for(400), 100);
    }

    #[test]
    fn chunk_count_tracks_window_stride() {
        // N ≈ ceil(len / (L - O)) for homogeneous text.
        let text = sample_text(200);
        let len = text.chars().count();
        let (target, overlap) = (100, 25);
        let chunks = split_text(&text, target, overlap);
        let expected = len.div_ceil(target - overlap);
        let delta = chunks.len().abs_diff(expected);
        assert!(
            delta <= expected / 2 + 1,
            "got {} chunks, expected about {}",
            chunks.len(),
            expected
        );
    }
}
