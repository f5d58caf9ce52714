//! Character-window text splitting.
//!
//! The splitter is a pure function: identical input and parameters always yield the identical
//! chunk sequence. Slices hold at most `chunk_size` characters, and every slice after the
//! first starts `overlap` characters before the end of the previous one. Cut points prefer,
//! in order, a paragraph break, a line break, a sentence end, and a word boundary inside the
//! window, falling back to a hard character cut when none is available. Indices are always
//! character positions, so multi-byte text never splits inside a scalar value.

use super::types::ChunkingError;

/// Default target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap carried between adjacent chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Split `text` into overlapping slices of at most `chunk_size` characters.
///
/// `overlap` is clamped to `chunk_size - 1`. Whitespace-only input yields an empty vector,
/// which the pipeline treats as "nothing to embed" rather than an error.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let overlap = overlap.min(chunk_size - 1);

    let mut offsets = Vec::new();
    let mut chars = Vec::new();
    for (byte, ch) in text.char_indices() {
        offsets.push(byte);
        chars.push(ch);
    }
    let total = chars.len();
    let byte_at = |index: usize| {
        if index < total {
            offsets[index]
        } else {
            text.len()
        }
    };

    let mut slices = Vec::new();
    let mut start = 0;
    loop {
        let window_end = (start + chunk_size).min(total);
        let cut = if window_end < total {
            // The cut must land past the overlap region or the next window makes no progress.
            find_break(&chars, start + overlap + 1, window_end).unwrap_or(window_end)
        } else {
            window_end
        };
        slices.push(text[byte_at(start)..byte_at(cut)].to_string());
        if cut >= total {
            break;
        }
        start = cut - overlap;
    }

    Ok(slices)
}

/// Find the best cut position in `floor..=ceil`, scanning each boundary class from the right.
fn find_break(chars: &[char], floor: usize, ceil: usize) -> Option<usize> {
    if floor > ceil {
        return None;
    }
    let classes: [fn(&[char], usize) -> bool; 4] = [
        is_paragraph_break,
        is_line_break,
        is_sentence_break,
        is_word_break,
    ];
    for boundary in classes {
        for cut in (floor..=ceil).rev() {
            if boundary(chars, cut) {
                return Some(cut);
            }
        }
    }
    None
}

fn is_paragraph_break(chars: &[char], cut: usize) -> bool {
    cut >= 2 && chars[cut - 1] == '\n' && chars[cut - 2] == '\n'
}

fn is_line_break(chars: &[char], cut: usize) -> bool {
    cut >= 1 && chars[cut - 1] == '\n'
}

fn is_sentence_break(chars: &[char], cut: usize) -> bool {
    cut >= 2
        && chars[cut - 1].is_whitespace()
        && matches!(chars[cut - 2], '.' | '!' | '?')
}

fn is_word_break(chars: &[char], cut: usize) -> bool {
    cut >= 1 && chars[cut - 1].is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the original text from chunks by dropping each later chunk's overlap prefix.
    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut text = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            if index == 0 {
                text.push_str(chunk);
            } else {
                text.extend(chunk.chars().skip(overlap));
            }
        }
        text
    }

    #[test]
    fn empty_and_whitespace_input_yield_no_chunks() {
        assert!(split_text("", 10, 2).unwrap().is_empty());
        assert!(split_text("   \n\t  ", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = split_text("hello", 0, 0).unwrap_err();
        assert!(matches!(err, ChunkingError::InvalidChunkSize));
    }

    #[test]
    fn short_input_yields_single_chunk() {
        let chunks = split_text("short text", 1000, 200).unwrap();
        assert_eq!(chunks, vec!["short text"]);
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let first = split_text(&text, 100, 20).unwrap();
        let second = split_text(&text, 100, 20).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hard_cut_applies_exact_overlap() {
        // No whitespace anywhere, so every cut is a hard character cut.
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = split_text(text, 10, 3).unwrap();
        assert_eq!(chunks, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxyz"]);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
        assert_eq!(reconstruct(&chunks, 3), text);
    }

    #[test]
    fn prefers_paragraph_boundary_over_hard_cut() {
        let first = "a".repeat(50);
        let second = "b".repeat(50);
        let text = format!("{first}\n\n{second}");
        let chunks = split_text(&text, 60, 10).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with("\n\n"));
        assert_eq!(chunks[0].chars().count(), 52);
        assert_eq!(reconstruct(&chunks, 10), text);
    }

    #[test]
    fn prefers_sentence_boundary_over_word_boundary() {
        let text = "One sentence here. Another trailing tail of words without punctuation";
        let chunks = split_text(text, 40, 5).unwrap();
        assert!(chunks[0].ends_with(". "), "got {:?}", chunks[0]);
        assert_eq!(reconstruct(&chunks, 5), text);
    }

    #[test]
    fn falls_back_to_word_boundary() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = split_text(text, 20, 4).unwrap();
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with(' '), "got {chunk:?}");
            assert!(chunk.chars().count() <= 20);
        }
        assert_eq!(reconstruct(&chunks, 4), text);
    }

    #[test]
    fn coverage_holds_for_multibyte_text() {
        let text = "héllo wörld ".repeat(12);
        let chunks = split_text(&text, 25, 6).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 25);
        }
        assert_eq!(reconstruct(&chunks, 6), text);
    }

    #[test]
    fn overlap_larger_than_chunk_size_is_clamped() {
        let text = "abcdefghij";
        let chunks = split_text(text, 4, 10).unwrap();
        // Effective overlap is 3, so each step advances one character.
        assert_eq!(chunks[0], "abcd");
        assert_eq!(chunks[1], "bcde");
        assert_eq!(reconstruct(&chunks, 3), text);
    }

    #[test]
    fn chunk_indices_follow_emission_order() {
        let text = "word ".repeat(100);
        let chunks = split_text(&text, 30, 5).unwrap();
        let again = split_text(&text, 30, 5).unwrap();
        assert_eq!(chunks, again);
        assert!(chunks.len() >= 3);
    }
}
