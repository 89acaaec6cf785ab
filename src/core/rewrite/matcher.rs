//! Occurrence matching — whole-word scanning with an accessor-guard exclusion.
//!
//! A genuine occurrence is a maximal run of identifier characters exactly
//! equal to the target symbol, bounded on both sides by a non-identifier
//! character or the line edge. Spans that fall inside the generated
//! accessor's name are excluded: they are evidence the line was already
//! rewritten, or the accessor's own definition.

use super::RewriteRule;

/// A half-open byte span identifying one genuine occurrence within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// Identifier characters: ASCII letters, digits, underscore.
fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Find all whole-word occurrences of `word` in `text`, left-to-right.
///
/// Both neighbors of a hit must be non-identifier characters or the line
/// edge. This rejects `supabase` inside `getSupabase` (letter before) and
/// inside `supabase_url` (underscore after) without any special casing.
pub fn find_word_spans(text: &str, word: &str) -> Vec<Match> {
    let text_bytes = text.as_bytes();
    let word_len = word.len();
    let mut matches = Vec::new();

    if word_len == 0 || word_len > text.len() {
        return matches;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let abs = start + pos;
        let end = abs + word_len;

        let left_ok = abs == 0 || !is_ident_char(text_bytes[abs - 1]);
        let right_ok = end >= text_bytes.len() || !is_ident_char(text_bytes[end]);

        if left_ok && right_ok {
            matches.push(Match { start: abs, end });
        }

        start = abs + 1;
    }

    matches
}

/// Whether `text` contains `word` as a whole word.
pub fn contains_word(text: &str, word: &str) -> bool {
    !find_word_spans(text, word).is_empty()
}

/// All literal occurrences of `term`, no boundary detection.
fn find_literal_spans(text: &str, term: &str) -> Vec<Match> {
    let mut matches = Vec::new();
    let term_len = term.len();

    if term_len == 0 || term_len > text.len() {
        return matches;
    }

    let mut start = 0;
    while let Some(pos) = text[start..].find(term) {
        matches.push(Match {
            start: start + pos,
            end: start + pos + term_len,
        });
        start += pos + 1;
    }

    matches
}

/// Genuine occurrences of the rule's symbol in a `Code` line.
///
/// Whole-word spans overlapping any occurrence of the accessor name are
/// dropped. A line whose only symbol text sits inside accessor calls
/// yields no matches, so repeated runs never double-wrap an already
/// rewritten line — while an unrelated bare occurrence on the same line
/// is still matched.
pub fn find_occurrences(line: &str, rule: &RewriteRule) -> Vec<Match> {
    let mut spans = find_word_spans(line, &rule.symbol);

    if spans.is_empty() || !line.contains(&rule.accessor) {
        return spans;
    }

    let accessor_spans = find_literal_spans(line, &rule.accessor);
    spans.retain(|m| {
        !accessor_spans
            .iter()
            .any(|a| m.start < a.end && m.end > a.start)
    });

    spans
}
