//! Line classification — the first stage of the rewrite pipeline.

use super::matcher;
use super::RewriteRule;

/// What a raw line is, for rewriting purposes. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The import/declaration line the helper block replaces.
    ImportDeclaration,
    /// A line belonging to a generated or hand-written lazy-load helper.
    /// Such lines legitimately contain the bare symbol and are never touched.
    HelperLine,
    /// Single-line or block comment.
    Comment,
    /// Anything else.
    Code,
}

/// Classify one raw line. Total: every line gets exactly one kind, with
/// `Code` as the fallback — there is no failure path.
///
/// Helper lines are checked before the anchor so the engine never mangles
/// its own output, even for rules whose anchor substring also appears in
/// the generated dynamic-import line.
pub fn classify_line(line: &str, rule: &RewriteRule) -> LineKind {
    if rule.is_helper_line(line) {
        return LineKind::HelperLine;
    }

    if line.contains(&rule.anchor)
        && line.contains("import")
        && matcher::contains_word(line, &rule.symbol)
    {
        return LineKind::ImportDeclaration;
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
        return LineKind::Comment;
    }

    LineKind::Code
}
