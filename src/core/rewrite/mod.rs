//! Rewrite engine — convert eager module imports into lazy accessor calls.
//!
//! Given a `RewriteRule` (symbol → accessor), this engine:
//! 1. Classifies each line (anchor, helper, comment, code)
//! 2. Finds whole-word occurrences of the symbol, excluding false positives
//! 3. Rewrites each occurrence into the accessor-call expression
//! 4. Replaces the import anchor line with the generated helper block
//!
//! The transformation is a pure function of the input text and is
//! idempotent: rerunning it on its own output changes nothing.

pub mod classify;
pub mod matcher;
pub mod substitute;

pub use classify::LineKind;
pub use matcher::Match;

use crate::error::{Error, Result};
use crate::utils::io;
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Types
// ============================================================================

/// Configuration for one rewrite: which identifier to convert and what
/// generated code stands in for its import.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// The identifier whose usages are rewritten.
    pub symbol: String,
    /// Substring identifying the import/declaration line to replace.
    pub anchor: String,
    /// Name of the generated lazy accessor function.
    pub accessor: String,
    /// Expression substituted for each genuine occurrence.
    pub replacement: String,
    /// Helper definition spliced in place of the anchor line.
    pub helper_block: String,
}

impl RewriteRule {
    /// Build the standard lazy-accessor rule for a symbol imported from
    /// `module_path`. The accessor name is `get` + the capitalized symbol.
    pub fn lazy_accessor(symbol: &str, module_path: &str) -> Self {
        let accessor = format!("get{}", capitalize(symbol));
        Self::with_accessor(symbol, module_path, &accessor)
    }

    /// Same as [`RewriteRule::lazy_accessor`] with an explicit accessor name.
    pub fn with_accessor(symbol: &str, module_path: &str, accessor: &str) -> Self {
        let helper_block = format!(
            "/**\n * Lazy load `{}` to avoid eager module loading\n */\nconst {} = async () => {{\n  const {{ {} }} = await import('{}');\n  return {};\n}};",
            symbol, accessor, symbol, module_path, symbol
        );

        RewriteRule {
            symbol: symbol.to_string(),
            anchor: format!("from '{}';", module_path),
            accessor: accessor.to_string(),
            replacement: format!("(await {}())", accessor),
            helper_block,
        }
    }

    /// The destructuring pattern a helper (generated or hand-written) uses
    /// to pull the symbol out of a dynamically loaded module.
    fn destructure_guard(&self) -> String {
        format!("const {{ {} }} =", self.symbol)
    }

    /// Whether a line belongs to a lazy-load helper and must be left alone.
    ///
    /// Covers the symbol-bearing lines of this rule's own helper block
    /// (the destructuring line and the `return <symbol>;` line) plus any
    /// hand-written destructure of the symbol.
    pub(crate) fn is_helper_line(&self, line: &str) -> bool {
        if line.contains(&self.destructure_guard()) {
            return true;
        }

        let trimmed = line.trim();
        self.helper_block
            .lines()
            .any(|h| h.trim() == trimmed && matcher::contains_word(h, &self.symbol))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// A non-fatal problem noticed during a rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteWarning {
    /// Warning category.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

/// The in-memory result of transforming one source text.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The transformed text.
    pub content: String,
    /// Line counts before and after.
    pub lines_in: usize,
    pub lines_out: usize,
    /// Total occurrences rewritten.
    pub replacements: usize,
    /// Distinct lines with at least one replacement.
    pub rewritten_lines: usize,
    /// Whether the import anchor was found and replaced.
    pub anchor_replaced: bool,
    pub warnings: Vec<RewriteWarning>,
}

impl RewriteOutcome {
    /// Whether the transformation changed anything at all.
    pub fn changed(&self) -> bool {
        self.replacements > 0 || self.anchor_replaced
    }
}

/// The full result of rewriting one file.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResult {
    /// Path of the rewritten file.
    pub path: String,
    /// The symbol that was rewritten.
    pub symbol: String,
    /// The accessor its usages now go through.
    pub accessor: String,
    pub lines_in: usize,
    pub lines_out: usize,
    pub replacements: usize,
    pub rewritten_lines: usize,
    pub anchor_replaced: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RewriteWarning>,
    /// Whether the transformed content was written to disk.
    pub applied: bool,
}

// ============================================================================
// Transformation
// ============================================================================

/// Transform one source text in memory. Pure; no I/O.
///
/// Classification and matching are total, so this cannot fail: the worst
/// case is an output identical to the input plus a `missing_anchor`
/// warning.
pub fn rewrite_source(content: &str, rule: &RewriteRule) -> RewriteOutcome {
    let had_trailing_newline = content.ends_with('\n');

    let mut out_lines: Vec<String> = Vec::new();
    let mut lines_in = 0;
    let mut replacements = 0;
    let mut rewritten_lines = 0;
    let mut anchor_replaced = false;

    for line in content.lines() {
        lines_in += 1;

        let kind = classify::classify_line(line, rule);
        let matches = match kind {
            LineKind::Code => matcher::find_occurrences(line, rule),
            _ => Vec::new(),
        };

        let change = substitute::substitute_line(line, kind, &matches, rule);
        if change.anchor {
            anchor_replaced = true;
        }
        if change.replacements > 0 {
            rewritten_lines += 1;
            replacements += change.replacements;
        }
        out_lines.extend(change.lines);
    }

    let mut warnings = Vec::new();
    if !anchor_replaced {
        warnings.push(RewriteWarning {
            kind: "missing_anchor".to_string(),
            message: format!(
                "No import line matching \"{}\" found; helper block not inserted",
                rule.anchor
            ),
        });
    }

    let lines_out = out_lines.len();
    let mut content = out_lines.join("\n");
    if had_trailing_newline {
        content.push('\n');
    }

    RewriteOutcome {
        content,
        lines_in,
        lines_out,
        replacements,
        rewritten_lines,
        anchor_replaced,
        warnings,
    }
}

// ============================================================================
// File entry point
// ============================================================================

/// Rewrite one file in place.
///
/// The whole file is read, transformed in memory, and written back in a
/// single atomic step — a failure at any point leaves the original file
/// exactly as it was. With `write` false the transformation is computed
/// and reported but nothing touches the disk.
pub fn rewrite_file(path: &Path, rule: &RewriteRule, write: bool) -> Result<RewriteResult> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let content = io::read_file(path, &format!("read {}", path.display()))?;
    let outcome = rewrite_source(&content, rule);

    if write {
        io::write_file_atomic(path, &outcome.content, &format!("write {}", path.display()))?;
    }

    Ok(RewriteResult {
        path: path.display().to_string(),
        symbol: rule.symbol.clone(),
        accessor: rule.accessor.clone(),
        lines_in: outcome.lines_in,
        lines_out: outcome.lines_out,
        replacements: outcome.replacements,
        rewritten_lines: outcome.rewritten_lines,
        anchor_replaced: outcome.anchor_replaced,
        warnings: outcome.warnings,
        applied: write,
    })
}

// ============================================================================
// Tests
// ============================================================================
