//! Substitution — rewrite matched occurrences and splice the helper block.

use super::classify::LineKind;
use super::matcher::Match;
use super::RewriteRule;

/// The outcome of substituting one classified line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChange {
    /// Output lines. Always exactly one, except the anchor line expanding
    /// into the helper block.
    pub lines: Vec<String>,
    /// How many occurrences were rewritten on this line.
    pub replacements: usize,
    /// Whether this line was the import anchor.
    pub anchor: bool,
}

impl LineChange {
    fn unchanged(line: &str) -> Self {
        LineChange {
            lines: vec![line.to_string()],
            replacements: 0,
            anchor: false,
        }
    }
}

/// Replace each matched span with the rule's accessor expression.
///
/// Matches were computed on the original line text, so replacement runs
/// right-to-left: earlier offsets stay valid while later spans change
/// length. Everything outside the spans — punctuation, whitespace,
/// trailing comments — is preserved byte for byte.
pub fn apply_matches(line: &str, matches: &[Match], replacement: &str) -> String {
    let mut out = line.to_string();
    for m in matches.iter().rev() {
        out.replace_range(m.start..m.end, replacement);
    }
    out
}

/// Transform one line according to its kind and match list.
pub fn substitute_line(
    line: &str,
    kind: LineKind,
    matches: &[Match],
    rule: &RewriteRule,
) -> LineChange {
    match kind {
        LineKind::ImportDeclaration => LineChange {
            lines: rule.helper_block.lines().map(str::to_string).collect(),
            replacements: 0,
            anchor: true,
        },
        LineKind::Comment | LineKind::HelperLine => LineChange::unchanged(line),
        LineKind::Code => {
            if matches.is_empty() {
                LineChange::unchanged(line)
            } else {
                LineChange {
                    lines: vec![apply_matches(line, matches, &rule.replacement)],
                    replacements: matches.len(),
                    anchor: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::matcher;

    fn default_rule() -> RewriteRule {
        RewriteRule::lazy_accessor("supabase", "../supabaseClient")
    }

    fn code_change(line: &str, rule: &RewriteRule) -> LineChange {
        let matches = matcher::find_occurrences(line, rule);
        substitute_line(line, LineKind::Code, &matches, rule)
    }

    #[test]
    fn single_occurrence_rewritten() {
        let rule = default_rule();
        let change = code_change("const x = await supabase.from('users');", &rule);
        assert_eq!(
            change.lines,
            vec!["const x = await (await getSupabase()).from('users');"]
        );
        assert_eq!(change.replacements, 1);
    }

    #[test]
    fn two_occurrences_rewritten_independently() {
        let rule = default_rule();
        let change = code_change("supabase.a(); supabase.b();", &rule);
        assert_eq!(
            change.lines,
            vec!["(await getSupabase()).a(); (await getSupabase()).b();"]
        );
        assert_eq!(change.replacements, 2);
    }

    #[test]
    fn trailing_comment_preserved() {
        let rule = default_rule();
        let change = code_change("supabase.rpc('x'); // call supabase here", &rule);
        assert!(change.lines[0].ends_with("// call (await getSupabase()) here"));
        assert!(change.lines[0].starts_with("(await getSupabase()).rpc('x');"));
    }

    #[test]
    fn anchor_expands_to_helper_block() {
        let rule = default_rule();
        let change = substitute_line(
            "import { supabase } from '../supabaseClient';",
            LineKind::ImportDeclaration,
            &[],
            &rule,
        );
        assert!(change.anchor);
        assert_eq!(change.lines.len(), rule.helper_block.lines().count());
        assert_eq!(change.lines.join("\n"), rule.helper_block);
    }

    #[test]
    fn comment_and_helper_lines_pass_through() {
        let rule = default_rule();
        for kind in [LineKind::Comment, LineKind::HelperLine] {
            let change = substitute_line("// supabase", kind, &[], &rule);
            assert_eq!(change.lines, vec!["// supabase"]);
            assert_eq!(change.replacements, 0);
            assert!(!change.anchor);
        }
    }

    #[test]
    fn matchless_code_line_unchanged() {
        let rule = default_rule();
        let line = "const client = getSupabase;";
        let change = code_change(line, &rule);
        assert_eq!(change.lines, vec![line]);
        assert_eq!(change.replacements, 0);
    }
}
