use clap::Args;
use serde::Serialize;
use std::path::Path;

use lazify::log_status;
use lazify::rewrite::{self, RewriteResult, RewriteRule};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RewriteArgs {
    /// Source file to rewrite in place
    pub path: String,

    /// Identifier whose usages become lazy accessor calls
    #[arg(long, default_value = "supabase")]
    pub symbol: String,

    /// Module specifier the identifier is imported from
    #[arg(long = "module", default_value = "../supabaseClient")]
    pub module_path: String,

    /// Accessor function name (default: "get" + capitalized symbol)
    #[arg(long)]
    pub accessor: Option<String>,

    /// Compute and report the rewrite without touching the file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RewriteOutput {
    #[serde(rename = "rewrite")]
    Rewrite {
        dry_run: bool,
        #[serde(flatten)]
        result: RewriteResult,
    },
}

pub fn run(args: RewriteArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RewriteOutput> {
    validate_identifier("symbol", &args.symbol)?;
    if let Some(accessor) = &args.accessor {
        validate_identifier("accessor", accessor)?;
    }

    let rule = match args.accessor.as_deref() {
        Some(accessor) => RewriteRule::with_accessor(&args.symbol, &args.module_path, accessor),
        None => RewriteRule::lazy_accessor(&args.symbol, &args.module_path),
    };

    let result = rewrite::rewrite_file(Path::new(&args.path), &rule, !args.dry_run)?;

    if result.anchor_replaced {
        log_status!(
            "rewrite",
            "Rewrote {}: {} occurrence(s), helper block inserted",
            result.path,
            result.replacements
        );
    } else {
        log_status!(
            "rewrite",
            "Warning: no import line matching \"{}\" in {}; helper block not inserted",
            rule.anchor,
            result.path
        );
    }

    Ok((
        RewriteOutput::Rewrite {
            dry_run: args.dry_run,
            result,
        },
        0,
    ))
}

fn validate_identifier(field: &str, value: &str) -> lazify::Result<()> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(lazify::Error::validation_invalid_argument(
            field,
            format!("'{}' is not a valid identifier", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_accepted() {
        assert!(validate_identifier("symbol", "supabase").is_ok());
        assert!(validate_identifier("symbol", "_private").is_ok());
        assert!(validate_identifier("symbol", "db2").is_ok());
    }

    #[test]
    fn identifiers_rejected() {
        assert!(validate_identifier("symbol", "").is_err());
        assert!(validate_identifier("symbol", "2db").is_err());
        assert!(validate_identifier("symbol", "my-client").is_err());
        assert!(validate_identifier("symbol", "a.b").is_err());
    }
}
