//! Performance report formatting.
//!
//! Loads a Lighthouse-style JSON report and prints the fields a human
//! actually looks at: the performance score, the key timing metrics, the
//! top improvement opportunities, and a fixed set of diagnostics.
//! Read-only; shares nothing with the rewrite engine.

use crate::error::{Error, Result};
use crate::utils::io;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Audit keys reported as headline metrics, in display order.
const METRIC_AUDITS: &[&str] = &[
    "first-contentful-paint",
    "total-blocking-time",
    "largest-contentful-paint",
    "cumulative-layout-shift",
    "speed-index",
];

/// Audit keys reported in the diagnostics section, in display order.
const DIAGNOSTIC_AUDITS: &[&str] = &[
    "mainthread-work-breakdown",
    "script-treemap-data",
    "render-blocking-resources",
    "unused-javascript",
];

/// How many unused-javascript items to summarize.
const UNUSED_JS_ITEM_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct PerfReport {
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub audits: BTreeMap<String, Audit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Categories {
    pub performance: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Audit {
    pub title: Option<String>,
    pub score: Option<f64>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Deserialize)]
pub struct AuditDetails {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(rename = "overallSavingsMs")]
    pub savings_ms: Option<f64>,
}

impl Audit {
    fn is_opportunity(&self) -> bool {
        self.score != Some(1.0)
            && self
                .details
                .as_ref()
                .and_then(|d| d.kind.as_deref())
                .map(|k| k == "opportunity")
                .unwrap_or(false)
    }

    fn savings_ms(&self) -> Option<f64> {
        self.details.as_ref().and_then(|d| d.savings_ms)
    }
}

/// Load a report from disk.
pub fn load_report(path: &Path) -> Result<PerfReport> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let raw = io::read_file(path, &format!("read {}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| Error::report_malformed(path.display().to_string(), e))
}

/// Render the report sections as human-readable text.
///
/// `top` caps the opportunities list. Pure function of the parsed report;
/// absent fields render as placeholders rather than failing.
pub fn format_report(report: &PerfReport, top: usize) -> String {
    let mut out = String::new();

    let score = report
        .categories
        .performance
        .as_ref()
        .and_then(|p| p.score);

    let Some(score) = score else {
        out.push_str("Performance score not found in report.\n");
        return out;
    };

    out.push_str(&format!("Performance Score: {}\n", score * 100.0));

    out.push_str("\nMetrics:\n");
    for key in METRIC_AUDITS {
        if let Some(audit) = report.audits.get(*key) {
            out.push_str(&format!(
                "{}: {}\n",
                audit.title.as_deref().unwrap_or(key),
                audit.display_value.as_deref().unwrap_or("n/a")
            ));
        }
    }

    out.push_str("\nTop Opportunities:\n");
    let mut opportunities: Vec<(&String, &Audit)> = report
        .audits
        .iter()
        .filter(|(_, audit)| audit.is_opportunity())
        .collect();
    // Biggest estimated savings first; audits without an estimate sink
    opportunities.sort_by(|a, b| {
        b.1.savings_ms()
            .unwrap_or(f64::MIN)
            .total_cmp(&a.1.savings_ms().unwrap_or(f64::MIN))
    });
    for (key, audit) in opportunities.iter().take(top) {
        out.push_str(&format!(
            "{} ({}): score {}\n",
            audit.title.as_deref().unwrap_or(key.as_str()),
            audit.display_value.as_deref().unwrap_or(""),
            audit
                .score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }

    out.push_str("\nDiagnostics:\n");
    for key in DIAGNOSTIC_AUDITS {
        let Some(audit) = report.audits.get(*key) else {
            continue;
        };

        out.push_str(&format!(
            "{}: {}\n",
            audit.title.as_deref().unwrap_or(key),
            audit.display_value.as_deref().unwrap_or("n/a")
        ));

        let items = audit
            .details
            .as_ref()
            .map(|d| d.items.as_slice())
            .unwrap_or(&[]);

        match *key {
            "render-blocking-resources" => {
                out.push_str(&format!(
                    "{}\n",
                    serde_json::to_string_pretty(items)
                        .unwrap_or_else(|_| "[]".to_string())
                ));
            }
            "unused-javascript" => {
                for item in items.iter().take(UNUSED_JS_ITEM_LIMIT) {
                    out.push_str(&format!(
                        "  {}: {} bytes (Unused: {})\n",
                        item.get("url").and_then(Value::as_str).unwrap_or("?"),
                        item.get("totalBytes").and_then(Value::as_u64).unwrap_or(0),
                        item.get("wastedBytes").and_then(Value::as_u64).unwrap_or(0)
                    ));
                }
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "categories": { "performance": { "score": 0.87 } },
        "audits": {
            "first-contentful-paint": {
                "title": "First Contentful Paint",
                "score": 0.9,
                "displayValue": "1.2 s"
            },
            "speed-index": {
                "title": "Speed Index",
                "score": 0.8,
                "displayValue": "2.4 s"
            },
            "unused-javascript": {
                "title": "Reduce unused JavaScript",
                "score": 0.5,
                "displayValue": "Potential savings of 120 KiB",
                "details": {
                    "type": "opportunity",
                    "overallSavingsMs": 450.0,
                    "items": [
                        { "url": "https://cdn.example/app.js", "totalBytes": 400000, "wastedBytes": 120000 }
                    ]
                }
            },
            "render-blocking-resources": {
                "title": "Eliminate render-blocking resources",
                "score": 0.7,
                "displayValue": "Potential savings of 80 ms",
                "details": {
                    "type": "opportunity",
                    "overallSavingsMs": 80.0,
                    "items": [ { "url": "https://cdn.example/styles.css" } ]
                }
            },
            "mainthread-work-breakdown": {
                "title": "Minimize main-thread work",
                "score": 1.0,
                "displayValue": "1.8 s"
            }
        }
    }"#;

    fn fixture() -> PerfReport {
        serde_json::from_str(FIXTURE).unwrap()
    }

    #[test]
    fn score_is_scaled_to_percent() {
        let text = format_report(&fixture(), 5);
        assert!(text.contains("Performance Score: 87"), "got:\n{}", text);
    }

    #[test]
    fn metrics_listed_with_display_values() {
        let text = format_report(&fixture(), 5);
        assert!(text.contains("First Contentful Paint: 1.2 s"));
        assert!(text.contains("Speed Index: 2.4 s"));
        // Absent metric audits are simply skipped
        assert!(!text.contains("total-blocking-time"));
    }

    #[test]
    fn opportunities_ranked_by_savings() {
        let text = format_report(&fixture(), 5);
        let unused = text.find("Reduce unused JavaScript").unwrap();
        let blocking = text.find("Eliminate render-blocking resources").unwrap();
        assert!(unused < blocking, "450ms savings should rank first:\n{}", text);
    }

    #[test]
    fn opportunities_capped_at_top_n() {
        let text = format_report(&fixture(), 1);
        assert!(text.contains("Reduce unused JavaScript (Potential savings of 120 KiB)"));
        assert!(!text.contains("Eliminate render-blocking resources (Potential savings of 80 ms)"));
    }

    #[test]
    fn perfect_score_audit_is_not_an_opportunity() {
        let report = fixture();
        assert!(!report.audits["mainthread-work-breakdown"].is_opportunity());
    }

    #[test]
    fn unused_javascript_items_summarized() {
        let text = format_report(&fixture(), 5);
        assert!(text.contains("https://cdn.example/app.js: 400000 bytes (Unused: 120000)"));
    }

    #[test]
    fn missing_score_short_circuits() {
        let report: PerfReport = serde_json::from_str(r#"{ "audits": {} }"#).unwrap();
        let text = format_report(&report, 5);
        assert_eq!(text, "Performance score not found in report.\n");
    }

    #[test]
    fn load_report_missing_file() {
        let err = load_report(Path::new("/nonexistent/report.json")).unwrap_err();
        assert_eq!(err.code.as_str(), "file.not_found");
    }

    #[test]
    fn load_report_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_report(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "report.malformed");
    }

    #[test]
    fn load_report_parses_fixture_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let report = load_report(&path).unwrap();
        assert_eq!(
            report.categories.performance.and_then(|p| p.score),
            Some(0.87)
        );
        assert_eq!(report.audits.len(), 5);
    }
}
