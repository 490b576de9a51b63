//! Compact output snapshot stored with a feedback entry.

use serde_json::json;

use strategy_core::types::StrategyOutput;

const MAX_SNAPSHOT_CHARS: usize = 500;

/// Build the truncated JSON snapshot of a strategy output that travels with
/// feedback, so later prompt context can reference what the user rated.
pub fn build_output_snapshot(mode: &str, output: &StrategyOutput) -> String {
    let snapshot = json!({
        "mode": mode,
        "summary": output.strategy_summary,
        "complianceNote": output.compliance_notes.first().cloned().unwrap_or_default(),
        "hooks": output.hooks.iter().take(3).collect::<Vec<_>>(),
        "firstScript": output
            .video_scripts
            .first()
            .map(|s| s.script.as_str())
            .unwrap_or_default(),
        "firstPostTitle": output
            .script_post_packages
            .first()
            .map(|p| p.post_title.as_str())
            .unwrap_or_default(),
    })
    .to_string();

    snapshot.chars().take(MAX_SNAPSHOT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_truncates_to_cap() {
        let mut output = StrategyOutput::default();
        output.strategy_summary = "x".repeat(2000);
        let snapshot = build_output_snapshot("guided", &output);
        assert_eq!(snapshot.chars().count(), 500);
    }

    #[test]
    fn test_snapshot_contains_mode_and_summary() {
        let mut output = StrategyOutput::default();
        output.strategy_summary = "Short summary.".to_string();
        output.hooks = vec!["h1".into(), "h2".into(), "h3".into(), "h4".into()];
        let snapshot = build_output_snapshot("automation", &output);
        assert!(snapshot.contains("\"mode\":\"automation\""));
        assert!(snapshot.contains("Short summary."));
        assert!(snapshot.contains("h3"));
        assert!(!snapshot.contains("h4"));
    }
}
