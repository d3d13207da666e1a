//! Output formatting for resolution reports.

use crate::resolver::{LayerReason, Resolution, SectionOutcome};
use serde_json::{Value, json};
use std::path::Path;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn reason_text(reason: LayerReason) -> &'static str {
    match reason {
        LayerReason::EnvironmentMissing => "environment config directory does not exist",
        LayerReason::UserMissing => "user config directory does not exist",
        LayerReason::MergeSuppressed => "user config merging is disabled",
        LayerReason::Merged => "user extensions merged",
    }
}

fn outcome_text(outcome: SectionOutcome) -> &'static str {
    match outcome {
        SectionOutcome::Unchanged => "unchanged",
        SectionOutcome::MergedIntoEnvironment => "merged into environment",
        SectionOutcome::FellBackToUser => "environment read-only, saved to user",
    }
}

/// Format a resolution as plain text.
pub fn format_resolution_text(resolution: &Resolution, active_dir: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!("Active config dir: {}\n", active_dir.display()));
    out.push_str(&format!(
        "Layer: {} ({})\n",
        resolution.layer,
        reason_text(resolution.reason)
    ));
    for (section, outcome) in &resolution.sections {
        out.push_str(&format!("  {:<10} {}\n", section, outcome_text(*outcome)));
    }
    out
}

/// Format a resolution as a JSON value.
pub fn format_resolution_json(resolution: &Resolution, active_dir: &Path) -> Value {
    let sections: serde_json::Map<String, Value> = resolution
        .sections
        .iter()
        .map(|(name, outcome)| (name.clone(), json!(outcome)))
        .collect();
    json!({
        "active_config_dir": active_dir.display().to_string(),
        "layer": resolution.layer,
        "reason": resolution.reason,
        "sections": sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolvedLayer;

    fn merged_resolution() -> Resolution {
        Resolution {
            layer: ResolvedLayer::User,
            reason: LayerReason::Merged,
            sections: vec![
                ("notebook".to_string(), SectionOutcome::FellBackToUser),
                ("tree".to_string(), SectionOutcome::Unchanged),
            ],
        }
    }

    #[test]
    fn test_text_lists_sections() {
        let text = format_resolution_text(&merged_resolution(), Path::new("/home/a/.jupyter/nbconfig"));
        assert!(text.starts_with("Active config dir: /home/a/.jupyter/nbconfig\n"));
        assert!(text.contains("Layer: user (user extensions merged)"));
        assert!(text.contains("notebook   environment read-only, saved to user"));
    }

    #[test]
    fn test_json_shape() {
        let value = format_resolution_json(&merged_resolution(), Path::new("/u"));
        assert_eq!(
            value,
            json!({
                "active_config_dir": "/u",
                "layer": "user",
                "reason": "merged",
                "sections": {"notebook": "fell_back_to_user", "tree": "unchanged"}
            })
        );
    }
}
