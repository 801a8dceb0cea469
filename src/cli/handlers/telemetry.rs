//! Telemetry command handlers: feedback and listing.

use anyhow::Result;

use crate::cli::output::{
    output_json, output_json_list, print_hint, print_markdown_table, print_success, print_table,
    OutputMode,
};
use crate::init::AppContext;
use crate::models::TelemetryRecord;
use crate::utils::sanitize::validate_token;

pub async fn handle_feedback(
    ctx: &AppContext,
    token: &str,
    appeared: bool,
    mode: OutputMode,
) -> Result<()> {
    let key = validate_token(token)?;
    let store = ctx.telemetry.store();
    let record = store
        .record_outcome(&key, appeared)
        .ok_or_else(|| anyhow::anyhow!("Token '{}' could not be recorded", token))?;
    ctx.telemetry
        .save()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save telemetry: {}", e))?;

    if mode == OutputMode::Json {
        output_json(&record);
    } else {
        print_success(&format!(
            "Recorded '{}' as {} ({})",
            record.token,
            if appeared { "appeared" } else { "missing" },
            rate_label(&record)
        ));
    }
    Ok(())
}

pub fn handle_list(
    ctx: &AppContext,
    token: Option<&str>,
    below: Option<f64>,
    mode: OutputMode,
) -> Result<()> {
    let store = ctx.telemetry.store();
    let records: Vec<TelemetryRecord> = match token {
        Some(token) => store.record(token).into_iter().collect(),
        None => store.snapshot(),
    };
    let records = filter_below(records, below);

    match mode {
        OutputMode::Json => output_json_list(&records),
        OutputMode::Markdown => {
            print_markdown_table(&["Token", "Attempts", "Successes", "Rate"], to_rows(&records))
        }
        OutputMode::Human => {
            print_table(&["Token", "Attempts", "Successes", "Rate"], to_rows(&records));
            if records.is_empty() && token.is_none() {
                print_hint("Record outcomes with: sceneweave feedback <token> [--missing]");
            }
        }
    }
    Ok(())
}

fn filter_below(records: Vec<TelemetryRecord>, below: Option<f64>) -> Vec<TelemetryRecord> {
    match below {
        Some(limit) => records
            .into_iter()
            .filter(|r| r.manifestation_rate().is_some_and(|rate| rate < limit))
            .collect(),
        None => records,
    }
}

fn rate_label(record: &TelemetryRecord) -> String {
    match record.manifestation_rate() {
        Some(rate) => format!("{:.0}%", rate * 100.0),
        None => "-".to_string(),
    }
}

fn to_rows(records: &[TelemetryRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.token.clone(),
                r.attempts.to_string(),
                r.successes.to_string(),
                rate_label(r),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(token: &str, attempts: u64, successes: u64) -> TelemetryRecord {
        TelemetryRecord {
            token: token.into(),
            attempts,
            successes,
        }
    }

    #[test]
    fn test_filter_below() {
        let records = vec![record("wand", 4, 1), record("lantern", 2, 2), record("cup", 0, 0)];
        let low = filter_below(records.clone(), Some(0.5));
        assert_eq!(low, vec![record("wand", 4, 1)]);
        assert_eq!(filter_below(records, None).len(), 3);
    }

    #[test]
    fn test_rate_label() {
        assert_eq!(rate_label(&record("wand", 4, 1)), "25%");
        assert_eq!(rate_label(&record("cup", 0, 0)), "-");
    }
}
