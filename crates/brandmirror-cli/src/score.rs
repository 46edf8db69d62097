use std::path::Path;

use anyhow::Context;
use brandmirror_scoring::{
    calculate_brand_health_score, BrandHealthScore, CompleteBrandAnalysis, HealthScoreSnapshot,
};

/// Read an analysis (and optional history) from disk and print the blended score.
///
/// # Errors
///
/// Returns an error if either file cannot be read or does not parse.
pub(crate) fn run_score(analysis: &Path, history: Option<&Path>) -> anyhow::Result<()> {
    let analysis_json = std::fs::read_to_string(analysis)
        .with_context(|| format!("failed to read {}", analysis.display()))?;
    let history_json = history
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
        })
        .transpose()?;

    let score = score_from_json(&analysis_json, history_json.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}

pub(crate) fn score_from_json(
    analysis_json: &str,
    history_json: Option<&str>,
) -> anyhow::Result<BrandHealthScore> {
    let analysis: CompleteBrandAnalysis =
        serde_json::from_str(analysis_json).context("analysis file is not a valid brand analysis")?;
    let history: Option<Vec<HealthScoreSnapshot>> = history_json
        .map(serde_json::from_str::<Vec<HealthScoreSnapshot>>)
        .transpose()
        .context("history file must be a JSON array of {score, calculated_at}")?;

    Ok(calculate_brand_health_score(&analysis, history.as_deref()))
}
