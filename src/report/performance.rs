//! Plain-text model performance report

use crate::evaluation::{FamilyResult, RankedFamily};
use crate::training::{ModelDetails, SelectionOutcome};
use crate::utils::{format_number, separator};
use chrono::NaiveDateTime;

const WIDTH: usize = 72;

/// Text shown for a metric that is undefined on this test set
pub const UNDEFINED: &str = "undefined";

fn format_mape(mape: Option<f64>) -> String {
    match mape {
        Some(v) => format!("{:.2}%", v),
        None => UNDEFINED.to_string(),
    }
}

fn push_ranking(out: &mut String, title: &str, ranking: &[RankedFamily]) {
    out.push_str(&format!("{}\n", title));
    for (pos, entry) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {:<20} MSE {:.4}\n",
            pos + 1,
            entry.family.as_str(),
            entry.score
        ));
    }
}

fn push_family_details(out: &mut String, result: &FamilyResult) {
    let family = result.family();
    out.push_str(&format!("\n>>> {} ({})\n", family.as_str().to_uppercase(), family.display_name()));
    out.push_str(&format!("  Best hyperparameter: {}\n", result.model.hyperparameter));
    out.push_str(&format!(
        "  CV MSE: {:.4} (std {:.4}, {} folds)\n",
        result.sweep.best_cv.mean_mse, result.sweep.best_cv.std_mse, result.sweep.best_cv.n_folds
    ));

    if result.sweep.candidates.len() > 1 {
        out.push_str("  Candidates:\n");
        for candidate in &result.sweep.candidates {
            out.push_str(&format!(
                "    {:<20} CV MSE {:.4} (std {:.4})\n",
                candidate.candidate.to_string(),
                candidate.cv.mean_mse,
                candidate.cv.std_mse
            ));
        }
    }

    let m = &result.metrics;
    out.push_str(&format!(
        "  Test metrics ({} rows): MAE {:.4} | MSE {:.4} | RMSE {:.4} | R2 {:.4} | MAPE {}\n",
        format_number(m.n_samples as f64, 0),
        m.mae,
        m.mse,
        m.rmse,
        m.r2,
        format_mape(m.mape)
    ));

    match &result.model.details {
        ModelDetails::Linear { coefficients, intercept } => {
            out.push_str("  Coefficients:\n");
            for (name, value) in coefficients {
                out.push_str(&format!("    {:<20} {:>12.6}\n", name, value));
            }
            out.push_str(&format!("    {:<20} {:>12.6}\n", "(intercept)", intercept));
        }
        ModelDetails::Tree {
            feature_importances,
            depth,
            n_leaves,
        } => {
            out.push_str(&format!("  Depth: {} | Leaves: {}\n", depth, n_leaves));
            out.push_str("  Feature importances:\n");
            let mut sorted: Vec<(&String, &f64)> = feature_importances.iter().collect();
            sorted.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
            for (name, value) in sorted {
                out.push_str(&format!("    {:<20} {:>8.4}\n", name, value));
            }
        }
        ModelDetails::Opaque => {}
    }
    out.push_str(&format!("  Sweep + refit time: {:.3}s\n", result.elapsed_secs));
}

/// Render the comparison table, per-family details and the recommendation.
///
/// The final line names the family chosen by the configured ranking signal.
pub fn render_performance_report(outcome: &SelectionOutcome, generated_at: NaiveDateTime) -> String {
    let comparison = &outcome.comparison;
    let rule = separator('=', WIDTH);
    let thin = separator('-', WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str("REGRESSION MODEL PERFORMANCE REPORT\n");
    out.push_str(&format!("Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!(
        "Target: {} | Train rows: {} | Test rows: {}\n",
        outcome.target_column,
        format_number(outcome.n_train as f64, 0),
        format_number(outcome.n_test as f64, 0)
    ));
    out.push_str(&format!("{}\n\n", rule));

    out.push_str("1. COMPARISON TABLE\n");
    out.push_str(&format!(
        "{:<20} | {:<20} | {:>12} | {:>12}\n",
        "Model", "Best hyperparameter", "CV MSE", "Test MSE"
    ));
    out.push_str(&format!("{}\n", thin));
    for result in &comparison.results {
        out.push_str(&format!(
            "{:<20} | {:<20} | {:>12.4} | {:>12.4}\n",
            result.family().as_str(),
            result.model.hyperparameter.to_string(),
            result.sweep.best_cv.mean_mse,
            result.metrics.mse
        ));
    }
    for failure in &outcome.failures {
        out.push_str(&format!("{:<20} | {:<20} | {:>12} | {:>12}\n", failure.family.as_str(), "failed", "-", "-"));
    }

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("2. MODEL DETAILS\n");
    for result in &comparison.results {
        push_family_details(&mut out, result);
    }
    for failure in &outcome.failures {
        out.push_str(&format!("\n>>> {} FAILED\n", failure.family.as_str().to_uppercase()));
        out.push_str(&format!("  Reason: {}\n", failure.error));
    }

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("3. RECOMMENDATION\n");
    push_ranking(&mut out, "Ranking by test-set MSE:", &comparison.test_ranking);
    push_ranking(&mut out, "Ranking by cross-validation MSE:", &comparison.cv_ranking);
    out.push_str(&format!("Ranking signal: {}\n", comparison.signal));
    if let Some(other) = comparison.alternative() {
        if other != comparison.recommended {
            out.push_str(&format!("Note: the other signal prefers {}\n", other.as_str().to_uppercase()));
        }
    }
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!(
        "Recommended model: {}\n",
        comparison.recommended.as_str().to_uppercase()
    ));

    out
}
