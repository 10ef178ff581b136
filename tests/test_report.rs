//! Integration test: text and JSON reports

use chrono::NaiveDate;
use ndarray::Array2;
use regression_bench::dataset::Dataset;
use regression_bench::evaluation::RankingSignal;
use regression_bench::report::{
    render_analysis_report, render_performance_report, write_json_summary, write_report, OutcomeSummary,
};
use regression_bench::training::{Hyperparameter, ModelFamily, SelectionConfig, SelectionEngine};

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .and_then(|d| d.and_hms_opt(14, 30, 22))
        .unwrap()
}

fn dataset(zero_target: bool) -> Dataset {
    let values = Array2::from_shape_fn((60, 3), |(r, c)| {
        let x1 = (r % 12) as f64;
        let x2 = ((r * 5) % 9) as f64;
        match c {
            0 => x1,
            1 => x2,
            _ if zero_target && r % 10 == 0 => 0.0,
            _ => 2.0 * x1 + x2 + 1.0,
        }
    });
    Dataset::new(vec!["x1".into(), "x2".into(), "target".into()], values).unwrap()
}

#[test]
fn test_performance_report_sections() {
    let config = SelectionConfig::new("target")
        .with_families(vec![ModelFamily::LinearRegression, ModelFamily::DecisionTree])
        .with_grid(
            ModelFamily::DecisionTree,
            vec![Hyperparameter::MaxDepth(Some(3)), Hyperparameter::MaxDepth(None)],
        );
    let outcome = SelectionEngine::new(config).run(&dataset(false)).unwrap();
    let text = render_performance_report(&outcome, timestamp());

    assert!(text.contains("Generated: 2025-01-15 14:30:22"));
    assert!(text.contains("1. COMPARISON TABLE"));
    assert!(text.contains("2. MODEL DETAILS"));
    assert!(text.contains("3. RECOMMENDATION"));
    assert!(text.contains("(intercept)"));
    assert!(text.contains("Feature importances:"));
    assert!(text.contains("max_depth=None"));
    assert_eq!(text.lines().last().unwrap(), "Recommended model: LINEAR_REGRESSION");
}

#[test]
fn test_recommendation_follows_configured_signal() {
    let base = SelectionConfig::new("target").with_families(vec![ModelFamily::Knn, ModelFamily::LinearRegression]);
    for signal in [RankingSignal::TestError, RankingSignal::CrossValidation] {
        let outcome = SelectionEngine::new(base.clone().with_ranking_signal(signal))
            .run(&dataset(false))
            .unwrap();
        let text = render_performance_report(&outcome, timestamp());
        let expected = format!(
            "Recommended model: {}",
            outcome.comparison.ranking()[0].family.as_str().to_uppercase()
        );
        assert_eq!(text.lines().last().unwrap(), expected);
        assert!(text.contains(&format!("Ranking signal: {}", signal)));
    }
}

#[test]
fn test_zero_target_prints_undefined_mape() {
    let config = SelectionConfig::new("target").with_families(vec![ModelFamily::LinearRegression]);
    let ds = dataset(true);
    let outcome = SelectionEngine::new(config).run(&ds).unwrap();

    let test_has_zero = outcome.comparison.results[0].metrics.mape.is_none();
    let text = render_performance_report(&outcome, timestamp());
    assert_eq!(text.contains("MAPE undefined"), test_has_zero);
}

#[test]
fn test_analysis_report_and_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let ds = dataset(false);

    let text = render_analysis_report(&ds, "target", timestamp()).unwrap();
    assert!(text.contains("Samples: 60"));
    assert!(text.contains("Features: 2"));
    assert!(text.contains("STRONG CORRELATIONS"));
    let report_path = dir.path().join("output").join("analysis.txt");
    write_report(&report_path, &text).unwrap();
    assert!(report_path.exists());

    let outcome = SelectionEngine::new(SelectionConfig::new("target").with_families(vec![ModelFamily::Knn]))
        .run(&ds)
        .unwrap();
    let json_path = dir.path().join("output").join("summary.json");
    write_json_summary(&json_path, &outcome).unwrap();

    let parsed: OutcomeSummary = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.recommended, ModelFamily::Knn);
    assert_eq!(parsed.n_test, 12);
    assert_eq!(parsed.families.len(), 1);
    assert_eq!(parsed.families[0].sweep.candidates.len(), 5);
}

#[test]
fn test_analysis_report_missing_target() {
    assert!(render_analysis_report(&dataset(false), "price", timestamp()).is_err());
}
