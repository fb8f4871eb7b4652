//! Integration tests for the exploratory analysis.
//!
//! These tests load the CSV fixtures from disk and run the analysis end to
//! end, the way the binary does.

use housing_eda::{
    Analyzer, EdaConfig, EdaReport, FeatureKind, LoadOptions, MissingDataCleaner, MissingReport,
    Relationship, SkewnessClass, load_table,
};
use housing_eda::utils::is_numeric_dtype;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    load_table(fixtures_path().join(filename), &LoadOptions::default())
        .expect("Failed to load fixture")
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_matches_header_and_line_count() {
    let df = load_fixture("train_sample.csv");

    assert_eq!(df.height(), 12);
    assert_eq!(
        column_names(&df),
        vec![
            "Id",
            "LotFrontage",
            "Alley",
            "OverallQual",
            "YearBuilt",
            "TotalBsmtSF",
            "1stFlrSF",
            "GrLivArea",
            "GarageCars",
            "GarageArea",
            "Electrical",
            "PoolQC",
            "SalePrice",
        ]
    );
    // "NA" is read as missing
    assert_eq!(df.column("PoolQC").unwrap().null_count(), 11);
    assert!(is_numeric_dtype(df.column("LotFrontage").unwrap().dtype()));
}

#[test]
fn test_load_missing_file() {
    let err = load_table(fixtures_path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_load_without_target_column() {
    let err = load_table(fixtures_path().join("no_target.csv"), &LoadOptions::default())
        .unwrap_err();
    assert!(err.is_missing_column());
}

#[test]
fn test_load_malformed_csv() {
    let path = fixtures_path().join("malformed_row.csv");
    let err = load_table(&path, &LoadOptions::default()).unwrap_err();

    assert_eq!(err.error_code(), "POLARS_ERROR");
    assert!(
        err.to_string()
            .starts_with(&format!("Failed to parse CSV file {}", path.display()))
    );
}

// ============================================================================
// Statistics on the sample
// ============================================================================

#[test]
fn test_sale_price_is_moderately_skewed() {
    let df = load_fixture("train_sample.csv");
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    let skew = output.summary.skewness.unwrap();
    assert!((skew - 0.857_772).abs() < 1e-5);
    assert_eq!(output.summary.skew_class, Some(SkewnessClass::ModeratelySkewed));
    assert_eq!(output.summary.count, 12);
    assert_eq!(output.summary.max, 345_000.0);
}

#[test]
fn test_numeric_relationship_matches_matrix() {
    let df = load_fixture("train_sample.csv");
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    let grliv = output
        .relationships
        .iter()
        .find(|r| r.feature() == "GrLivArea")
        .unwrap();
    let r = grliv.pearson().unwrap();

    assert!((r - 0.695_564).abs() < 1e-5);
    assert_eq!(output.correlation.get("GrLivArea", "SalePrice"), Some(r));
    assert_eq!(
        output.correlation.get("SalePrice", "GrLivArea"),
        output.correlation.get("GrLivArea", "SalePrice")
    );
    assert_eq!(output.correlation.get("GrLivArea", "GrLivArea"), Some(1.0));
}

#[test]
fn test_categorical_relationship_groups_by_quality() {
    let df = load_fixture("train_sample.csv");
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    let quality = output
        .relationships
        .iter()
        .find(|r| r.feature() == "OverallQual")
        .unwrap();
    assert_eq!(quality.kind(), FeatureKind::Categorical);

    let Relationship::Categorical { groups, .. } = quality else {
        panic!("expected categorical relationship");
    };
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["5", "6", "7", "8", "9"]);
    assert_eq!(groups[2].stats.count, 5);
}

#[test]
fn test_correlation_ranking_and_collinear_pairs() {
    let df = load_fixture("train_sample.csv");
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    // every numeric column, nullable LotFrontage included
    assert_eq!(output.correlation.columns.len(), 10);
    assert_eq!(output.top_correlated[0].feature, "OverallQual");
    assert_eq!(output.top_correlated.len(), 9);

    assert_eq!(output.collinear_pairs[0].first, "TotalBsmtSF");
    assert_eq!(output.collinear_pairs[0].second, "1stFlrSF");
    assert!(
        output
            .collinear_pairs
            .iter()
            .any(|p| p.first == "GarageCars" && p.second == "GarageArea")
    );
}

// ============================================================================
// Missing data
// ============================================================================

#[test]
fn test_missing_audit_on_sample() {
    let df = load_fixture("train_sample.csv");
    let report = MissingReport::audit(&df);

    let top: Vec<(&str, usize)> = report
        .head(4)
        .iter()
        .map(|e| (e.column.as_str(), e.total))
        .collect();
    assert_eq!(
        top,
        vec![("PoolQC", 11), ("Alley", 10), ("LotFrontage", 2), ("Electrical", 1)]
    );
    for entry in &report.entries {
        assert_eq!(entry.percent, entry.total as f64 / 12.0);
    }
}

#[test]
fn test_cleaning_sample_leaves_no_missing_values() {
    let df = load_fixture("train_sample.csv");
    let original_prices = f64_column(&df, "SalePrice");
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    assert_eq!(
        output.cleaning.dropped_columns,
        vec!["PoolQC", "Alley", "LotFrontage"]
    );
    assert_eq!(output.cleaning.row_drop_columns, vec!["Electrical"]);
    assert_eq!(output.cleaned.shape(), (11, 10));
    assert_eq!(output.cleaning.remaining_missing, 0);
    assert!(
        output
            .cleaned
            .get_columns()
            .iter()
            .all(|c| c.null_count() == 0)
    );

    // Row with Id 10 is the only one removed; the others are untouched
    let mut expected = original_prices;
    expected.remove(9);
    assert_eq!(f64_column(&output.cleaned, "SalePrice"), expected);
}

#[test]
fn test_single_missing_electrical_removes_only_that_row() {
    let df = load_fixture("electrical_ten_rows.csv");
    let columns = column_names(&df);
    let report = MissingReport::audit(&df);

    let cleaner = MissingDataCleaner::from(&EdaConfig::default());
    let (cleaned, outcome) = cleaner.clean(df, &report).unwrap();

    assert_eq!(cleaned.height(), 9);
    assert_eq!(column_names(&cleaned), columns);
    assert!(outcome.dropped_columns.is_empty());
    assert!(outcome.unexpected_row_drop_columns.is_empty());
    assert_eq!(cleaned.column("Electrical").unwrap().null_count(), 0);
}

#[test]
fn test_generic_column_with_two_missing_is_dropped() {
    let mut df = load_fixture("electrical_ten_rows.csv");
    let x = Series::new(
        "X".into(),
        [Some(1.0), None, Some(3.0), Some(4.0), None, Some(6.0), Some(7.0), Some(8.0), Some(9.0), Some(10.0)],
    );
    df.with_column(x).unwrap();
    let report = MissingReport::audit(&df);

    let cleaner = MissingDataCleaner::from(&EdaConfig::default());
    let (cleaned, outcome) = cleaner.clean(df, &report).unwrap();

    assert_eq!(outcome.dropped_columns, vec!["X"]);
    assert!(cleaned.column("X").is_err());
    assert_eq!(cleaned.height(), 9);
}

// ============================================================================
// Configuration and reports
// ============================================================================

#[test]
fn test_run_with_json_config() {
    let config = EdaConfig::from_json_file(fixtures_path().join("eda_config.json")).unwrap();
    assert_eq!(config.missing_column_threshold, 1);

    let df = load_table(
        fixtures_path().join("train_sample.csv"),
        &LoadOptions::from(&config),
    )
    .unwrap();
    let output = Analyzer::new(config).run(df).unwrap();

    assert_eq!(output.relationships.len(), 4);
    assert_eq!(output.top_correlated.len(), 5);
    assert!(output.collinear_pairs.iter().all(|p| p.r.abs() >= 0.85));
}

#[test]
fn test_emit_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures_path().join("train_sample.csv");
    let df = load_table(&input, &LoadOptions::default()).unwrap();
    let output = Analyzer::new(EdaConfig::default()).run(df).unwrap();

    let report = EdaReport::build(&input, &output);
    let path = report.write_to_dir(dir.path(), "train_sample").unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["final_shape"], serde_json::json!([11, 10]));
    assert_eq!(json["missing"][0]["column"], "PoolQC");
    assert_eq!(json["correlation"]["top_correlated"][0]["feature"], "OverallQual");
}

#[test]
#[ignore = "needs system fonts for chart text"]
fn test_render_all_charts() {
    let dir = tempfile::tempdir().unwrap();
    let config = EdaConfig::builder()
        .plot_dir(dir.path())
        .top_correlated(5)
        .build()
        .unwrap();

    let df = load_fixture("train_sample.csv");
    let output = Analyzer::new(config).run(df).unwrap();

    let names: Vec<String> = output
        .charts
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "saleprice_distribution.png",
            "scatter_grlivarea.png",
            "scatter_totalbsmtsf.png",
            "boxplot_overallqual.png",
            "boxplot_yearbuilt.png",
            "correlation_heatmap.png",
            "correlation_top_5.png",
        ]
    );
    assert!(output.charts.iter().all(|p| p.is_file()));
}
