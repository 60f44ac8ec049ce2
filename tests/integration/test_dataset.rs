//! Dataset loading and analysis tests against files on disk.

use std::sync::Arc;

use tempfile::TempDir;

use realty::analysis::{AnalysisEngine, Outcome, QueryIntent};
use realty::config::Config;
use realty::dataset::{CachedDataset, CellValue, DatasetSchema, DatasetSource};
use realty::error::{DatasetError, RealtyError};
use realty::summarizer::DisabledSummarizer;

const HISTORY_CSV: &str = "\u{feff}Final Location,Year,Flat - Weighted Average Rate,Total Sales - IGR
Baner,2018,7000,300
Baner,2019,7200.5,320
Baner,2020,,310
Baner,2021,7800,
Baner,2022,8100,350
Baner,2023,8300,360
,,,
Hinjewadi,2023,6500,500
";

fn config_for(dir: &TempDir, file: &str, content: &str) -> Config {
    let path = dir.path().join(file);
    std::fs::write(&path, content).unwrap();

    let mut config = Config::default();
    config.dataset.path = path.to_string_lossy().to_string();
    config
}

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(Arc::new(DisabledSummarizer), DatasetSchema::default())
}

#[test]
fn test_load_normalizes_headers_and_skips_blank_rows() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "history.csv", HISTORY_CSV);
    let source = CachedDataset::from_config(&config.dataset);

    assert!(!source.is_loaded());
    let dataset = source.dataset().unwrap();
    assert!(source.is_loaded());

    assert_eq!(
        dataset.columns(),
        &[
            "final_location",
            "year",
            "flat_-_weighted_average_rate",
            "total_sales_-_igr"
        ]
    );
    assert_eq!(dataset.len(), 7);
    assert_eq!(dataset.rows()[2][2], CellValue::Empty);
    assert_eq!(dataset.rows()[1][2], CellValue::Float(7200.5));

    // The cached table is shared, not reloaded.
    let again = source.dataset().unwrap();
    assert!(Arc::ptr_eq(&dataset, &again));
}

#[tokio::test]
async fn test_workbook_dataset_answers_questions() {
    use rust_xlsxwriter::Workbook;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample_data.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let rows: [(&str, f64, f64, f64); 3] = [
        ("Wakad", 2021.0, 150.0, 80.0),
        ("Wakad", 2020.0, 100.0, 90.0),
        ("Aundh", 2021.0, 210.0, 40.0),
    ];
    for (col, header) in ["Final Location", "Year", "Flat Weighted Avg Rate", "Total Sales"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (location, year, price, demand)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *location).unwrap();
        sheet.write_number(row, 1, *year).unwrap();
        sheet.write_number(row, 2, *price).unwrap();
        sheet.write_number(row, 3, *demand).unwrap();
    }
    workbook.save(&path).unwrap();

    let mut config = Config::default();
    config.dataset.path = path.to_string_lossy().to_string();
    let source = CachedDataset::from_config(&config.dataset);
    assert_eq!(source.path(), path.as_path());

    let dataset = source.dataset().unwrap();
    // Workbook numbers arrive as floats.
    assert_eq!(dataset.rows()[0][1], CellValue::Float(2021.0));

    let Outcome::Answer(result) = engine().analyze("Wakad", &dataset).await else {
        panic!("expected an answer");
    };
    assert_eq!(
        result.summary,
        "Analysis for Wakad from 2020 to 2021: \
         • Prices have increased from 100 to 150. \
         • Demand has decreased from 90 to 80."
    );
    assert_eq!(
        result.chart_data.labels,
        vec![CellValue::Float(2020.0), CellValue::Float(2021.0)]
    );

    let Outcome::Answer(result) = engine().analyze("Wakad vs Aundh", &dataset).await else {
        panic!("expected an answer");
    };
    assert_eq!(result.summary, "Wakad: ~150 | Aundh: ~210");
}

#[test]
fn test_tab_separated_file() {
    let dir = TempDir::new().unwrap();
    let config = config_for(
        &dir,
        "history.tsv",
        "final_location\tyear\nBaner\t2020\nAundh\t2021\n",
    );
    let dataset = CachedDataset::from_config(&config.dataset).dataset().unwrap();
    assert_eq!(dataset.distinct_values("final_location"), vec!["Baner", "Aundh"]);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "history.json", "[]");

    let err = CachedDataset::from_config(&config.dataset).dataset().unwrap_err();
    assert!(matches!(
        err,
        RealtyError::Dataset(DatasetError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_custom_column_names() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, "history.csv", "Locality,Period\nBaner,2020\n");
    config.dataset.location_column = "Locality".to_string();
    config.dataset.year_column = "Period".to_string();

    let schema = DatasetSchema::from_config(&config.dataset);
    assert_eq!(schema.location_column, "locality");
    assert_eq!(schema.year_column, "period");
    assert!(CachedDataset::from_config(&config.dataset).dataset().is_ok());
}

#[tokio::test]
async fn test_price_growth_over_loaded_history() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "history.csv", HISTORY_CSV);
    let dataset = CachedDataset::from_config(&config.dataset).dataset().unwrap();

    let outcome = engine()
        .analyze("Show price growth for Baner", &dataset)
        .await;
    let Outcome::Answer(result) = outcome else {
        panic!("expected an answer");
    };

    assert_eq!(result.query_type, QueryIntent::PriceGrowth);
    // Last four years; the missing 2020 price is marked, not dropped.
    assert_eq!(
        result.summary,
        "Price growth for Baner: 2020: n/a, 2021: 7800, 2022: 8100, 2023: 8300"
    );

    // The missing price stays a gap in the chart.
    let prices = &result.chart_data.datasets[0];
    assert_eq!(prices.data.len(), 6);
    assert_eq!(prices.data[2], None);
}

#[tokio::test]
async fn test_single_area_skips_missing_endpoints() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, "history.csv", HISTORY_CSV);
    let dataset = CachedDataset::from_config(&config.dataset).dataset().unwrap();

    let Outcome::Answer(result) = engine().analyze("baner", &dataset).await else {
        panic!("expected an answer");
    };

    assert_eq!(
        result.summary,
        "Analysis for Baner from 2018 to 2023: \
         • Prices have increased from 7000 to 8300. \
         • Demand has increased from 300 to 360."
    );
}
