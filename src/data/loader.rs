//! CSV Data Loader Module
//! Fetches the street-tree CSV, projects the columns of interest and parses
//! typed records using Polars.

use crate::data::record::{TreeRecord, MAX_HEIGHT_RANGE};
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Public Vancouver street-tree sample used when nothing else is configured.
pub const DEFAULT_TREES_URL: &str = "https://raw.githubusercontent.com/UBC-MDS/data_viz_wrangled/main/data/Trees_data_sets/small_unique_vancouver.csv";

/// Columns consumed from the 21-column source file, in projection order.
pub const TREE_COLUMNS: [&str; 6] = [
    "species_name",
    "neighbourhood_name",
    "date_planted",
    "diameter",
    "genus_name",
    "height_range_id",
];

/// Text format of `date_planted`.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to download dataset: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Expected column '{0}' is missing from the dataset")]
    MissingColumn(String),
    #[error("Row {row}: cannot parse date '{value}' (expected YYYY/MM/DD)")]
    InvalidDate { value: String, row: usize },
    #[error("Row {row}: height range {value} is outside 0..={max}", max = MAX_HEIGHT_RANGE)]
    HeightOutOfRange { value: i64, row: usize },
}

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// Interpret a settings string: `http(s)://` is a URL, anything else a path.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            DataSource::Url(source.to_string())
        } else {
            DataSource::File(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads street-tree CSV data into typed records.
pub struct TreeLoader;

impl TreeLoader {
    /// Fetch, project and parse in one go.
    pub fn load(source: &DataSource) -> Result<Vec<TreeRecord>, LoaderError> {
        let df = match source {
            DataSource::Url(url) => Self::parse_csv(Self::fetch(url)?)?,
            DataSource::File(path) => Self::read_file(path)?,
        };
        info!("Loaded {} rows, {} columns from {}", df.height(), df.width(), source);

        let projected = Self::project(&df)?;
        let records = Self::records(&projected)?;
        debug!(
            "{} of {} records have a planting date",
            records.iter().filter(|r| r.date_planted.is_some()).count(),
            records.len()
        );
        Ok(records)
    }

    /// Download the raw CSV bytes.
    pub fn fetch(url: &str) -> Result<Vec<u8>, LoaderError> {
        info!("Downloading {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// Read a local CSV file using lazy evaluation, then collect.
    pub fn read_file(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Parse CSV text held in memory.
    pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    /// Keep only the columns of interest, in `TREE_COLUMNS` order.
    ///
    /// Fails on the first missing column rather than producing a partial frame.
    pub fn project(df: &DataFrame) -> Result<DataFrame, LoaderError> {
        for name in TREE_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }
        Ok(df.select(TREE_COLUMNS)?)
    }

    /// Convert a projected frame into typed records.
    ///
    /// Rows missing a name, diameter or height are dropped with a warning.
    /// Values that are present but malformed fail the whole load.
    pub fn records(df: &DataFrame) -> Result<Vec<TreeRecord>, LoaderError> {
        let species = df.column("species_name")?.cast(&DataType::String)?;
        let neighbourhoods = df.column("neighbourhood_name")?.cast(&DataType::String)?;
        let dates = df.column("date_planted")?.cast(&DataType::String)?;
        let diameters = df.column("diameter")?.rechunk().strict_cast(&DataType::Float64)?;
        let genera = df.column("genus_name")?.cast(&DataType::String)?;
        let heights = df.column("height_range_id")?.rechunk().strict_cast(&DataType::Int64)?;

        let species = species.str()?;
        let neighbourhoods = neighbourhoods.str()?;
        let dates = dates.str()?;
        let diameters = diameters.f64()?;
        let genera = genera.str()?;
        let heights = heights.i64()?;

        let mut records = Vec::with_capacity(df.height());
        let mut incomplete = 0;
        for row in 0..df.height() {
            let (
                Some(species_name),
                Some(genus_name),
                Some(neighbourhood_name),
                Some(diameter),
                Some(height),
            ) = (
                Self::text(species.get(row)),
                Self::text(genera.get(row)),
                Self::text(neighbourhoods.get(row)),
                diameters.get(row),
                heights.get(row),
            )
            else {
                incomplete += 1;
                continue;
            };

            let height_range_id = u8::try_from(height)
                .ok()
                .filter(|h| *h <= MAX_HEIGHT_RANGE)
                .ok_or(LoaderError::HeightOutOfRange { value: height, row })?;

            records.push(TreeRecord {
                species_name,
                genus_name,
                neighbourhood_name,
                date_planted: Self::parse_date(dates.get(row), row)?,
                diameter,
                height_range_id,
            });
        }

        if incomplete > 0 {
            warn!("Dropped {} rows with an empty name, diameter or height", incomplete);
        }
        Ok(records)
    }

    fn text(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Empty or missing dates are `None`; malformed text is an error.
    fn parse_date(value: Option<&str>, row: usize) -> Result<Option<NaiveDate>, LoaderError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Some)
                .map_err(|_| LoaderError::InvalidDate {
                    value: text.to_string(),
                    row,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &[u8] = include_bytes!("../../fixtures/sample_trees.csv");

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/trees.csv"),
            DataSource::Url("https://example.com/trees.csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/trees.csv "),
            DataSource::File(PathBuf::from("data/trees.csv"))
        );
    }

    #[test]
    fn test_sample_has_full_schema() {
        let df = TreeLoader::parse_csv(SAMPLE.to_vec()).unwrap();
        assert_eq!(df.height(), 5);
        assert_eq!(df.width(), 21);
    }

    #[test]
    fn test_projection_keeps_six_columns_in_order() {
        let df = TreeLoader::parse_csv(SAMPLE.to_vec()).unwrap();
        let projected = TreeLoader::project(&df).unwrap();

        let names: Vec<String> = projected
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, TREE_COLUMNS.to_vec());
        assert_eq!(projected.height(), 5);
    }

    #[test]
    fn test_sample_round_trip_matches_source_rows() {
        let df = TreeLoader::parse_csv(SAMPLE.to_vec()).unwrap();
        let records = TreeLoader::records(&TreeLoader::project(&df).unwrap()).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0],
            TreeRecord {
                species_name: "PLATANOIDES".to_string(),
                genus_name: "ACER".to_string(),
                neighbourhood_name: "KITSILANO".to_string(),
                date_planted: NaiveDate::from_ymd_opt(1999, 1, 13),
                diameter: 10.5,
                height_range_id: 2,
            }
        );
        assert_eq!(records[1].genus_name, "ULMUS");
        assert_eq!(records[1].date_planted, None);
        assert_eq!(records[1].diameter, 32.0);
        assert_eq!(records[1].height_range_id, 5);
        assert_eq!(records[2].neighbourhood_name, "DUNBAR-SOUTHLANDS");
        assert_eq!(records[2].date_planted, NaiveDate::from_ymd_opt(2010, 11, 2));
        assert_eq!(records[3].species_name, "SERRULATA");
        assert_eq!(records[3].date_planted, None);
        assert_eq!(records[4].genus_name, "FAGUS");
        assert_eq!(records[4].height_range_id, 8);
        assert_eq!(records[4].diameter, 41.25);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "species_name,neighbourhood_name,date_planted,diameter,genus_name\n\
                   PLATANOIDES,KITSILANO,1999/01/13,10.5,ACER\n";
        let df = TreeLoader::parse_csv(csv.as_bytes().to_vec()).unwrap();

        match TreeLoader::project(&df) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, "height_range_id"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let csv = "species_name,neighbourhood_name,date_planted,diameter,genus_name,height_range_id\n\
                   PLATANOIDES,KITSILANO,13-01-1999,10.5,ACER,2\n";
        let df = TreeLoader::parse_csv(csv.as_bytes().to_vec()).unwrap();
        let result = TreeLoader::records(&TreeLoader::project(&df).unwrap());

        assert!(matches!(result, Err(LoaderError::InvalidDate { row: 0, .. })));
    }

    #[test]
    fn test_height_out_of_range_is_rejected() {
        let csv = "species_name,neighbourhood_name,date_planted,diameter,genus_name,height_range_id\n\
                   PLATANOIDES,KITSILANO,,10.5,ACER,12\n";
        let df = TreeLoader::parse_csv(csv.as_bytes().to_vec()).unwrap();
        let result = TreeLoader::records(&TreeLoader::project(&df).unwrap());

        assert!(matches!(
            result,
            Err(LoaderError::HeightOutOfRange { value: 12, row: 0 })
        ));
    }

    fn records_from(csv: &str) -> Result<Vec<TreeRecord>, LoaderError> {
        let df = TreeLoader::parse_csv(csv.as_bytes().to_vec())?;
        TreeLoader::records(&TreeLoader::project(&df)?)
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let records = records_from(
            "species_name,neighbourhood_name,date_planted,diameter,genus_name,height_range_id\n\
             PLATANOIDES,KITSILANO,1999/01/13,10.5,ACER,2\n\
             AMERICANA,,,32,ULMUS,5\n\
             SERRULATA,RENFREW-COLLINGWOOD,,,PRUNUS,1\n\
             PALUSTRIS,DUNBAR-SOUTHLANDS,,12,QUERCUS,3\n",
        )
        .unwrap();

        let genera: Vec<&str> = records.iter().map(|r| r.genus_name.as_str()).collect();
        assert_eq!(genera, vec!["ACER", "QUERCUS"]);
        assert_eq!(records[1].date_planted, None);
    }

    #[test]
    fn test_malformed_diameter_is_rejected() {
        let result = records_from(
            "species_name,neighbourhood_name,date_planted,diameter,genus_name,height_range_id\n\
             PLATANOIDES,KITSILANO,1999/01/13,10.5,ACER,2\n\
             AMERICANA,SHAUGHNESSY,,wide,ULMUS,5\n",
        );
        assert!(matches!(result, Err(LoaderError::CsvError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE).unwrap();
        file.flush().unwrap();

        let source = DataSource::File(file.path().to_path_buf());
        let records = TreeLoader::load(&source).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[4].genus_name, "FAGUS");
    }

    #[test]
    fn test_load_missing_file() {
        let source = DataSource::File(PathBuf::from("/nonexistent/trees.csv"));
        assert!(matches!(
            TreeLoader::load(&source),
            Err(LoaderError::IoError(_))
        ));
    }
}
