use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::ViewError;
use crate::record::{Field, Record, Screenings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileType {
    JSON,
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// Either the screenings envelope or a bare list of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Envelope(Screenings),
    Records(Vec<Record>),
}

/// A column of a tabular file, every value rendered as text.
struct Column {
    name: String,
    data: Vec<String>,
}

/// Reads every record of a screenings file.
pub fn load_records(path: PathBuf) -> Result<Vec<Record>, ViewError> {
    let file_info = get_file_info(path)?;
    debug!("Loading {:?}", file_info);
    let start_time = Instant::now();

    let records = match file_info.file_type {
        FileType::JSON => parse_json(&fs::read_to_string(&file_info.path)?)?,
        FileType::CSV => records_from_frame(load_csv(&file_info.path)?)?,
        FileType::PARQUET => records_from_frame(load_parquet(&file_info.path)?)?,
        FileType::ARROW => records_from_frame(load_arrow(&file_info.path)?)?,
    };

    let data_loading_duration = start_time.elapsed().as_millis();
    info!(
        "Loaded {} records from {} ({} bytes) in {data_loading_duration}ms",
        records.len(),
        file_info.path.display(),
        file_info.file_size,
    );
    Ok(records)
}

pub fn parse_json(content: &str) -> Result<Vec<Record>, ViewError> {
    Ok(match serde_json::from_str::<JsonPayload>(content)? {
        JsonPayload::Envelope(s) => s.results,
        JsonPayload::Records(r) => r,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, ViewError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("JSON") => Ok(FileType::JSON),
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(ViewError::UnknownFileType),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, ViewError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ViewError::FileNotFound,
        ErrorKind::PermissionDenied => ViewError::PermissionDenied,
        _ => ViewError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(ViewError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Column, PolarsError> {
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let data = series
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect();

    Ok(Column {
        name: col_name.to_string(),
        data,
    })
}

// Only the record columns are converted, each one on its own rayon worker.
fn records_from_frame(frame: LazyFrame) -> Result<Vec<Record>, ViewError> {
    let df = frame.collect()?;
    let available: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    for field in Field::ALL {
        if !available.iter().any(|n| n == field.as_str()) {
            return Err(ViewError::LoadingFailed(format!("missing column `{field}`")));
        }
    }

    let columns: Result<Vec<Column>, PolarsError> = Field::ALL
        .par_iter()
        .map(|field| load_column(&df, field.as_str()))
        .collect();
    let columns = columns?;
    for c in columns.iter() {
        debug!("Column {:?}: {} rows", c.name, c.data.len());
    }

    let [name, created, modified, severity] = <[Column; 4]>::try_from(columns)
        .map_err(|_| ViewError::LoadingFailed("unexpected column count".into()))?;

    Ok(name
        .data
        .into_iter()
        .zip(created.data)
        .zip(modified.data)
        .zip(severity.data)
        .map(|(((name, created), modified), severity)| Record::new(name, created, modified, severity))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_file_types() {
        assert_eq!(detect_file_type(Path::new("a.json")).unwrap(), FileType::JSON);
        assert_eq!(detect_file_type(Path::new("a.CSV")).unwrap(), FileType::CSV);
        assert_eq!(detect_file_type(Path::new("a.pq")).unwrap(), FileType::PARQUET);
        assert_eq!(detect_file_type(Path::new("a.feather")).unwrap(), FileType::ARROW);
        assert!(matches!(detect_file_type(Path::new("a.txt")), Err(ViewError::UnknownFileType)));
        assert!(matches!(detect_file_type(Path::new("noext")), Err(ViewError::UnknownFileType)));
    }

    #[test]
    fn json_envelope_and_bare_list() {
        let item = r#"{"name": "a", "created": "2016-07-19T10:01:51Z",
            "modified": "2016-07-19T10:01:51Z", "country_check_severity": "60-OK"}"#;
        let envelope = format!(r#"{{"count": 1, "results": [{item}]}}"#);
        let bare = format!("[{item}]");
        assert_eq!(parse_json(&envelope).unwrap(), parse_json(&bare).unwrap());
        assert!(matches!(parse_json("{\"results\": 3}"), Err(ViewError::JsonError(_))));
    }

    #[test]
    fn missing_file() {
        let err = load_records(PathBuf::from("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ViewError::FileNotFound));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ViewError::LoadingFailed(_)));
    }

    #[test]
    fn loads_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,created,modified,country_check_severity").unwrap();
        writeln!(file, "1,Alpha,2016-07-19T10:01:51Z,2016-07-20T10:01:51Z,60-OK").unwrap();
        writeln!(file, "2,Beta,2016-07-18T10:01:51Z,2016-07-21T10:01:51Z,90-CRITICAL").unwrap();
        file.flush().unwrap();

        let records = load_records(file.path().to_path_buf()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Beta");
        assert_eq!(records[1].country_check_severity, "90-CRITICAL");
    }

    #[test]
    fn csv_without_record_columns_fails() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,created").unwrap();
        writeln!(file, "Alpha,2016-07-19T10:01:51Z").unwrap();
        file.flush().unwrap();

        let err = load_records(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ViewError::LoadingFailed(_)));
    }

    #[test]
    fn loads_fixture() {
        let records = load_records(PathBuf::from("tests/fixtures/screenings.json")).unwrap();
        assert_eq!(records.len(), 21);
    }
}
