//! Load reference curve points from a `Tenor,Rate` CSV file

use super::tenor::CurvePointInput;
use crate::error::StorageError;
use csv::Reader;
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Tenor")]
    tenor: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Load curve points from a CSV file
pub fn load_curve_points<P: AsRef<Path>>(path: P) -> Result<Vec<CurvePointInput>, StorageError> {
    let reader = Reader::from_path(path)?;
    read_points(reader)
}

/// Load curve points from any reader
pub fn load_curve_points_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<CurvePointInput>, StorageError> {
    read_points(Reader::from_reader(reader))
}

fn read_points<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<CurvePointInput>, StorageError> {
    let mut points = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        points.push(CurvePointInput::new(row.tenor, row.rate));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let data = "Tenor,Rate\n3M,0.0225\n1Y,0.0275\n10Y,0.037\n";
        let points = load_curve_points_from_reader(data.as_bytes()).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], CurvePointInput::new("3M", 0.0225));
        assert_eq!(points[2].tenor, "10Y");
    }

    #[test]
    fn test_bad_rate_is_csv_error() {
        let data = "Tenor,Rate\n3M,abc\n";
        assert!(matches!(
            load_curve_points_from_reader(data.as_bytes()),
            Err(StorageError::Csv(_))
        ));
    }
}
