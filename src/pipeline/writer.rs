//! CSV output
//!
//! Sorts canonical records and writes them with the fixed column schema.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::CanonicalRecord;

/// Output columns, in order
pub const COLUMNS: [&str; 11] = [
    "fdc_id",
    "alt_name",
    "description",
    "weight_g",
    "volume_ml",
    "calories_kcal",
    "fat_g",
    "carbs_g",
    "fiber_g",
    "sugars_g",
    "protein_g",
];

/// Sort by description (byte order), then by FDC id
pub fn sort_records(records: &mut [CanonicalRecord]) {
    records.sort_by(|a, b| {
        a.description()
            .cmp(b.description())
            .then_with(|| a.fdc_id().cmp(&b.fdc_id()))
    });
}

/// Sort `records` and write them as CSV, returning the number of bytes written
pub fn write_csv<W: Write>(records: &mut [CanonicalRecord], writer: W) -> Result<u64> {
    sort_records(records);

    let mut csv_writer = csv::Writer::from_writer(CountingWriter::new(writer));
    csv_writer.write_record(COLUMNS)?;
    for record in records.iter() {
        csv_writer.write_record(&csv_row(record))?;
    }
    csv_writer.flush()?;

    let counter = csv_writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    Ok(counter.bytes_written())
}

/// Cell values for one record; absent values become empty cells
pub fn csv_row(record: &CanonicalRecord) -> [String; 11] {
    let m = record.measurements();
    [
        record.fdc_id().to_string(),
        record.alt_name().unwrap_or_default().to_string(),
        record.description().to_string(),
        format_amount(m.weight_g),
        format_amount(m.volume_ml),
        format_amount(m.calories_kcal),
        format_amount(m.fat_g),
        format_amount(m.carbs_g),
        format_amount(m.fiber_g),
        format_amount(m.sugars_g),
        format_amount(m.protein_g),
    ]
}

/// Shortest decimal form: `0`, `1.5`, `236.6`; empty when absent
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Where the CSV goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Destination::File(path),
            None => Destination::Stdout,
        }
    }

    /// Sort and write `records`, returning the number of bytes written
    pub fn write(&self, records: &mut [CanonicalRecord]) -> Result<u64> {
        match self {
            Destination::Stdout => {
                let stdout = io::stdout();
                write_csv(records, stdout.lock())
            }
            Destination::File(path) => {
                let file = File::create(path).map_err(|source| Error::Write {
                    path: path.clone(),
                    source,
                })?;
                write_csv(records, BufWriter::new(file)).map_err(|e| match e {
                    Error::Io(source) => Error::Write {
                        path: path.clone(),
                        source,
                    },
                    other => other,
                })
            }
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write adapter that counts bytes passed through
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.count
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdc::SchemaVariant;
    use crate::models::Measurements;

    fn record(fdc_id: i64, description: &str, alt_name: Option<&str>) -> CanonicalRecord {
        CanonicalRecord::new(
            fdc_id,
            description.to_string(),
            alt_name.map(str::to_string),
            Measurements {
                weight_g: Some(100.0),
                calories_kcal: Some(27.0),
                fat_g: Some(0.0),
                protein_g: Some(0.8),
                ..Measurements::default()
            },
            SchemaVariant::Foundation,
        )
    }

    fn render(records: &mut [CanonicalRecord]) -> (String, u64) {
        let mut out = Vec::new();
        let bytes = write_csv(records, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), bytes)
    }

    #[test]
    fn test_header_and_row() {
        let mut records = vec![record(321360, "Tomatoes, grape, raw", Some("grape tomatoes"))];
        let (text, bytes) = render(&mut records);
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("fdc_id,alt_name,description,weight_g,volume_ml,calories_kcal,fat_g,carbs_g,fiber_g,sugars_g,protein_g")
        );
        assert_eq!(
            lines.next(),
            Some("321360,grape tomatoes,\"Tomatoes, grape, raw\",100,,27,0,,,,0.8")
        );
        assert_eq!(bytes, text.len() as u64);
    }

    #[test]
    fn test_zero_and_missing_are_distinct() {
        assert_eq!(format_amount(Some(0.0)), "0");
        assert_eq!(format_amount(None), "");
        assert_eq!(format_amount(Some(236.6)), "236.6");
    }

    #[test]
    fn test_sorted_by_description_then_id() {
        let mut records = vec![
            record(5, "banana", None),
            record(9, "apple", None),
            record(2, "apple", None),
            record(1, "Zucchini", None),
        ];
        sort_records(&mut records);
        let order: Vec<(i64, &str)> = records.iter().map(|r| (r.fdc_id(), r.description())).collect();
        assert_eq!(order, vec![(1, "Zucchini"), (2, "apple"), (9, "apple"), (5, "banana")]);
    }

    #[test]
    fn test_every_row_has_eleven_columns() {
        let mut records = vec![
            record(1, "Milk, \"whole\"", None),
            record(2, "Salt,\ntable", Some("salt, table")),
        ];
        let (text, _) = render(&mut records);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        assert_eq!(reader.headers().unwrap().len(), 11);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), 11);
        }
        assert_eq!(&rows[0][2], "Milk, \"whole\"");
        assert_eq!(&rows[1][1], "salt, table");
    }

    #[test]
    fn test_write_to_file_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let destination = Destination::from_option(Some(path.clone()));

        let bytes = destination.write(&mut [record(1, "apple", None)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(bytes, text.len() as u64);
        assert!(text.ends_with("1,,apple,100,,27,0,,,,0.8\n"));
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::from_option(None).to_string(), "<stdout>");
    }
}
