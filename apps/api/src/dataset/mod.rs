//! Business dataset: the static table of candidate companies scored against ICPs.
//!
//! Rows are read as raw bytes and bound to [`BusinessRecord`] fields by column
//! header. Columns missing from the file (or cells missing from a short row)
//! become the empty string, unknown columns are ignored, a repeated header keeps
//! its last column, and cells that are not valid UTF-8 are decoded lossily.

pub mod loader;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::ByteRecord;
use thiserror::Error;

/// The loaded dataset. Shared read-only for the lifetime of the process.
pub type Dataset = Vec<BusinessRecord>;

/// One row of the business dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessRecord {
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub mailing_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub sales_volume: String,
    pub employees: String,
    pub public_private: String,
    pub location_type: String,
    /// Industry classifier used by the scorer.
    pub sic_name: String,
    pub sic: String,
    pub naics: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub web: String,
}

/// Dataset columns, in the order of `COLUMN_HEADERS`.
#[derive(Debug, Clone, Copy)]
enum Column {
    BusinessName,
    Email,
    Phone,
    MailingAddress,
    City,
    State,
    Zip,
    SalesVolume,
    Employees,
    PublicPrivate,
    LocationType,
    SicName,
    Sic,
    Naics,
    FirstName,
    LastName,
    Title,
    Web,
}

const COLUMN_COUNT: usize = 18;

const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "BUSINESS NAME",
    "EMAIL",
    "AREA CODE AND PHONE",
    "MAILING ADDRESS",
    "MAILING CITY",
    "MAILING STATE",
    "MAILING ZIP",
    "SALES VOLUME",
    "NUMBER OF EMPLOYEES",
    "PUBLIC PRIVATE COMPANY",
    "LOCATION TYPE",
    "SIC NAME1",
    "SIC",
    "NAICS",
    "FIRSTNAME",
    "LASTNAME",
    "TITLE",
    "WEB ADDRESS",
];

/// Position of each known column in the file, resolved once from the header row.
struct ColumnIndex([Option<usize>; COLUMN_COUNT]);

impl ColumnIndex {
    fn resolve(headers: &ByteRecord) -> Self {
        let mut positions = [None; COLUMN_COUNT];
        for (position, header) in headers.iter().enumerate() {
            let header = String::from_utf8_lossy(header);
            if let Some(column) = COLUMN_HEADERS.iter().position(|h| *h == header.trim()) {
                // Later duplicates overwrite earlier ones.
                positions[column] = Some(position);
            }
        }
        Self(positions)
    }

    fn cell(&self, row: &ByteRecord, column: Column) -> String {
        self.0[column as usize]
            .and_then(|position| row.get(position))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    fn record(&self, row: &ByteRecord) -> BusinessRecord {
        BusinessRecord {
            business_name: self.cell(row, Column::BusinessName),
            email: self.cell(row, Column::Email),
            phone: self.cell(row, Column::Phone),
            mailing_address: self.cell(row, Column::MailingAddress),
            city: self.cell(row, Column::City),
            state: self.cell(row, Column::State),
            zip: self.cell(row, Column::Zip),
            sales_volume: self.cell(row, Column::SalesVolume),
            employees: self.cell(row, Column::Employees),
            public_private: self.cell(row, Column::PublicPrivate),
            location_type: self.cell(row, Column::LocationType),
            sic_name: self.cell(row, Column::SicName),
            sic: self.cell(row, Column::Sic),
            naics: self.cell(row, Column::Naics),
            first_name: self.cell(row, Column::FirstName),
            last_name: self.cell(row, Column::LastName),
            title: self.cell(row, Column::Title),
            web: self.cell(row, Column::Web),
        }
    }
}

/// Failure to bring the dataset into memory.
///
/// Cloneable: one failed load is handed to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum DatasetLoadError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("malformed dataset {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("dataset {} has no header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("dataset load task failed: {0}")]
    Task(String),
}

/// Parses CSV bytes into records. The first row is the header.
///
/// Only unreadable CSV structure fails the load; cell content never does.
pub fn parse_records(path: &Path, bytes: &[u8]) -> Result<Dataset, DatasetLoadError> {
    let parse_error = |e: csv::Error| DatasetLoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.byte_headers().map_err(parse_error)?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetLoadError::MissingHeader {
            path: path.to_path_buf(),
        });
    }
    let columns = ColumnIndex::resolve(headers);

    let mut dataset = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row).map_err(parse_error)? {
        dataset.push(columns.record(&row));
    }
    Ok(dataset)
}
