use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{Address, DonationRecord, DonationStatus, GeoPoint, Organization, OrganizationId};

#[derive(Debug)]
pub enum DataImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for DataImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataImportError::Io(err) => write!(f, "failed to read import file: {}", err),
            DataImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            DataImportError::InvalidRow { line, reason } => {
                write!(f, "invalid row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for DataImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataImportError::Io(err) => Some(err),
            DataImportError::Csv(err) => Some(err),
            DataImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for DataImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DataImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads organizations and donation history from CSV exports.
pub struct MatchingDataImporter;

impl MatchingDataImporter {
    pub fn organizations_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Organization>, DataImportError> {
        let file = std::fs::File::open(path)?;
        Self::organizations_from_reader(file)
    }

    /// Columns: `id,name,email,phone,street,city,district,state,pincode,lat,lng`.
    ///
    /// A row needs both `lat` and `lng` to carry a location.
    pub fn organizations_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Organization>, DataImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut organizations = Vec::new();

        for (index, record) in csv_reader.deserialize::<OrganizationRow>().enumerate() {
            let row = record?;
            let line = index as u64 + 2;
            if row.name.is_empty() {
                return Err(DataImportError::InvalidRow {
                    line,
                    reason: "organization name is empty".to_string(),
                });
            }
            organizations.push(row.into_organization(line)?);
        }

        Ok(organizations)
    }

    pub fn history_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<DonationRecord>, DataImportError> {
        let file = std::fs::File::open(path)?;
        Self::history_from_reader(file)
    }

    /// Columns: `organization,date,status`. A blank status reads as pending.
    pub fn history_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<DonationRecord>, DataImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut history = Vec::new();

        for (index, record) in csv_reader.deserialize::<HistoryRow>().enumerate() {
            let row = record?;
            let line = index as u64 + 2;

            let recorded_at = parse_datetime(&row.date).ok_or_else(|| {
                DataImportError::InvalidRow {
                    line,
                    reason: format!("unrecognized date '{}'", row.date),
                }
            })?;
            let status = match row.status.as_deref() {
                None => DonationStatus::Pending,
                Some(value) => {
                    DonationStatus::parse(value).ok_or_else(|| DataImportError::InvalidRow {
                        line,
                        reason: format!("unknown status '{}'", value),
                    })?
                }
            };

            history.push(DonationRecord {
                organization: row.organization,
                recorded_at,
                status,
            });
        }

        Ok(history)
    }
}

#[derive(Debug, Deserialize)]
struct OrganizationRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    district: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    pincode: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lat: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lng: Option<String>,
}

impl OrganizationRow {
    fn into_organization(self, line: u64) -> Result<Organization, DataImportError> {
        let location = match (self.lat.as_deref(), self.lng.as_deref()) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(
                parse_coordinate(lat, line)?,
                parse_coordinate(lng, line)?,
            )),
            _ => None,
        };

        Ok(Organization {
            id: OrganizationId(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            location,
            address: Address {
                street: self.street,
                city: self.city,
                district: self.district,
                state: self.state,
                pincode: self.pincode,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    organization: String,
    date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

fn parse_coordinate(value: &str, line: u64) -> Result<f64, DataImportError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| DataImportError::InvalidRow {
            line,
            reason: format!("invalid coordinate '{}'", value),
        })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
