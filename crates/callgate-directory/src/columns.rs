//! Header matching and row conversion for the roster sheet.

use crate::error::DirectoryError;
use crate::xlsx::Row;
use callgate_types::ContactRecord;

/// Roster fields recognised in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    Name,
    DbaName,
    McNumber,
    Address,
    Fax,
    Email,
    Operation,
    DriverCount,
    Equipment,
}

/// Header aliases, compared after [`normalize_header`].
const ALIASES: &[(Field, &[&str])] = &[
    (
        Field::Phone,
        &["phone", "phonenumber", "phoneno", "telephone", "contactnumber"],
    ),
    (
        Field::Name,
        &["name", "legalname", "carriername", "companyname", "drivername"],
    ),
    (Field::DbaName, &["dba", "dbaname", "doingbusinessas"]),
    (
        Field::McNumber,
        &["mc", "mcnumber", "mcno", "usdot", "dot", "dotnumber", "usdotnumber"],
    ),
    (
        Field::Address,
        &["address", "physicaladdress", "mailingaddress"],
    ),
    (Field::Fax, &["fax", "faxnumber"]),
    (Field::Email, &["email", "emailaddress", "mail"]),
    (
        Field::Operation,
        &["operation", "carrieroperation", "operationtype", "carriertype"],
    ),
    (
        Field::DriverCount,
        &["drivers", "drivercount", "numberofdrivers", "totaldrivers"],
    ),
    (
        Field::Equipment,
        &["equipment", "equipmenttype", "trailertype", "truck"],
    ),
];

/// Lowercases a header and drops everything that is not a letter or digit,
/// so `"Phone #"`, `"phone_number"` and `"Phone Number"` compare equal to
/// their alias forms.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn field_for(header: &str) -> Option<Field> {
    let normalized = normalize_header(header);
    ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(field, _)| *field)
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: Vec<(Field, usize)>,
}

impl ColumnMap {
    /// Resolves columns from the header row. The first column matching a
    /// field wins; unknown headers are ignored.
    pub fn from_header(header: &Row) -> Result<Self, DirectoryError> {
        let mut columns: Vec<(Field, usize)> = Vec::new();
        for (index, cell) in header.iter().enumerate() {
            let Some(field) = cell.as_deref().and_then(field_for) else {
                continue;
            };
            if !columns.iter().any(|(known, _)| *known == field) {
                columns.push((field, index));
            }
        }

        let map = Self { columns };
        if map.position(Field::Phone).is_none() {
            return Err(DirectoryError::MissingPhoneColumn);
        }
        Ok(map)
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|(known, _)| *known == field)
            .map(|(_, index)| *index)
    }

    fn cell<'a>(&self, row: &'a Row, field: Field) -> Option<&'a str> {
        self.position(field)
            .and_then(|index| row.get(index))
            .and_then(|cell| cell.as_deref())
    }

    /// Converts a data row. Rows without a phone number are not admitted.
    pub fn record(&self, row: &Row) -> Option<ContactRecord> {
        let phone = self.cell(row, Field::Phone)?.trim();
        if phone.is_empty() {
            return None;
        }

        Some(
            ContactRecord::builder(phone)
                .name(self.cell(row, Field::Name))
                .dba_name(self.cell(row, Field::DbaName))
                .mc_number(self.cell(row, Field::McNumber))
                .address(self.cell(row, Field::Address))
                .fax(self.cell(row, Field::Fax))
                .email(self.cell(row, Field::Email))
                .operation(self.cell(row, Field::Operation))
                .driver_count(self.cell(row, Field::DriverCount).and_then(parse_count))
                .equipment(self.cell(row, Field::Equipment))
                .build(),
        )
    }
}

/// Accepts `"4"` or `"4.0"`; anything else is treated as absent.
fn parse_count(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(count) = value.parse::<u32>() {
        return Some(count);
    }
    match value.parse::<f64>() {
        Ok(count) if count.fract() == 0.0 && count >= 0.0 && count <= f64::from(u32::MAX) => {
            Some(count as u32)
        }
        _ => None,
    }
}

/// Converts a whole sheet (header row first) into contact records.
pub fn records_from_rows(rows: &[Row]) -> Result<Vec<ContactRecord>, DirectoryError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = ColumnMap::from_header(header)?;
    Ok(data.iter().filter_map(|row| columns.record(row)).collect())
}
