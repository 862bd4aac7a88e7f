//! Contact records loaded from the roster spreadsheet.
//!
//! A `ContactRecord` describes one carrier reachable at one phone number.
//! Every field except the phone number is optional; blank values are treated
//! as absent so that nothing empty ever reaches a composed prompt. Callers
//! that need a printable value use the `*_or_default` accessors, which
//! resolve absent fields to fixed sentinel strings.

use serde::{Deserialize, Serialize};

/// Sentinel for an absent name, DBA name, regulatory identifier, operation
/// classification or equipment description.
pub const UNKNOWN: &str = "Unknown";
/// Sentinel for an absent postal address.
pub const NO_ADDRESS: &str = "No address provided";
/// Sentinel for an absent fax number.
pub const NO_FAX: &str = "No fax provided";
/// Sentinel for an absent email address.
pub const NO_EMAIL: &str = "No email provided";

/// One entry of the contact directory, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Phone number in the form it appears in the roster. Unique key.
    pub phone_number: String,
    /// Legal or display name of the carrier.
    pub name: Option<String>,
    /// Alternate "doing business as" name.
    pub dba_name: Option<String>,
    /// Regulatory identifier (MC or USDOT number).
    pub mc_number: Option<String>,
    /// Physical postal address.
    pub address: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    /// Carrier operation classification, e.g. "Interstate".
    pub operation: Option<String>,
    pub driver_count: Option<u32>,
    /// Equipment description, e.g. "Reefer" or "Dry Van".
    pub equipment: Option<String>,
}

impl ContactRecord {
    /// Starts a record for `phone_number` with every optional field absent.
    pub fn builder(phone_number: impl Into<String>) -> ContactRecordBuilder {
        ContactRecordBuilder {
            record: ContactRecord {
                phone_number: phone_number.into().trim().to_string(),
                name: None,
                dba_name: None,
                mc_number: None,
                address: None,
                fax: None,
                email: None,
                operation: None,
                driver_count: None,
                equipment: None,
            },
        }
    }

    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn dba_name_or_default(&self) -> &str {
        self.dba_name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn mc_number_or_default(&self) -> &str {
        self.mc_number.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn address_or_default(&self) -> &str {
        self.address.as_deref().unwrap_or(NO_ADDRESS)
    }

    pub fn fax_or_default(&self) -> &str {
        self.fax.as_deref().unwrap_or(NO_FAX)
    }

    pub fn email_or_default(&self) -> &str {
        self.email.as_deref().unwrap_or(NO_EMAIL)
    }

    pub fn operation_or_default(&self) -> &str {
        self.operation.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn equipment_or_default(&self) -> &str {
        self.equipment.as_deref().unwrap_or(UNKNOWN)
    }

    /// Driver count rendered for display; `"Unknown"` when absent.
    pub fn driver_count_or_default(&self) -> String {
        self.driver_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Builder that normalizes optional fields as they are set.
///
/// Values are trimmed and blank strings are dropped, so a record built from
/// a sparse spreadsheet row never carries `Some("")`.
#[derive(Debug, Clone)]
pub struct ContactRecordBuilder {
    record: ContactRecord,
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ContactRecordBuilder {
    pub fn name(mut self, value: Option<&str>) -> Self {
        self.record.name = present(value);
        self
    }

    pub fn dba_name(mut self, value: Option<&str>) -> Self {
        self.record.dba_name = present(value);
        self
    }

    pub fn mc_number(mut self, value: Option<&str>) -> Self {
        self.record.mc_number = present(value);
        self
    }

    pub fn address(mut self, value: Option<&str>) -> Self {
        self.record.address = present(value);
        self
    }

    pub fn fax(mut self, value: Option<&str>) -> Self {
        self.record.fax = present(value);
        self
    }

    pub fn email(mut self, value: Option<&str>) -> Self {
        self.record.email = present(value);
        self
    }

    pub fn operation(mut self, value: Option<&str>) -> Self {
        self.record.operation = present(value);
        self
    }

    pub fn driver_count(mut self, value: Option<u32>) -> Self {
        self.record.driver_count = value;
        self
    }

    pub fn equipment(mut self, value: Option<&str>) -> Self {
        self.record.equipment = present(value);
        self
    }

    pub fn build(self) -> ContactRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_absent() {
        let record = ContactRecord::builder(" +15551112222 ")
            .name(Some("  "))
            .equipment(Some(" Reefer "))
            .build();

        assert_eq!(record.phone_number, "+15551112222");
        assert_eq!(record.name, None);
        assert_eq!(record.equipment.as_deref(), Some("Reefer"));
    }

    #[test]
    fn absent_fields_resolve_to_sentinels() {
        let record = ContactRecord::builder("+15551112222").build();

        assert_eq!(record.name_or_default(), "Unknown");
        assert_eq!(record.address_or_default(), "No address provided");
        assert_eq!(record.fax_or_default(), "No fax provided");
        assert_eq!(record.email_or_default(), "No email provided");
        assert_eq!(record.driver_count_or_default(), "Unknown");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = ContactRecord::builder("+15551112222")
            .dba_name(Some("Acme Hauling"))
            .driver_count(Some(4))
            .build();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["phoneNumber"], "+15551112222");
        assert_eq!(json["dbaName"], "Acme Hauling");
        assert_eq!(json["driverCount"], 4);
    }
}
