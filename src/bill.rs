use chrono::NaiveDate;
use serde::Serialize;

pub const VENDOR: &str = "Harmonie";

/// One reimbursed health expense, normalized for the downstream store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    pub subtype: String,
    pub vendor: &'static str,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Bill {
    pub(crate) fn new(subtype: String, amount: f64, date: NaiveDate) -> Self {
        Self {
            doc_type: "health",
            subtype,
            vendor: VENDOR,
            amount,
            date,
        }
    }
}

/// Configuration handed to the external file-saving stage together with the
/// fetched bills.
#[derive(Debug, Clone, Serialize)]
pub struct FileOptions {
    pub vendor: &'static str,
    #[serde(rename = "dateFormat")]
    pub date_format: &'static str,
    /// Name of the attachment field on saved files.
    pub attachment_field: &'static str,
}

pub const FILE_OPTIONS: FileOptions = FileOptions {
    vendor: VENDOR,
    date_format: "YYYYMMDD",
    attachment_field: "facture",
};
