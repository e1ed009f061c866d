use chrono::NaiveDate;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::info;

use crate::bill::Bill;
use crate::payments::PaymentIndex;
use crate::request::Portal;
use crate::{Error, Result};

/// Detail document the portlet serves for one payment.
#[derive(Debug, Deserialize)]
struct PaymentDetail {
    #[serde(rename = "decompteList")]
    decompte_list: Vec<Reimbursement>,
}

/// One reimbursed line item. The portal also sends the spent amount
/// (`honoraires`), the social-security share (`montantRO`) and the insured's
/// name; none of those end up on a bill.
#[derive(Debug, Deserialize)]
struct Reimbursement {
    #[serde(rename = "labelActe")]
    label_acte: String,
    #[serde(rename = "montantRC")]
    montant_rc: String,
    #[serde(rename = "dateSoin")]
    date_soin: String,
}

/// Fetches the detail of every indexed payment, all requests in flight at
/// once, and flattens the line items into bills.
///
/// The join collects every outcome before deciding: if any request failed,
/// the first error wins and no bills are returned. Tasks still in flight
/// when the `JoinSet` drops are aborted.
pub(crate) async fn fetch_reimbursements(
    portal: &Portal,
    payments: &PaymentIndex,
) -> Result<Vec<Bill>> {
    let mut task_set = JoinSet::new();
    for (counter, num_paiement) in payments {
        let request = portal.detail_request(counter, num_paiement);
        task_set.spawn(async move {
            let response = request.send().await?.error_for_status()?;
            Ok::<_, Error>(response.text().await?)
        });
    }
    info!("requested the detail of {} payments", payments.len());

    let mut documents = Vec::with_capacity(payments.len());
    let mut first_error = None;
    while let Some(outcome) = task_set.join_next().await {
        match outcome? {
            Ok(body) => documents.push(body),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    let mut bills = Vec::new();
    for document in &documents {
        bills.extend(flatten_document(document)?);
    }
    info!("flattened {} bills", bills.len());
    Ok(bills)
}

/// Parses one detail document and emits a bill per line item.
fn flatten_document(body: &str) -> Result<Vec<Bill>> {
    let detail: PaymentDetail = serde_json::from_str(body)?;
    detail
        .decompte_list
        .into_iter()
        .map(|item| {
            Ok(Bill::new(
                item.label_acte,
                parse_amount(&item.montant_rc)?,
                parse_care_date(&item.date_soin)?,
            ))
        })
        .collect()
}

/// Parses a locale-decimal amount, comma as the decimal separator.
fn parse_amount(raw: &str) -> Result<f64> {
    raw.trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| Error::Amount(raw.to_string()))
}

/// Parses a `DD/MM/YYYY` care date.
fn parse_care_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").map_err(|_| Error::Date(raw.to_string()))
}
