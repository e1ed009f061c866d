//! The fetch pipeline: login, payment enumeration, reimbursement details.

use tracing::info;

use crate::login::login;
use crate::payments::list_payments;
use crate::reimbursements::fetch_reimbursements;
use crate::{Bill, Credentials, Portal, Result};

/// Runs one full pass against the portal and returns the fetched bills.
///
/// The stages run strictly in sequence and each one hands its output to the
/// next: the authenticated session lives on the portal's cookie jar, the
/// payment index flows from the listing scrape into the detail fetch, and
/// the bills come back to the caller. A failure at any stage is terminal
/// for the run; no partial bill set is returned.
pub async fn fetch_bills(portal: &Portal, credentials: &Credentials) -> Result<Vec<Bill>> {
    login(portal, credentials).await?;
    let payments = list_payments(portal).await?;
    let bills = fetch_reimbursements(portal, &payments).await?;
    info!(
        "fetched {} bills from {} payments",
        bills.len(),
        payments.len()
    );
    Ok(bills)
}
