use std::collections::BTreeMap;

use scraper::Html;
use tracing::info;

use crate::request::Portal;
use crate::{create_selector, Error, Result};

/// Mapping from listing-row counter to portal payment identifier. Built from
/// the listing page, consumed by the detail fetch, never persisted.
pub type PaymentIndex = BTreeMap<String, String>;

/// Scrapes the reimbursement listing page for payment rows. Every magnifier
/// icon carries an inline `onclick` handler whose arguments identify the
/// payment; icons without a handler are skipped. An empty index is valid.
pub(crate) async fn list_payments(portal: &Portal) -> Result<PaymentIndex> {
    let body = portal
        .client()
        .get(portal.listing_url())
        .send()
        .await?
        .text()
        .await?;
    let index = parse_payment_list(&body)?;
    info!("found {} payments on the listing page", index.len());
    Ok(index)
}

fn parse_payment_list(html: &str) -> Result<PaymentIndex> {
    let doc = Html::parse_document(html);
    let loupe_selector = create_selector("img.loupe")?;

    let mut index = PaymentIndex::new();
    for img in doc.select(&loupe_selector) {
        let Some(onclick) = img.value().attr("onclick") else {
            continue;
        };
        let (counter, num_paiement) = parse_detail_handler(onclick)?;
        index.insert(counter.to_string(), num_paiement.to_string());
    }
    Ok(index)
}

/// Pulls (counter, payment id) out of the inline detail handler. The handler
/// passes both as its single-quoted arguments, e.g.
/// `detailPaiement('12','P202103180042')`, which makes them the 2nd and 4th
/// quote-delimited tokens. Anything shorter than that is an error rather
/// than an out-of-bounds index.
fn parse_detail_handler(onclick: &str) -> Result<(&str, &str)> {
    let mut tokens = onclick.split('\'');
    let counter = tokens.nth(1);
    let num_paiement = tokens.nth(1);
    match (counter, num_paiement) {
        (Some(counter), Some(num_paiement)) => Ok((counter, num_paiement)),
        _ => Err(Error::PaymentHandler(onclick.to_string())),
    }
}
