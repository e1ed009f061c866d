//! Harmonie Mutuelle reimbursement fetcher.
//!
//! Logs into the member portal, enumerates the reimbursement payments listed
//! on `mes-remboursements`, fetches every payment's detail concurrently and
//! flattens the line items into [`Bill`] records for the downstream
//! filter/save stages.

mod bill;
mod error;
mod login;
mod payments;
pub mod process;
mod reimbursements;
mod request;

pub use bill::{Bill, FileOptions, FILE_OPTIONS};
pub use error::{Error, Result};
pub use login::Credentials;
pub use payments::PaymentIndex;
pub use request::Portal;

const BASE_URL: &str = "https://www.harmonie-mutuelle.fr/";
const LISTING_PATH: &str = "web/mon-compte/mes-remboursements";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Fedora; Linux x86_64; rv:37.0) Gecko/20100101 Firefox/37.0";
/// Liferay portlet serving both the listing page and the payment details.
const PORTLET_ID: &str = "mhmRemboursement_WAR_mhmportalapplication";
const LOGIN_FORM_ID: &str = "_58_fm";
const LOGIN_FIELD: &str = "_58_login";
const PASSWORD_FIELD: &str = "_58_password";

#[inline]
fn create_selector(sel_str: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
