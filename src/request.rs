use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder};

use crate::{Result, BASE_URL, LISTING_PATH, PORTLET_ID, USER_AGENT};

/// Handle on the portal: the base URL plus the HTTP client that holds the
/// session cookies. Built once per run and shared by every stage; the cookie
/// jar must not be reused across concurrent unrelated runs.
#[derive(Debug, Clone)]
pub struct Portal {
    base_url: String,
    client: Client,
}

impl Portal {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Points the portal at a different host. Used for testing.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub(crate) fn listing_url(&self) -> String {
        format!("{}/{LISTING_PATH}", self.base_url)
    }

    /// GET request for the detail of one payment: the listing URL routed
    /// through the reimbursement portlet with the `detailPaiement` action.
    pub(crate) fn detail_request(&self, counter: &str, num_paiement: &str) -> RequestBuilder {
        self.client.get(self.listing_url()).query(&[
            ("p_p_id", PORTLET_ID),
            ("p_p_lifecycle", "2"),
            ("p_p_state", "normal"),
            ("p_p_mode", "view"),
            ("p_p_cacheability", "cacheLevelPage"),
            ("p_p_col_id", "column-2"),
            ("p_p_col_pos", "1"),
            ("p_p_col_count", "3"),
            (
                "_mhmRemboursement_WAR_mhmportalapplication_action",
                "detailPaiement",
            ),
            ("counter", counter),
            ("numPaiement", num_paiement),
        ])
    }
}
