use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Couldn't find the login form #{0} (or its action URL) on the portal page.")]
    LoginFormMissing(&'static str),

    #[error("Authentication rejected: the portal served the login form again.")]
    AuthenticationFailed,

    #[error("Couldn't parse the detail handler of a payment row: {0:?}")]
    PaymentHandler(String),

    #[error("Couldn't parse a reimbursed amount: {0:?}")]
    Amount(String),

    #[error("Couldn't parse a care date: {0:?}")]
    Date(String),

    #[error("Missing required configuration: {0}")]
    Config(&'static str),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
