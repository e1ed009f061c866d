use std::collections::BTreeMap;

use scraper::Html;
use tracing::info;

use crate::request::Portal;
use crate::{create_selector, Error, Result, LOGIN_FIELD, LOGIN_FORM_ID, PASSWORD_FIELD};

/// Portal credentials, supplied by the caller.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Logs into the portal: scrapes the login form off the root page, injects
/// the credentials into its fields and posts the serialized form back to the
/// form's own action URL. The cookies picked up along the way authenticate
/// every later request on the same client.
pub(crate) async fn login(portal: &Portal, credentials: &Credentials) -> Result<()> {
    let body = portal
        .client()
        .get(portal.root_url())
        .send()
        .await?
        .text()
        .await?;
    let (action_url, form_data) = serialize_login_form(&body, credentials)?;

    info!("submitting login form to {action_url}");
    let response = portal
        .client()
        .post(action_url)
        .form(&form_data)
        .send()
        .await?;

    // A rejected login serves the same form again instead of the account page.
    let body = response.text().await?;
    if contains_login_form(&body)? {
        return Err(Error::AuthenticationFailed);
    }
    info!("session established");
    Ok(())
}

/// Extracts the login form's action URL and serializes all of its named
/// inputs (hidden fields included) into a key/value map, with the credential
/// fields overwritten.
fn serialize_login_form(
    html: &str,
    credentials: &Credentials,
) -> Result<(String, BTreeMap<String, String>)> {
    let doc = Html::parse_document(html);
    let form_selector = create_selector(&format!("form#{LOGIN_FORM_ID}"))?;
    let input_selector = create_selector("input[name]")?;

    let form = doc
        .select(&form_selector)
        .next()
        .ok_or(Error::LoginFormMissing(LOGIN_FORM_ID))?;
    let action_url = form
        .value()
        .attr("action")
        .ok_or(Error::LoginFormMissing(LOGIN_FORM_ID))?;

    let mut form_data = BTreeMap::new();
    for input in form.select(&input_selector) {
        if let Some(name) = input.value().attr("name") {
            let value = input.value().attr("value").unwrap_or_default();
            form_data.insert(name.to_string(), value.to_string());
        }
    }
    form_data.insert(LOGIN_FIELD.to_string(), credentials.login.clone());
    form_data.insert(PASSWORD_FIELD.to_string(), credentials.password.clone());

    Ok((action_url.to_string(), form_data))
}

fn contains_login_form(html: &str) -> Result<bool> {
    let doc = Html::parse_document(html);
    let form_selector = create_selector(&format!("form#{LOGIN_FORM_ID}"))?;
    Ok(doc.select(&form_selector).next().is_some())
}
