use std::time::Instant;

use harmonie::{process::fetch_bills, Credentials, Error, Portal, Result, FILE_OPTIONS};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let credentials = credentials_from_env()?;
    let portal = Portal::new()?;

    let start_time = Instant::now();
    let bills = fetch_bills(&portal, &credentials).await?;
    info!(
        "full run took {:.2} sec",
        start_time.elapsed().as_secs_f64()
    );

    // Hand-off payload for the downstream filter/save stages.
    let payload = serde_json::json!({
        "fetched": bills,
        "fileOptions": FILE_OPTIONS,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

fn credentials_from_env() -> Result<Credentials> {
    let login = std::env::var("HARMONIE_LOGIN").map_err(|_| Error::Config("HARMONIE_LOGIN"))?;
    let password =
        std::env::var("HARMONIE_PASSWORD").map_err(|_| Error::Config("HARMONIE_PASSWORD"))?;
    Ok(Credentials { login, password })
}
