use ooth::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn describe(user: &Option<User>) -> String {
    match user {
        Some(user) => user.to_string(),
        None => "signed out".into(),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    let client = OothClient::new(config)?;

    let _watch = client
        .user()
        .subscribe(|user| println!("session: {}", describe(user)));

    match client.start().await {
        Ok(user) => tracing::info!(user = %describe(&user), "initial status"),
        Err(e) => tracing::error!(error = %e, "status fetch failed, waiting for push updates"),
    }

    tracing::info!("watching session, press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;
    Ok(())
}
