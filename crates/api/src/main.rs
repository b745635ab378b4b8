//! MediBook - hospital appointment service
//!
//! `medibook serve` runs the API; `medibook grant-admin <uid> [true|false]`
//! grants or revokes the admin claim on an account.

use std::sync::Arc;

use medibook_api::{routes, AppContext};
use medibook_core::CredentialStore;
use medibook_domain::MedibookError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env file found"),
    }

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("grant-admin") => grant_admin(&args).await,
        Some("serve") | None => serve().await,
        Some(other) => {
            anyhow::bail!("unknown command '{other}'; usage: medibook [serve | grant-admin <uid> [true|false]]")
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = medibook_infra::config::load()?;
    let bind_addr = config.server.bind_addr.clone();
    let reminders_enabled = config.reminders.enabled;

    let ctx = Arc::new(AppContext::new(config)?);

    let mut scheduler = ctx.reminder_scheduler();
    if reminders_enabled {
        scheduler.start().await.map_err(MedibookError::from)?;
    } else {
        warn!("reminder scheduler disabled by configuration");
    }

    let app = routes::router(Arc::clone(&ctx));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "medibook api listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn grant_admin(args: &[String]) -> anyhow::Result<()> {
    let uid = args
        .get(2)
        .ok_or_else(|| anyhow::anyhow!("usage: medibook grant-admin <uid> [true|false]"))?;
    let grant = args.get(3).map(String::as_str).unwrap_or("true") == "true";

    let config = medibook_infra::config::load()?;
    let ctx = AppContext::new(config)?;
    ctx.credentials.set_admin(uid, grant).await?;

    info!(uid = %uid, admin = grant, "admin claim updated");
    Ok(())
}
