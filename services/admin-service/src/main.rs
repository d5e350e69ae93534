use admin_service::config::load_config;
use admin_service::users::{hash_password, UserDirectory};
use admin_service::{build_router, AppState};
use anyhow::{anyhow, Result};
use std::env;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // `admin-service hash-password <password>` prints a hash for the users file.
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(command) = args.first() {
        return match (command.as_str(), args.get(1)) {
            ("hash-password", Some(password)) => {
                println!("{}", hash_password(password)?);
                Ok(())
            }
            _ => Err(anyhow!("usage: admin-service [hash-password <password>]")),
        };
    }

    let config = load_config()?;
    let users = match &config.users_file {
        Some(path) => UserDirectory::from_json_file(path)?,
        None => UserDirectory::default(),
    };
    let state = AppState::from_config(&config, users)?;
    let app = build_router(state);

    let addr = config.listen_addr();
    info!(%addr, "starting admin-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
