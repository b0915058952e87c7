//! Backend entry-point: wires the directory service and REST endpoints.

use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::UserDirectoryService;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryUserStore;
use backend::server::{self, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let store = Arc::new(InMemoryUserStore::seeded());
    let directory = Arc::new(UserDirectoryService::new(store));
    let state = HttpState::new(directory);

    server::run(config, state).await
}
