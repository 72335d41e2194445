pub mod api;
pub mod cache;
pub mod census;
pub mod client;
pub mod config;
pub mod errors;
pub mod missing;
pub mod rounds;
pub mod types;

use tokio::net::TcpListener;

use crate::api::AppState;
use crate::cache::CensusCache;
use crate::client::CocClient;
use crate::config::Config;

/// Wires the client, cache, and router together and serves until shutdown.
pub async fn run(config: Config) -> Result<(), std::io::Error> {
    let state = AppState {
        client: CocClient::new(config.upstream_url, config.api_token),
        cache: CensusCache::new(),
        clan_tag: config.clan_tag,
    };
    let app = api::router(state);

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "cwl-gateway listening");
    axum::serve(listener, app).await
}
