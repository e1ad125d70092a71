use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use backend_lib::{
    config,
    email::SmtpMailer,
    router,
    storage::SqliteStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration from config.toml and the OPENESTATE_* environment
    let settings = config::load_settings()?;
    let port = settings.port;

    // Open the user store; the handle is owned here and passed down,
    // there is no process-global connection
    let store = SqliteStore::new(&settings.database_url).await?;

    // Create the outbound mail transport
    let mailer = Arc::new(SmtpMailer::new(&settings));

    // Create application state
    let state = Arc::new(AppState::new(store, mailer, settings)?);

    // Create the router
    let app = router::create_router(state);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
