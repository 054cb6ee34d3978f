use axum_storefront::{app, config::Config, pool::get_pool, rmq, run_migrations, state::AppState};
use listenfd::ListenFd;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()
        .inspect_err(|e| tracing::error!("Failed to load configuration: {e}"))?;

    run_migrations(config.database_url.clone()).await?;

    let pool = get_pool(&config.database_url).await?;
    let state = AppState::new(pool, config);

    rmq::client::spawn_consumer(state.config.clone());

    let bind_addr = state.config.bind_addr.clone();
    let app = app(state);

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // if we are given a tcp listener on listen fd 0, we use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // otherwise fall back to local listening
        None => TcpListener::bind(&bind_addr).await?,
    };

    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
