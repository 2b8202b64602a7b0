use budget_explorer::config::Config;
use budget_explorer::handlers;
use budget_explorer::state::AppState;
use budget_explorer::store::LedgerSource;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budget_explorer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting budget explorer {} on {}",
        budget_explorer::VERSION,
        config.address()
    );

    let address = config.address();
    let state = AppState::load(config).expect("Failed to load finance data");
    tracing::info!(years = ?state.ledger.years(), "Ledger years available");

    let app = handlers::routes()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app).await.expect("Server error");
}
