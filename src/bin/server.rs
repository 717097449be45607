use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use receipt_steward::{
    AppConfig, AppState, GoogleAuthenticator, GoogleDriveStore, GoogleSheetsStore,
    TransactionCoordinator, build_router, graceful_shutdown, load_service_account_key,
};

/// The web server for receipt_steward.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the JSON configuration listing users and categories.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Could not load the configuration: {error}");
            std::process::exit(1);
        }
    };

    // A missing key is fatal: without credentials every remote call would
    // fail, so surface the setup instructions and stop.
    let key = match load_service_account_key() {
        Ok(key) => key,
        Err(error) => {
            tracing::error!("{error}");
            std::process::exit(1);
        }
    };

    let http = reqwest::Client::new();
    let auth = Arc::new(GoogleAuthenticator::new(http.clone(), key));
    let sheets = Arc::new(GoogleSheetsStore::new(http.clone(), auth.clone()));
    let files = Arc::new(GoogleDriveStore::new(http, auth));
    let coordinator = TransactionCoordinator::new(sheets, files);

    let state = AppState::new(config, coordinator);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
