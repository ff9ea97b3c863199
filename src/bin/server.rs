use std::{
    env::{self},
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use bookkeeper_rs::{
    AppState, ClientConfig, GoogleTokenVerifier, build_router, graceful_shutdown,
    logging_middleware,
};

/// The REST API server for bookkeeper_rs.
///
/// The cookie signing secret is read from the environment variable `SECRET`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The address to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The directory of the browser client's static files.
    #[arg(long, env = "STATIC_DIR", default_value = "static/")]
    static_dir: PathBuf,

    /// The OAuth client ID that Google ID tokens must be issued for.
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    google_client_id: String,

    /// The browser API key for Google services, passed on to the client.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "")]
    google_api_key: String,

    /// The base URL the client should send API requests to.
    #[arg(long, env = "API_URL", default_value = "")]
    api_url: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::new(args.host, args.port);

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let client_config = ClientConfig {
        google_api_key: args.google_api_key,
        google_client_id: args.google_client_id.clone(),
        api_url: args.api_url,
    };
    let token_verifier = Arc::new(GoogleTokenVerifier::new(&args.google_client_id));
    let app_state = AppState::new(conn, &secret, client_config, token_verifier)
        .expect("Could not initialize the database.")
        .with_static_dir(args.static_dir);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(stdout_filter))
        .with(debug_log.with_filter(filter::LevelFilter::DEBUG))
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
