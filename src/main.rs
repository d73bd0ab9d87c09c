use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod agent;
mod booking_client;
mod db;
mod handlers;
mod mailer_client;
mod middleware;
mod models;
mod openai_client;

// AppState holds the database pool, the conversation agent, and the store
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub agent: agent::concierge_agent::ConciergeAgent,
    pub conversations: agent::conversation_store::ConversationStore,
    pub mailer_configured: bool,
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    // Create the database connection pool
    let db_pool = db::create_pool()
        .await
        .expect("Failed to create database pool.");

    let conversations = agent::conversation_store::ConversationStore::new(db_pool.clone());
    conversations
        .initialize_schema()
        .await
        .expect("Failed to initialize conversation schema.");

    // The LLM key is the one hard requirement; the service cannot chat without it
    let api_key =
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");
    let mut llm_client = openai_client::OpenAiClient::new(api_key);
    if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
        llm_client = llm_client.with_base_url(base_url);
    }
    if let Ok(model) = std::env::var("CHAT_MODEL") {
        llm_client = llm_client.with_model(model);
    }
    tracing::info!("Chat model: {}", llm_client.model());

    let booking_api_url = std::env::var("BOOKING_API_URL")
        .unwrap_or_else(|_| booking_client::DEFAULT_BOOKING_API_URL.to_string());
    tracing::info!("Booking service: {}", booking_api_url);
    let booking = booking_client::BookingClient::new(booking_api_url);

    // Initialize the mailer if credentials are provided
    let mailer = match (
        std::env::var("RESEND_API_KEY").ok(),
        std::env::var("MAIL_FROM").ok(),
    ) {
        (Some(api_key), Some(from)) if !api_key.is_empty() => {
            tracing::info!("Initializing mail client (from: {})...", from);
            Some(mailer_client::MailerClient::new(api_key, from))
        }
        _ => {
            tracing::warn!("RESEND_API_KEY / MAIL_FROM not found. Booking confirmation emails will be skipped.");
            None
        }
    };
    let mailer_configured = mailer.is_some();

    let toolkit = agent::tool_executor::BookingToolkit::new(booking, mailer);
    let transcripts = agent::transcript::TranscriptStore::new();
    let concierge = agent::concierge_agent::ConciergeAgent::new(llm_client, toolkit, transcripts);

    // Create the shared state
    let shared_state = Arc::new(AppState {
        db_pool,
        agent: concierge,
        conversations,
        mailer_configured,
    });

    // Build our application with all routes and shared state
    let app = Router::new()
        .merge(handlers::chat::chat_routes())
        .merge(handlers::status::status_routes())
        .layer(axum::middleware::from_fn(
            middleware::logging::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind listener");
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Server error");
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,hotel_concierge=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,hotel_concierge=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("🏨 Hotel concierge starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    let model_configured = std::env::var("OPENAI_API_KEY").is_ok();
    let mailer_configured = std::env::var("RESEND_API_KEY").is_ok();
    let db_configured = std::env::var("DATABASE_URL").is_ok();

    tracing::info!(
        "Configuration - Database: {}, Model: {}, Mailer: {}",
        if db_configured { "✅" } else { "❌ (default sqlite)" },
        if model_configured { "✅" } else { "❌" },
        if mailer_configured { "✅" } else { "❌" }
    );

    Ok(())
}
