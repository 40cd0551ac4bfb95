use crate::domain::ports::GuestStore;
use crate::frameworks::{config, db};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{
    AdminSettings, AppState, InMemoryGuestStore, PostgresGuestStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Picks PostgreSQL when DATABASE_URL is set, otherwise an empty in-memory store.
async fn build_guest_store() -> Option<Arc<dyn GuestStore>> {
    let Some(database_url) = config::database_url() else {
        tracing::warn!("DATABASE_URL not set; using in-memory guest store");
        return Some(Arc::new(InMemoryGuestStore::default()));
    };

    let pool = match db::open_guest_database(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "guest database unavailable");
            return None;
        }
    };

    Some(Arc::new(PostgresGuestStore { db: pool }))
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let Some(guests) = build_guest_store().await else {
        return; // Abort startup without storage.
    };

    let admin = AdminSettings {
        password_sha256: config::admin_password_sha256(),
        session_ttl_seconds: config::admin_session_ttl_seconds(),
    };
    if admin.password_sha256.is_none() {
        tracing::warn!("ADMIN_PASSWORD_SHA256 missing or malformed; admin login disabled");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return;
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(e) = serve(listener, AppState::new(guests, admin)).await {
        tracing::error!(error = %e, "server error");
    }
}

// Serve the RSVP routes on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}
