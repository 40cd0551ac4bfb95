// Shared primitives for one-time server bootstrapping across integration tests.
use chrono::Utc;
use rsvp_api::domain::entities::Guest;
use rsvp_api::interface_adapters::state::{AdminSettings, AppState, InMemoryGuestStore};
use rsvp_api::use_cases::admin_login::sha256_hex;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

pub const ADMIN_PASSWORD: &str = "boda2025";

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Guests every integration test can rely on; tests must not reuse each other's tokens.
fn seed_guests() -> Vec<Guest> {
    let guest = |id: i64, token: &str, first_name: &str, max_tickets: i32| Guest {
        id,
        token: token.to_string(),
        first_name: first_name.to_string(),
        last_name: "Pérez".to_string(),
        email: Some(format!("{}@example.com", first_name.to_lowercase())),
        phone: None,
        max_tickets,
        tickets_confirmed: None,
        meal: None,
        notes: None,
        created_at: Utc::now(),
    };

    vec![
        guest(1, "10000001", "Ana", 3),
        guest(2, "10000002", "Bruno", 1),
        guest(3, "10000003", "Carla", 2),
    ]
}

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));

                let state = AppState::new(
                    Arc::new(InMemoryGuestStore::with_guests(seed_guests())),
                    AdminSettings {
                        password_sha256: Some(sha256_hex(ADMIN_PASSWORD)),
                        session_ttl_seconds: 3600,
                    },
                );
                rsvp_api::serve(listener, state).await.expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
