//! Mock webhook for tests that need a loopback socket.

use std::net::{Ipv4Addr, TcpListener};

use wiremock::MockServer;

/// Set to `1` to fail instead of skipping when loopback binding is denied.
const STRICT_SOCKETS_ENV: &str = "PROMO_PLANNER_REQUIRE_SOCKET_TESTS";

fn strict_sockets() -> bool {
    std::env::var(STRICT_SOCKETS_ENV)
        .is_ok_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
}

/// Starts a mock webhook, or `None` when this sandbox cannot bind loopback.
pub async fn mock_webhook_or_skip() -> Option<MockServer> {
    match TcpListener::bind((Ipv4Addr::LOCALHOST, 0)) {
        Ok(_) => Some(MockServer::start().await),
        Err(err) => {
            assert!(!strict_sockets(), "mock webhook needs a loopback socket: {err}");
            eprintln!(
                "skipping mock webhook test, loopback bind failed: {err} \
                 ({STRICT_SOCKETS_ENV}=1 makes this a failure)"
            );
            None
        }
    }
}
