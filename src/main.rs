use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use bankos_session::config::SessionConfig;
use bankos_session::context::{run_clock, AuthContext};
use bankos_session::monitor::{format_remaining, SessionMonitor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let state_dir = std::env::var("BANKOS_STATE_DIR").unwrap_or_else(|_| ".bankos".to_string());
    let username = std::env::var("BANKOS_USER").unwrap_or_else(|_| "admin".to_string());
    let config = SessionConfig::from_env();
    info!(
        target: "bankos",
        "bankos-session starting: RUST_LOG='{}', state_dir='{}', timeout_secs={}, tick_secs={}",
        rust_log,
        state_dir,
        config.session_timeout.num_seconds(),
        config.tick_interval.num_seconds()
    );

    let ctx = Arc::new(AuthContext::with_defaults(&state_dir, config.clone())?);

    // Adopt a persisted session if one survives, otherwise log in fresh.
    let identity = match ctx.restore() {
        Some(identity) => {
            info!(target: "bankos", "restored session for {}", identity.username);
            identity
        }
        None => {
            let password = std::env::var("BANKOS_PASSWORD")
                .unwrap_or_else(|_| format!("{}123", username));
            let resp = ctx.login(&username, &password)?;
            info!(
                target: "bankos",
                "logged in as {} ({})",
                resp.identity.username,
                resp.identity.role.as_str()
            );
            resp.identity
        }
    };
    info!(target: "bankos", "home route: {}", identity.role.home_path());

    // Surface clock events through a monitor, the way the console renders
    // its badge and warning dialog.
    let monitor = Arc::new(Mutex::new(SessionMonitor::new(config.warning_threshold)));
    let observer = monitor.clone();
    ctx.subscribe(move |event| {
        let mut m = observer.lock();
        m.observe(event);
        info!(
            target: "bankos",
            "session status={:?} remaining={} warning_dialog={}",
            m.status(),
            format_remaining(m.remaining()),
            m.warning_visible()
        );
    });

    let clock = tokio::spawn(run_clock(ctx.clone()));

    tokio::signal::ctrl_c().await?;
    clock.abort();
    ctx.logout();
    info!(target: "bankos", "logged out; bye");
    Ok(())
}
