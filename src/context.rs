//! Explicitly constructed session service.
//!
//! All session state lives in one context object with a defined lifecycle:
//! built once at startup, shared behind `Arc`, torn down implicitly with
//! the process. It owns the auth gateway, the persistence store, the
//! activity debounce, and the clock phase, and publishes clock events to
//! subscribers. No module-level singletons.
//!
//! Activity writes and clock reads are not atomically ordered against each
//! other; a tick may see an expiry one activity refresh stale. That window
//! is bounded by the tick interval, which is short relative to the timeout,
//! so no cross-source locking is attempted.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::activity::{ActivityDebounce, ActivityKind};
use crate::clock::{SessionClock, SessionEvent, SessionPhase};
use crate::config::SessionConfig;
use crate::credentials::CredentialDirectory;
use crate::error::AppResult;
use crate::guard::{RouteDecision, RouteGuard};
use crate::identity::{
    AuthProvider, ClientInfo, Identity, LocalAuthProvider, LoginRequest, LoginResponse, Session,
    SessionManager,
};
use crate::store::SessionStore;
use crate::token::AccessToken;

type Subscriber = Box<dyn Fn(&SessionEvent) + Send + Sync>;

pub struct AuthContext {
    config: SessionConfig,
    provider: Box<dyn AuthProvider>,
    sm: SessionManager,
    store: SessionStore,
    guard: RouteGuard,
    state: RwLock<Option<(Identity, Session)>>,
    clock: Mutex<SessionClock>,
    debounce: Mutex<ActivityDebounce>,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl AuthContext {
    pub fn new(config: SessionConfig, provider: Box<dyn AuthProvider>, store: SessionStore) -> Self {
        Self {
            sm: SessionManager::new(config.clone()),
            clock: Mutex::new(SessionClock::new(config.warning_threshold)),
            debounce: Mutex::new(ActivityDebounce::new(config.activity_debounce)),
            guard: RouteGuard::default(),
            state: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
            provider,
            store,
            config,
        }
    }

    /// Context over the default credential directory, persisting under
    /// `root`.
    pub fn with_defaults(root: impl AsRef<Path>, config: SessionConfig) -> AppResult<Self> {
        let directory = CredentialDirectory::with_defaults()?;
        let sm = SessionManager::new(config.clone());
        let provider = Box::new(LocalAuthProvider::new(directory, sm));
        let store = SessionStore::new(root)?;
        Ok(Self::new(config, provider, store))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn subscribe(&self, f: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        self.subscribers.write().push(Box::new(f));
    }

    fn publish(&self, event: &SessionEvent) {
        for s in self.subscribers.read().iter() {
            s(event);
        }
    }

    // ---- Auth gateway ----

    /// Validate credentials and open a session. On mismatch nothing is
    /// persisted and the existing state (if any) is untouched.
    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        client: ClientInfo,
        now: DateTime<Utc>,
    ) -> AppResult<LoginResponse> {
        let req = LoginRequest { username: username.into(), password: password.into(), client };
        let resp = self.provider.login(&req, now)?;
        self.store.save(&resp.identity, &resp.session)?;
        let token = AccessToken::issue(&resp.identity, self.config.token_ttl, now);
        self.store.save_token(&token)?;
        *self.state.write() = Some((resp.identity.clone(), resp.session.clone()));
        self.clock.lock().reset();
        {
            let mut d = self.debounce.lock();
            d.reset();
            let _ = d.admit(now);
        }
        Ok(resp)
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        self.login_at(username, password, ClientInfo::default(), Utc::now())
    }

    /// Unconditionally tear the session down. Idempotent: calling while
    /// logged out clears nothing and publishes nothing.
    pub fn logout(&self) {
        let had = self.state.write().take().is_some();
        self.store.clear();
        self.clock.lock().reset();
        self.debounce.lock().reset();
        if had {
            info!(target: "auth", "auth.logout");
            self.publish(&SessionEvent::LoggedOut);
        }
    }

    /// Adopt a previously persisted session, as the console does on load.
    /// An expired or corrupt pair is silently cleared; a valid one counts
    /// as activity and is refreshed on the spot.
    pub fn restore_at(&self, now: DateTime<Utc>) -> Option<Identity> {
        let (identity, session) = self.store.load()?;
        if !session.is_valid(now) {
            info!(target: "session", "persisted session expired; clearing");
            self.store.clear();
            return None;
        }
        *self.state.write() = Some((identity, session));
        self.clock.lock().reset();
        {
            let mut d = self.debounce.lock();
            d.reset();
            let _ = d.admit(now);
        }
        if let Err(e) = self.refresh_at(now) {
            warn!(target: "session", "restore refresh failed: {}", e.message());
        }
        self.current_identity()
    }

    pub fn restore(&self) -> Option<Identity> {
        self.restore_at(Utc::now())
    }

    // ---- Activity tracker ----

    /// Record a qualifying interaction. Returns whether the refresh was
    /// applied; events inside the debounce window of the previous accepted
    /// one are dropped, as are events with no session active.
    pub fn record_activity_at(&self, kind: ActivityKind, now: DateTime<Utc>) -> AppResult<bool> {
        if self.state.read().is_none() {
            return Ok(false);
        }
        if !self.debounce.lock().admit(now) {
            return Ok(false);
        }
        debug!(target: "session", "activity {}", kind.as_str());
        self.refresh_at(now)?;
        Ok(true)
    }

    pub fn record_activity(&self, kind: ActivityKind) -> AppResult<bool> {
        self.record_activity_at(kind, Utc::now())
    }

    /// Explicit renewal from the warning prompt. Bypasses the debounce and
    /// re-anchors it.
    pub fn extend_session_at(&self, now: DateTime<Utc>) -> AppResult<()> {
        {
            let mut d = self.debounce.lock();
            d.reset();
            let _ = d.admit(now);
        }
        self.refresh_at(now)
    }

    pub fn extend_session(&self) -> AppResult<()> {
        self.extend_session_at(Utc::now())
    }

    // Single writer for the session window: moves last-activity to `now`,
    // pushes expiry forward (never backward), persists both records and a
    // fresh access token.
    fn refresh_at(&self, now: DateTime<Utc>) -> AppResult<()> {
        let mut guard = self.state.write();
        let Some((identity, session)) = guard.as_mut() else {
            return Ok(());
        };
        self.sm.renew(session, now);
        identity.last_activity = now;
        self.store.save(identity, session)?;
        let token = AccessToken::issue(identity, self.config.token_ttl, now);
        self.store.save_token(&token)?;
        Ok(())
    }

    // ---- Session clock ----

    /// One evaluation of the session window. With no session this is a
    /// no-op; that unconditional check is also the cancellation mechanism
    /// after logout, so the driving timer never needs explicit teardown.
    pub fn tick_at(&self, now: DateTime<Utc>) -> Vec<SessionEvent> {
        let remaining = {
            let guard = self.state.read();
            match guard.as_ref() {
                Some((_, session)) => session.remaining(now),
                None => return Vec::new(),
            }
        };
        let events = self.clock.lock().evaluate(remaining);
        if events.contains(&SessionEvent::Expired) {
            info!(target: "session", "session expired; forcing logout");
            self.state.write().take();
            self.store.clear();
            self.debounce.lock().reset();
        }
        for e in &events {
            self.publish(e);
        }
        events
    }

    pub fn tick(&self) -> Vec<SessionEvent> {
        self.tick_at(Utc::now())
    }

    // ---- Readers ----

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.read().as_ref().map(|(i, _)| i.clone())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.read().as_ref().map(|(_, s)| s.clone())
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.state.read().as_ref().map(|(_, s)| s.remaining(now))
    }

    pub fn phase(&self) -> SessionPhase {
        self.clock.lock().phase()
    }

    /// Route-guard decision against the persisted access token.
    pub fn route_decision_at(&self, path: &str, now: DateTime<Utc>) -> RouteDecision {
        let raw = self.store.load_raw_token();
        self.guard.decide_raw(path, raw.as_deref(), now)
    }

    pub fn route_decision(&self, path: &str) -> RouteDecision {
        self.route_decision_at(path, Utc::now())
    }
}

/// Drive the context's clock from the configured tick interval until the
/// task is dropped. Tick jitter of a few seconds is tolerable at
/// minute-granularity timeouts.
pub async fn run_clock(ctx: Arc<AuthContext>) {
    let period = ctx
        .config
        .tick_interval
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        ctx.tick_at(Utc::now());
    }
}
