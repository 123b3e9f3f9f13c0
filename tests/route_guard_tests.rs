use chrono::{DateTime, Duration, Utc};

use bankos_session::config::SessionConfig;
use bankos_session::context::AuthContext;
use bankos_session::guard::{RouteDecision, RouteGuard};
use bankos_session::identity::{ClientInfo, Identity};
use bankos_session::token::AccessToken;

fn admin_token(now: DateTime<Utc>) -> AccessToken {
    let id = Identity::admin("1", "admin", "Bank Administrator", now);
    AccessToken::issue(&id, Duration::hours(24), now)
}

fn customer_token(now: DateTime<Utc>) -> AccessToken {
    let id = Identity::customer("2", "customer", "John Doe", "1234567890", now);
    AccessToken::issue(&id, Duration::hours(24), now)
}

#[test]
fn public_paths_are_always_allowed() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    let admin = admin_token(now);
    let customer = customer_token(now);
    for path in ["/", "/login", "/login/reset"] {
        assert_eq!(guard.decide(path, None, now), RouteDecision::Allow, "anon {path}");
        assert_eq!(guard.decide(path, Some(&admin), now), RouteDecision::Allow, "admin {path}");
        assert_eq!(guard.decide(path, Some(&customer), now), RouteDecision::Allow, "customer {path}");
    }
}

#[test]
fn root_is_exact_not_a_prefix() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    // "/" must not make every path public.
    assert_eq!(guard.decide("/admin", None, now), RouteDecision::RedirectToLogin);
}

#[test]
fn anonymous_role_scoped_paths_redirect_to_login() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    for path in ["/admin", "/admin/fraud", "/portal", "/portal/accounts"] {
        assert_eq!(guard.decide(path, None, now), RouteDecision::RedirectToLogin, "{path}");
    }
    // Paths outside both partitions fall through to allow.
    assert_eq!(guard.decide("/reports", None, now), RouteDecision::Allow);
}

#[test]
fn admin_is_kept_out_of_the_customer_partition() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    let tok = admin_token(now);
    assert_eq!(guard.decide("/portal", Some(&tok), now), RouteDecision::RedirectToAdminHome);
    assert_eq!(guard.decide("/portal/loans", Some(&tok), now), RouteDecision::RedirectToAdminHome);
    assert_eq!(guard.decide("/admin/kyc", Some(&tok), now), RouteDecision::Allow);
    assert_eq!(guard.decide("/reports", Some(&tok), now), RouteDecision::Allow);
}

#[test]
fn customer_is_kept_out_of_the_admin_partition() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    let tok = customer_token(now);
    assert_eq!(guard.decide("/admin", Some(&tok), now), RouteDecision::RedirectToCustomerHome);
    assert_eq!(guard.decide("/admin/payments", Some(&tok), now), RouteDecision::RedirectToCustomerHome);
    assert_eq!(guard.decide("/portal/accounts", Some(&tok), now), RouteDecision::Allow);
}

#[test]
fn malformed_token_redirects_to_login_on_protected_paths() {
    let guard = RouteGuard::default();
    let now = Utc::now();
    for raw in ["{]", "", "{\"identity\":42}"] {
        assert_eq!(guard.decide_raw("/admin", Some(raw), now), RouteDecision::RedirectToLogin);
        assert_eq!(guard.decide_raw("/reports", Some(raw), now), RouteDecision::RedirectToLogin);
        // Public paths never consult the token at all.
        assert_eq!(guard.decide_raw("/login", Some(raw), now), RouteDecision::Allow);
    }
}

#[test]
fn token_past_its_ttl_is_anonymous() {
    let guard = RouteGuard::default();
    let t0 = Utc::now();
    let tok = admin_token(t0);
    let later = t0 + Duration::hours(25);
    assert_eq!(guard.decide("/admin", Some(&tok), later), RouteDecision::RedirectToLogin);
    assert_eq!(guard.decide("/reports", Some(&tok), later), RouteDecision::Allow);
}

#[test]
fn decision_targets() {
    assert_eq!(RouteDecision::Allow.target(), None);
    assert_eq!(RouteDecision::RedirectToLogin.target(), Some("/login"));
    assert_eq!(RouteDecision::RedirectToAdminHome.target(), Some("/admin"));
    assert_eq!(RouteDecision::RedirectToCustomerHome.target(), Some("/portal"));
}

#[test]
fn context_feeds_the_guard_through_the_persisted_token() {
    let tmp = tempfile::tempdir().unwrap();
    let c = AuthContext::with_defaults(tmp.path(), SessionConfig::default()).unwrap();
    let t0 = Utc::now();

    // Anonymous first.
    assert_eq!(c.route_decision_at("/admin", t0), RouteDecision::RedirectToLogin);

    c.login_at("admin", "admin123", ClientInfo::default(), t0).unwrap();
    assert_eq!(c.route_decision_at("/admin/fraud", t0), RouteDecision::Allow);
    assert_eq!(c.route_decision_at("/portal", t0), RouteDecision::RedirectToAdminHome);

    c.logout();
    assert_eq!(c.route_decision_at("/admin/fraud", t0), RouteDecision::RedirectToLogin);

    c.login_at("customer", "customer123", ClientInfo::default(), t0).unwrap();
    assert_eq!(c.route_decision_at("/portal", t0), RouteDecision::Allow);
    assert_eq!(c.route_decision_at("/admin", t0), RouteDecision::RedirectToCustomerHome);
}
