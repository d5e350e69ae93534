mod support;

use admin_service::tokens::TokenSubject;
use anyhow::{anyhow, Result};
use axum::body::Body;
use axum::http::{
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    Request, StatusCode,
};
use chrono::{Duration, Utc};
use common_auth::TOKEN_EXPIRED_HEADER;
use common_security::Decision;
use support::{json_body, login_request, portal, text_body, COOKIE_NAME, PASSWORD};
use tower::util::ServiceExt;

async fn login_token(app: &axum::Router, username: &str) -> Result<(String, String)> {
    let response = app.clone().oneshot(login_request(username, PASSWORD)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .ok_or_else(|| anyhow!("missing session cookie"))?
        .to_str()?
        .to_string();
    let cookie_pair = set_cookie
        .split(';')
        .next()
        .ok_or_else(|| anyhow!("empty cookie"))?
        .to_string();
    let body = json_body(response).await?;
    let token = body["access_token"]
        .as_str()
        .ok_or_else(|| anyhow!("missing access_token"))?
        .to_string();
    Ok((token, cookie_pair))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

fn with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let portal = portal()?;
    let response = portal.app.clone().oneshot(get("/healthz")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await?, "ok");
    Ok(())
}

#[tokio::test]
async fn login_sets_session_cookie_and_returns_token() -> Result<()> {
    let portal = portal()?;
    let response = portal
        .app
        .clone()
        .oneshot(login_request("ops", PASSWORD)?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .ok_or_else(|| anyhow!("missing cookie"))?
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with(&format!("{COOKIE_NAME}=")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=300"));

    let body = json_body(response).await?;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 300);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_rejected() -> Result<()> {
    let portal = portal()?;
    let response = portal
        .app
        .clone()
        .oneshot(login_request("ops", "not the password")?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(json_body(response).await?["code"], "INVALID_CREDENTIALS");

    let response = portal
        .app
        .clone()
        .oneshot(login_request("nobody", PASSWORD)?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_passes_admins_but_not_super_users() -> Result<()> {
    let portal = portal()?;
    let (token, _) = login_token(&portal.app, "ops").await?;

    let response = portal.app.clone().oneshot(with_bearer("/admin", &token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["policy"], "Admins");
    assert_eq!(body["subject"], "ops");

    let response = portal.app.clone().oneshot(with_bearer("/super", &token)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await?["code"], "FORBIDDEN");

    let metrics = &portal.state.metrics;
    assert_eq!(metrics.policy_decision_count("Admins", Decision::Allow), 1);
    assert_eq!(metrics.policy_decision_count("SuperUsers", Decision::Deny), 1);
    Ok(())
}

#[tokio::test]
async fn super_user_passes_both_policies_via_cookie() -> Result<()> {
    let portal = portal()?;
    let (_, cookie) = login_token(&portal.app, "root").await?;

    for uri in ["/admin", "/super"] {
        let response = portal.app.clone().oneshot(with_cookie(uri, &cookie)).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let response = portal.app.clone().oneshot(with_cookie("/me", &cookie)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["subject"], "root");
    assert_eq!(body["scheme"], "cookie");
    assert_eq!(body["groups"], serde_json::json!(["Admins", "SuperUsers"]));
    Ok(())
}

#[tokio::test]
async fn member_of_nothing_fails_both_policies() -> Result<()> {
    let portal = portal()?;
    let (token, _) = login_token(&portal.app, "guest").await?;

    for uri in ["/admin", "/super"] {
        let response = portal.app.clone().oneshot(with_bearer(uri, &token)).await?;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = portal.app.clone().oneshot(with_bearer("/me", &token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["scheme"], "bearer");
    assert_eq!(body["groups"], serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_credentials_are_unauthorized() -> Result<()> {
    let portal = portal()?;
    let response = portal.app.clone().oneshot(get("/admin")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(TOKEN_EXPIRED_HEADER).is_none());
    assert_eq!(json_body(response).await?["code"], "AUTH_MISSING");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_flagged() -> Result<()> {
    let portal = portal()?;
    let subject = TokenSubject {
        username: "root".into(),
        groups: vec!["Admins".into(), "SuperUsers".into()],
    };
    let issued = portal
        .state
        .token_signer
        .issue_at(&subject, Utc::now() - Duration::seconds(3600))?;

    let response = portal
        .app
        .clone()
        .oneshot(with_bearer("/admin", &issued.access_token))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(TOKEN_EXPIRED_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
    assert_eq!(json_body(response).await?["code"], "AUTH_EXPIRED");
    Ok(())
}

#[tokio::test]
async fn tampered_token_is_rejected_without_expiry_flag() -> Result<()> {
    let portal = portal()?;
    let (token, _) = login_token(&portal.app, "ops").await?;
    let tampered = format!("{token}x");

    let response = portal.app.clone().oneshot(with_bearer("/admin", &tampered)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(TOKEN_EXPIRED_HEADER).is_none());
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> Result<()> {
    let portal = portal()?;
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .body(Body::empty())?;
    let response = portal.app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .headers()
        .get(SET_COOKIE)
        .ok_or_else(|| anyhow!("missing cookie"))?
        .to_str()?;
    assert!(cleared.starts_with(&format!("{COOKIE_NAME}=;")));
    assert!(cleared.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn metrics_endpoint_reports_decisions() -> Result<()> {
    let portal = portal()?;
    let (token, _) = login_token(&portal.app, "ops").await?;
    portal.app.clone().oneshot(with_bearer("/super", &token)).await?;

    let response = portal.app.clone().oneshot(get("/metrics")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let text = text_body(response).await?;
    assert!(text.contains("admin_policy_decisions_total"));
    assert!(text.contains("outcome=\"deny\""));
    assert!(text.contains("admin_login_attempts_total"));
    Ok(())
}
