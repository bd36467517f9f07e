use crate::e2e::helpers;

use console_gateway::infrastructure::repositories::{CredentialKey, CredentialStore};
use console_gateway::{CredentialPair, Destination, GatewayError};
use helpers::TestContext;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_deny_forbidden_resources_without_refreshing(ctx: &TestContext) {
    let err = ctx.gateway.get("/v1/finances").await.err().unwrap();

    assert!(matches!(err, GatewayError::AuthorizationDenied), "got {:?}", err);
    assert_eq!(err.status_code(), Some(StatusCode::FORBIDDEN));
    assert_eq!(ctx.navigator.visited(), vec![Destination::Forbidden]);
    assert_eq!(ctx.api.refresh_calls(), 0);
    assert_eq!(ctx.store.pair(), Some(CredentialPair::new("T1", "R1")));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clear_both_credentials_on_sign_out(ctx: &TestContext) {
    assert!(ctx.gateway.is_signed_in());

    ctx.gateway.sign_out();

    assert!(!ctx.gateway.is_signed_in());
    assert_eq!(ctx.store.get(CredentialKey::AccessToken), None);
    assert_eq!(ctx.store.get(CredentialKey::RefreshToken), None);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_unauthenticated_after_sign_out(ctx: &TestContext) {
    ctx.gateway.sign_out();

    let err = ctx.gateway.get("/v1/students").await.err().unwrap();

    assert!(matches!(err, GatewayError::NotAuthenticated), "got {:?}", err);
    let seen = ctx.api.seen_on("/v1/students");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
    assert_eq!(ctx.navigator.visited(), vec![Destination::Login]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_pair_stored_by_sign_in(ctx: &TestContext) {
    ctx.api.expire_access_token();
    ctx.gateway.get("/v1/students").await.unwrap();

    // A fresh login elsewhere hands the console the current pair
    ctx.gateway.sign_out();
    ctx.gateway.sign_in(&CredentialPair::new("T2", "R2"));

    let response = ctx.gateway.get("/v1/students").await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ctx.api.refresh_calls(), 1);
}
