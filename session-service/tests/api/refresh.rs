use futures::future::join_all;
use session_service::domain::RefreshResponse;
use test_context::test_context;

use crate::helpers::TestContext;

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_401_without_cookie(ctx: &mut TestContext) {
    let app = &ctx.test_app;

    let response = app.refresh().await;

    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestContext)]
#[tokio::test]
async fn every_failure_has_the_same_body(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let access = app.cookie("accessToken").unwrap();
    let used = app.cookie("refreshToken").unwrap();
    assert_eq!(app.refresh_with(&used).await.status().as_u16(), 200);

    let missing = app.refresh_with("").await;
    let forged = app.refresh_with("not.a.jwt").await;
    let replayed = app.refresh_with(&used).await;
    let wrong_kind = app.refresh_with(&access).await;

    let mut bodies = Vec::new();
    for response in [missing, forged, replayed, wrong_kind] {
        assert_eq!(response.status().as_u16(), 401);
        bodies.push(response.text().await.unwrap());
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_rotate_both_cookies(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let old_access = app.cookie("accessToken").unwrap();
    let old_refresh = app.cookie("refreshToken").unwrap();

    let response = app.refresh().await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<RefreshResponse>().await.unwrap();
    assert!(body.success);

    let new_access = app.cookie("accessToken").unwrap();
    let new_refresh = app.cookie("refreshToken").unwrap();
    assert_ne!(old_access, new_access);
    assert_ne!(old_refresh, new_refresh);
}

#[test_context(TestContext)]
#[tokio::test]
async fn rotated_credential_cannot_be_replayed(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let original = app.cookie("refreshToken").unwrap();

    assert_eq!(app.refresh_with(&original).await.status().as_u16(), 200);
    assert_eq!(app.refresh_with(&original).await.status().as_u16(), 401);
    assert_eq!(app.refresh_with(&original).await.status().as_u16(), 401);
}

#[test_context(TestContext)]
#[tokio::test]
async fn concurrent_rotation_of_one_value_succeeds_once(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let original = app.cookie("refreshToken").unwrap();

    let responses = join_all((0..5).map(|_| app.refresh_with(&original))).await;

    let ok = responses.iter().filter(|r| r.status().as_u16() == 200).count();
    let rejected = responses.iter().filter(|r| r.status().as_u16() == 401).count();
    assert_eq!(ok, 1);
    assert_eq!(rejected, 4);
}

#[test_context(TestContext)]
#[tokio::test]
async fn refresh_restores_access_after_expiry(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = app.signup_and_login().await;

    app.expire_access(&email).await;
    assert_eq!(app.check().await.status().as_u16(), 401);

    assert_eq!(app.refresh().await.status().as_u16(), 200);
    assert_eq!(app.check().await.status().as_u16(), 200);
}
