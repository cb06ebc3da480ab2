use session_service::domain::CheckResponse;
use test_context::test_context;

use crate::helpers::{TestContext, PASSWORD};

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_401_missing_without_cookie(ctx: &mut TestContext) {
    let app = &ctx.test_app;

    let response = app.check().await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(response.text().await.unwrap(), "missing access credential");
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_401_invalid_for_garbage(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.cookie_jar
        .add_cookie_str("accessToken=garbage; Path=/", &app.url());

    let response = app.check().await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(response.text().await.unwrap(), "invalid access credential");
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_200_when_authenticated(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;

    let response = app.check().await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<CheckResponse>().await.unwrap();
    assert!(body.authenticated);
}

#[test_context(TestContext)]
#[tokio::test]
async fn session_round_trip(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = app.signup_and_login().await;
    assert_eq!(app.check().await.status().as_u16(), 200);

    app.expire_access(&email).await;
    assert_eq!(app.check().await.status().as_u16(), 401);

    assert_eq!(app.refresh().await.status().as_u16(), 200);
    assert_eq!(app.check().await.status().as_u16(), 200);

    assert_eq!(app.login(&email, PASSWORD).await.status().as_u16(), 200);
    assert_eq!(app.check().await.status().as_u16(), 200);
}

#[test_context(TestContext)]
#[tokio::test]
async fn access_credential_outlives_logout_until_expiry(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let access = app.cookie("accessToken").unwrap();

    app.logout().await;

    // the guard is stateless: only expiry ends an access credential
    let response = reqwest::Client::new()
        .get(format!("{}/check", &app.address))
        .header("Cookie", format!("accessToken={access}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
