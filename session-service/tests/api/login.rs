use crate::helpers::{get_random_email, TestContext, PASSWORD};
use session_service::domain::LoginResponse;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_400_if_malformed_email(ctx: &mut TestContext) {
    let app = &ctx.test_app;

    let response = app.login("", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_same_400_for_unknown_user_and_wrong_password(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = get_random_email();
    app.signup(&email, PASSWORD).await;

    let unknown = app.login(&get_random_email(), PASSWORD).await;
    let wrong = app.login(&email, "Password124!").await;

    assert_eq!(unknown.status().as_u16(), 400);
    assert_eq!(wrong.status().as_u16(), 400);
    assert_eq!(unknown.text().await.unwrap(), wrong.text().await.unwrap());
    assert!(app.cookie(app.config.access_cookie_name()).is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_200_and_set_both_cookies(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = get_random_email();
    app.signup(&email, PASSWORD).await;

    let response = app.login(&email, PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let access = response
        .cookies()
        .find(|cookie| cookie.name() == "accessToken")
        .expect("No access cookie found");
    assert!(!access.value().is_empty());
    assert!(access.http_only());
    assert_eq!(access.path(), Some("/"));
    assert_eq!(access.max_age(), Some(std::time::Duration::from_secs(900)));

    let refresh = response
        .cookies()
        .find(|cookie| cookie.name() == "refreshToken")
        .expect("No refresh cookie found");
    assert!(!refresh.value().is_empty());
    assert!(refresh.http_only());
    assert_ne!(access.value(), refresh.value());

    let access_value = access.value().to_owned();
    let refresh_value = refresh.value().to_owned();
    let raw = response.text().await.unwrap();
    assert!(!raw.contains(&access_value));
    assert!(!raw.contains(&refresh_value));
    let body: LoginResponse = serde_json::from_str(&raw).unwrap();
    assert_eq!(body.email, email);
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_accept_differently_cased_email(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = get_random_email();
    app.signup(&email, PASSWORD).await;

    let response = app.login(&format!("  {}  ", email.to_uppercase()), PASSWORD).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestContext)]
#[tokio::test]
async fn second_login_replaces_the_first_session(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = app.signup_and_login().await;
    let first_refresh = app.cookie("refreshToken").unwrap();

    assert_eq!(app.login(&email, PASSWORD).await.status().as_u16(), 200);
    let second_refresh = app.cookie("refreshToken").unwrap();
    assert_ne!(first_refresh, second_refresh);

    assert_eq!(app.refresh_with(&first_refresh).await.status().as_u16(), 401);
    assert_eq!(app.refresh_with(&second_refresh).await.status().as_u16(), 200);
}

#[test_context(TestContext)]
#[tokio::test]
async fn partial_body_gets_the_same_400_as_a_wrong_password(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    let email = get_random_email();
    app.signup(&email, PASSWORD).await;

    let partial = app
        .login_with_body(&serde_json::json!({ "email": email }))
        .await;
    let wrong = app.login(&email, "Password124!").await;

    assert_eq!(partial.status().as_u16(), 400);
    assert_eq!(partial.text().await.unwrap(), wrong.text().await.unwrap());
}
