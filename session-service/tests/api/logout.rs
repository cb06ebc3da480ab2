use session_service::domain::LogoutResponse;
use test_context::test_context;

use crate::helpers::TestContext;

#[test_context(TestContext)]
#[tokio::test]
async fn should_return_200_without_session(ctx: &mut TestContext) {
    let app = &ctx.test_app;

    let response = app.logout().await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<LogoutResponse>().await.unwrap();
    assert_eq!(body.message, "Logged out successfully");
}

#[test_context(TestContext)]
#[tokio::test]
async fn should_clear_both_cookies(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;

    let response = app.logout().await;
    assert_eq!(response.status().as_u16(), 200);

    for name in ["accessToken", "refreshToken"] {
        let cookie = response
            .cookies()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("no {name} removal cookie"));
        assert!(cookie.value().is_empty());
        assert_eq!(cookie.max_age(), Some(std::time::Duration::ZERO));
    }
    assert_eq!(app.check().await.status().as_u16(), 401);
}

#[test_context(TestContext)]
#[tokio::test]
async fn logout_is_idempotent_and_ends_the_session(ctx: &mut TestContext) {
    let app = &ctx.test_app;
    app.signup_and_login().await;
    let refresh = app.cookie("refreshToken").unwrap();

    assert_eq!(app.logout().await.status().as_u16(), 200);
    assert_eq!(app.logout().await.status().as_u16(), 200);

    assert_eq!(app.refresh_with(&refresh).await.status().as_u16(), 401);
}
