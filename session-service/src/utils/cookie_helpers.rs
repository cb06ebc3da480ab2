use axum_extra::extract::cookie::Cookie;
use time::Duration;

use super::Config;

// Both credentials only ever travel as HttpOnly cookies. Secure and SameSite
// come from the explicit cookie policy in `Config`.
fn session_cookie(name: &str, value: String, path: &str, config: &Config) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value))
        .path(path.to_owned())
        .http_only(true)
        .same_site(config.cookie_same_site())
        .secure(config.cookie_secure())
        .build()
}

pub fn access_cookie(token: &str, config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config.access_cookie_name(), token.to_owned(), "/", config);
    cookie.set_max_age(Duration::seconds(config.access_ttl_seconds()));
    cookie
}

pub fn refresh_cookie(token: &str, config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(
        config.refresh_cookie_name(),
        token.to_owned(),
        config.refresh_cookie_path(),
        config,
    );
    cookie.set_max_age(Duration::seconds(config.refresh_ttl_seconds()));
    cookie
}

/// Removal cookies must repeat the path/flags the originals were set with.
pub fn clear_access_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config.access_cookie_name(), String::new(), "/", config);
    cookie.set_max_age(Duration::seconds(0));
    cookie
}

pub fn clear_refresh_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(
        config.refresh_cookie_name(),
        String::new(),
        config.refresh_cookie_path(),
        config,
    );
    cookie.set_max_age(Duration::seconds(0));
    cookie
}
