//! The "session" is nothing more than an `npub` cookie the browser sends back.
//! It is not signed. Whatever the login form was given is trusted as-is.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::Cookie;

pub const NPUB_COOKIE: &str = "npub";

/// Identity claimed by the request, if any. Always present in request extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionNpub(pub Option<String>);

impl SessionNpub {
    pub fn npub(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

pub fn npub_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == NPUB_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|npub| !npub.is_empty())
}

pub async fn session_layer(mut request: Request, next: Next) -> Response {
    let session = SessionNpub(npub_from_headers(request.headers()));
    request.extensions_mut().insert(session);
    next.run(request).await
}

pub fn login_cookie(npub: &str) -> String {
    Cookie::build((NPUB_COOKIE, npub.to_owned()))
        .path("/")
        .http_only(false)
        .build()
        .to_string()
}

pub fn logout_cookie() -> String {
    let mut cookie = Cookie::build((NPUB_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie.to_string()
}
