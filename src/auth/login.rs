use axum::{
    debug_handler,
    http::{header, HeaderValue},
    response::Response,
    Form,
};
use serde::Deserialize;

use crate::{res, session, AppError, AppResult};

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    npub: String,
}

/// Whatever npub the form carries becomes the session. Nothing is verified.
#[debug_handler]
pub(crate) async fn login(Form(LoginForm { npub }): Form<LoginForm>) -> AppResult<Response> {
    let npub = npub.trim();
    if npub.is_empty() {
        return Err(AppError::bad_request("npub is required"));
    }

    let cookie = HeaderValue::from_str(&session::login_cookie(npub))
        .map_err(|_| AppError::bad_request("npub cannot be stored in a cookie"))?;

    tracing::info!(npub, "logged in");
    let mut response = res::found("/");
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}
