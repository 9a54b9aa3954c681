use axum::{
    debug_handler,
    http::{header, HeaderValue},
    response::Response,
};

use crate::{res, session, AppResult};

#[debug_handler]
pub(crate) async fn logout() -> AppResult<Response> {
    let mut response = res::found("/");
    response
        .headers_mut()
        .insert(header::SET_COOKIE, HeaderValue::from_str(&session::logout_cookie())?);
    Ok(response)
}
