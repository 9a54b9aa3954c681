use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::session::SessionNpub;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// HTML-escape a user supplied value before it is spliced into a template.
///
/// Braces are encoded too so the value can never spell a later `{placeholder}`.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// Wrap a filled-in page body in the shared layout.
///
/// `content` is inserted as-is, so everything user supplied in it must
/// already be escaped or sanitized.
pub fn page(title: &str, session: &SessionNpub, content: &str) -> Html<String> {
    let nav = match session.npub() {
        Some(npub) => include_res!(str, "/pages/nav_session.html").replace("{npub}", &escape(npub)),
        None => include_res!(str, "/pages/nav_login.html").to_owned(),
    };

    Html(
        include_res!(str, "/pages/layout.html")
            .replace("{title}", &escape(title))
            .replace("{nav}", &nav)
            .replace("{content}", content),
    )
}

/// 302, which `Redirect::to` does not produce.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}
