use axum::{debug_handler, response::Html, Extension};

use crate::{
    include_res,
    res::{self, escape},
    session::SessionNpub,
};

#[debug_handler]
pub(crate) async fn dashboard(Extension(session): Extension<SessionNpub>) -> Html<String> {
    let content = match session.npub() {
        Some(npub) => include_res!(str, "/pages/dashboard.html").replace("{npub}", &escape(npub)),
        None => include_res!(str, "/pages/dashboard_anon.html").to_owned(),
    };

    res::page("Dashboard", &session, &content)
}
