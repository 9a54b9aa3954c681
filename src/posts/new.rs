use std::sync::Arc;

use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    identity::Identity,
    include_res,
    relay::{self, RelayOutcome},
    res::{self, escape},
    session::SessionNpub,
    store::NewPost,
    AppError, AppResult, AppState, Config, Relays, Store,
};

#[derive(Debug, Deserialize)]
pub(crate) struct NewPostForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    nsec: String,
    #[serde(default)]
    relaylist: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_post_page(
    State(config): State<Arc<Config>>,
    Extension(session): Extension<SessionNpub>,
) -> Response {
    if session.npub().is_none() {
        return res::found("/");
    }

    let content = include_res!(str, "/pages/post_new.html")
        .replace("{relaylist}", &escape(&config.default_relays));
    res::page("New post", &session, &content).into_response()
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_post(
    State(store): State<Store>,
    State(relays): State<Relays>,
    Extension(session): Extension<SessionNpub>,
    Form(form): Form<NewPostForm>,
) -> AppResult<Response> {
    if form.body.is_empty() || form.nsec.is_empty() || form.relaylist.is_empty() {
        return Err(AppError::bad_request("all fields are required"));
    }

    let relay_urls = relay::split_relay_list(&form.relaylist);
    if relay_urls.is_empty() {
        return Err(AppError::bad_request("relaylist has no relay addresses"));
    }

    let identity = Identity::from_nsec(&form.nsec)?;
    identity.ensure_matches(session.npub())?;

    let post = NewPost {
        npub: Some(identity.npub.clone()),
        title: form.title,
        body: form.body,
        relaylist: form.relaylist,
        created_at: OffsetDateTime::now_utc(),
    };
    let id = store.insert_post(&post).await?;
    tracing::info!(post_id = id, npub = %identity.npub, "post created");

    let event = identity.sign_text_note(&post.body)?;
    let outcomes = relay::publish_to_all(relays.as_ref(), &relay_urls, &event).await;

    if outcomes.iter().all(RelayOutcome::is_success) {
        return Ok(res::found("/"));
    }

    let report: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
    Err(AppError::BadRequest(format!(
        "post {id} was saved but not every relay accepted it\n{}",
        report.join("\n")
    )))
}
