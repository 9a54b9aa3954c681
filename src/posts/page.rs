use axum::{
    debug_handler,
    extract::{Path, State},
    response::Html,
    Extension,
};

use crate::{
    include_res, markdown::render_markdown, res::{self, escape}, session::SessionNpub,
    AppResult, AppState, Store,
};

use super::{can_edit, parse_id};

#[debug_handler(state = AppState)]
pub(crate) async fn page(
    State(store): State<Store>,
    Extension(session): Extension<SessionNpub>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let post = store.get_one_post(parse_id(&id)?).await?;

    let edit_link = match session.npub() {
        Some(npub) if can_edit(&post, npub) => {
            format!("<a href=\"/posts/{}/edit\">edit</a>", post.id)
        }
        _ => String::new(),
    };
    let updated = post
        .updated_at
        .map(|at| format!(", edited {}", at.date()))
        .unwrap_or_default();
    let label = post.label();

    let content = include_res!(str, "/pages/post.html")
        .replace("{created_at}", &post.created_at.date().to_string())
        .replace("{updated}", &updated)
        .replace("{edit_link}", &edit_link)
        .replace("{npub}", &escape(post.npub.as_deref().unwrap_or("anonymous")))
        .replace("{relaylist}", &escape(&post.relaylist))
        .replace("{label}", &escape(&label))
        .replace("{body_html}", &render_markdown(&post.body));

    Ok(res::page(&label, &session, &content))
}
