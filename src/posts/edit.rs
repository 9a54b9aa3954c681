use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::{
    include_res,
    res::{self, escape},
    session::SessionNpub,
    store::PostField,
    AppError, AppResult, AppState, Store,
};

use super::{editable_post, parse_id};

#[derive(Debug, Deserialize)]
pub(crate) struct EditForm {
    #[serde(default)]
    field: String,
    #[serde(default)]
    value: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_page(
    State(store): State<Store>,
    Extension(session): Extension<SessionNpub>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let post = editable_post(&store, &session, parse_id(&id)?).await?;

    let content = include_res!(str, "/pages/post_edit.html")
        .replace("{id}", &post.id.to_string())
        .replace("{title}", &escape(&post.title))
        .replace("{body}", &escape(&post.body));

    Ok(res::page("Edit post", &session, &content))
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_post(
    State(store): State<Store>,
    Extension(session): Extension<SessionNpub>,
    Path(id): Path<String>,
    Form(EditForm { field, value }): Form<EditForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let field: PostField = field.parse().map_err(AppError::BadRequest)?;
    if field == PostField::Body && value.is_empty() {
        return Err(AppError::bad_request("body is required"));
    }

    let post = editable_post(&store, &session, id).await?;
    store.update_post(post.id, field, &value).await?;
    tracing::info!(post_id = post.id, ?field, "post updated");

    Ok(res::found(&format!("/posts/{}", post.id)))
}
