use axum::{
    debug_handler,
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::{
    include_res, res, session::SessionNpub, store::PostOrder, AppResult, AppState, Store,
};

use super::post_items;

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    order: PostOrder,
}

#[debug_handler(state = AppState)]
pub(crate) async fn list(
    State(store): State<Store>,
    Extension(session): Extension<SessionNpub>,
    Query(ListQuery { order }): Query<ListQuery>,
) -> AppResult<Response> {
    let Some(npub) = session.npub() else {
        return Ok(res::found("/"));
    };

    let posts = store.get_all_posts(Some(npub), order).await?;
    let content = include_res!(str, "/pages/post_list.html")
        .replace("{post_items}", &post_items(&posts));

    Ok(res::page("Posts", &session, &content).into_response())
}
