use axum::{debug_handler, extract::State, response::Html, routing::get, Extension, Router};

use crate::{
    include_res, markdown::render_markdown, posts, res, session::SessionNpub,
    store::PostOrder, AppResult, AppState, Store,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
}

#[debug_handler(state = AppState)]
pub async fn index(
    State(store): State<Store>,
    Extension(session): Extension<SessionNpub>,
) -> AppResult<Html<String>> {
    let Some(npub) = session.npub() else {
        return Ok(res::page("Home", &session, include_res!(str, "/pages/intro.html")));
    };

    let posts = store.get_all_posts(Some(npub), PostOrder::Newest).await?;
    let content = include_res!(str, "/pages/index.html")
        .replace("{post_items}", &posts::post_items(&posts));

    Ok(res::page("Home", &session, &content))
}

#[debug_handler]
pub async fn about(Extension(session): Extension<SessionNpub>) -> Html<String> {
    res::page(
        "About",
        &session,
        &render_markdown(include_res!(str, "/pages/about.md")),
    )
}
