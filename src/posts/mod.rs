mod edit;
mod list;
mod new;
mod page;

use axum::{routing::get, Router};

use crate::{
    include_res,
    res::escape,
    session::SessionNpub,
    store::{Post, Store},
    AppError, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list::list))
        .route("/posts/{id}", get(page::page))
        .route("/posts/{id}/edit", get(edit::edit_page).post(edit::edit_post))
        .route("/new/post", get(new::new_post_page).post(new::new_post))
}

pub(crate) fn post_items(posts: &[Post]) -> String {
    if posts.is_empty() {
        return include_res!(str, "/pages/post_empty.html").to_owned();
    }

    posts
        .iter()
        .map(|post| {
            include_res!(str, "/pages/post_item.html")
                .replace("{id}", &post.id.to_string())
                .replace("{created_at}", &post.created_at.date().to_string())
                .replace("{label}", &escape(&post.label()))
        })
        .collect()
}

/// Ids that are not numbers can't name a post either.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::NotFound)
}

fn can_edit(post: &Post, npub: &str) -> bool {
    match post.npub.as_deref() {
        Some(owner) => owner == npub,
        None => true,
    }
}

async fn editable_post(store: &Store, session: &SessionNpub, id: i64) -> AppResult<Post> {
    let Some(npub) = session.npub() else {
        return Err(AppError::bad_request("not logged in"));
    };

    let post = store.get_one_post(id).await?;
    if !can_edit(&post, npub) {
        return Err(AppError::bad_request("post does not belong to logged in npub"));
    }
    Ok(post)
}
