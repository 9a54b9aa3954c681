mod dashboard;
mod login;
mod logout;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/logout", get(logout::logout))
        .route("/dashboard", get(dashboard::dashboard))
}
