pub mod appresult;
pub mod auth;
pub mod config;
pub mod identity;
pub mod index;
pub mod markdown;
pub mod posts;
pub mod relay;
pub mod res;
pub mod session;
pub mod store;

use std::sync::Arc;

use axum::{extract::FromRef, middleware, Router};
use tower_http::services::ServeDir;

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use relay::{NostrRelays, RelayPublisher};
pub use store::Store;

pub type Relays = Arc<dyn RelayPublisher>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub relays: Relays,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, relays: Relays, config: Config) -> Self {
        Self {
            store,
            relays,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(index::router())
        .merge(auth::router())
        .merge(posts::router());

    if state.config.debug {
        app = app.nest_service("/static", ServeDir::new(&state.config.static_dir));
    }

    app.layer(middleware::from_fn(session::session_layer))
        .with_state(state)
}
