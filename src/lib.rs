use std::path::Path;

use axum::routing::get;
use axum::{middleware, Router};
use chrono::Duration;
use sea_orm::DatabaseConnection;
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::auth_middleware::login_required;
use crate::endpoint_handlers::{
    album_detail, albums, artists, event_detail, events, home, landing, login_page, login_submit,
    logout_view, not_found, profile_page, profile_submit, register_page, register_submit,
    subscribe, unsubscribe, unsubscribe_page,
};
use crate::session::SESSION_COOKIE;
use crate::session_store::SeaOrmStore;

pub mod auth_middleware;
pub mod config;
pub mod endpoint_handlers;
pub mod error;
pub mod forms;
pub mod passwords;
pub mod responses;
pub mod session;
pub mod session_store;

#[derive(Clone)]
pub struct DatabaseState {
    pub connection: DatabaseConnection,
    /// How long an untouched session stays valid
    pub session_age: Duration,
}

impl DatabaseState {
    pub fn new(connection: DatabaseConnection, session_age_seconds: i64) -> Self {
        Self {
            connection,
            session_age: Duration::seconds(session_age_seconds),
        }
    }
}

pub fn build_router(state: DatabaseState, static_dir: impl AsRef<Path>) -> Router {
    let sessions = SessionManagerLayer::new(SeaOrmStore::new(state.connection.to_owned()))
        .with_name(SESSION_COOKIE)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            state.session_age.num_seconds(),
        )));

    let authenticated: Router<DatabaseState> = Router::new()
        .route("/home/", get(home))
        .route("/profile/", get(profile_page).post(profile_submit))
        .layer(middleware::from_fn_with_state(
            state.to_owned(),
            login_required,
        ));

    Router::new()
        .route("/", get(landing))
        .route("/login/", get(login_page).post(login_submit))
        .route("/logout/", get(logout_view))
        .route("/register/", get(register_page).post(register_submit))
        .route("/albums/", get(albums))
        .route("/artist/", get(artists))
        .route("/event/", get(events))
        .route("/subscribe/", get(subscribe))
        .route("/unsubscribe/", get(unsubscribe_page).post(unsubscribe))
        .route("/album/:id/", get(album_detail))
        .route("/event/:id/", get(event_detail))
        .merge(authenticated)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .layer(sessions)
        .with_state(state)
}
