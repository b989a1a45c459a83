use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use log::info;

use crate::session::AuthSession;

pub const LOGIN_URL: &str = "/login/";

/// Lets authenticated callers through and sends everyone else to the login
/// page, remembering where they were headed.
pub async fn login_required(session: AuthSession, request: Request, next: Next) -> Response {
    if !session.is_authenticated() {
        let path = request.uri().path();
        info!("Anonymous request for {}, redirecting to login", path);
        return Redirect::to(&format!("{}?next={}", LOGIN_URL, path)).into_response();
    }

    // Carry on my wayward son
    next.run(request).await
}

/// Only same-site absolute paths are acceptable redirect targets after login.
/// Browsers drop tabs and newlines from URLs, so anything outside printable
/// ASCII could turn a local path into a foreign one.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|target| {
        target.starts_with('/')
            && !target.starts_with("//")
            && !target.contains('\\')
            && target.bytes().all(|b| b.is_ascii_graphic())
    })
}
