use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use entities::user;
use log::info;
use tower_sessions::Session;

use crate::error::AppError;
use crate::DatabaseState;

pub const SESSION_COOKIE: &str = "sessionid";
/// Session key holding the logged in user's id.
pub const USER_ID_KEY: &str = "_auth_user_id";

/// The caller's session together with the user it is logged in as.
///
/// Handlers take this as an extractor instead of consulting any global state.
/// An unknown, expired or missing session, or one whose user has gone or been
/// deactivated, is anonymous.
#[derive(Clone, Debug)]
pub struct AuthSession {
    session: Session,
    user: Option<user::Model>,
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&user::Model> {
        self.user.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<DatabaseState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DatabaseState,
    ) -> Result<Self, Self::Rejection> {
        // Middleware and handler both ask for it; resolve once per request
        if let Some(auth) = parts.extensions.get::<AuthSession>() {
            return Ok(auth.clone());
        }
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, reason)| AppError::SessionUnavailable(reason))?;
        let user = match session.get::<i32>(USER_ID_KEY).await? {
            Some(user_id) => queries::get_user_by_id(&state.connection, user_id)
                .await?
                .filter(|user| user.is_active),
            None => None,
        };
        let auth = AuthSession { session, user };
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

/// Binds the session to `user` under a fresh id. The session layer sends the
/// new cookie with the response.
pub async fn login(
    state: &DatabaseState,
    auth: &AuthSession,
    user: user::Model,
) -> Result<(), AppError> {
    auth.session.cycle_id().await?;
    auth.session.insert(USER_ID_KEY, user.id).await?;
    let user = queries::set_last_login(&state.connection, user, Utc::now()).await?;
    info!("User {} logged in", user.username);
    Ok(())
}

/// Ends the session, if there is one; the session layer clears the cookie.
pub async fn logout(auth: &AuthSession) -> Result<(), AppError> {
    auth.session.flush().await?;
    if let Some(user) = auth.user() {
        info!("User {} logged out", user.username);
    }
    Ok(())
}
