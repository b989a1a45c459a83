use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use entities::user;
use entities::user_local_model::UserModel;
use log::{info, warn};
use queries::ProfileChanges;
use serde::Deserialize;

use crate::auth_middleware::{safe_next, LOGIN_URL};
use crate::error::{is_unique_violation, AppError};
use crate::forms::{
    Credentials, FormErrors, LoginForm, ProfileEditForm, RegistrationForm, Validate,
    DUPLICATE_USERNAME, INACTIVE_ACCOUNT, INVALID_LOGIN,
};
use crate::passwords::{hash_password, verify_password};
use crate::responses::{featured_albums, Page};
use crate::session::{self, AuthSession};
use crate::DatabaseState;

pub const LANDING_URL: &str = "/";
pub const HOME_URL: &str = "/home/";
pub const PROFILE_URL: &str = "/profile/";

#[derive(Deserialize, Default)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UnsubscribeForm {
    #[serde(default)]
    email: Option<String>,
}

/// Path ids are plain digits; anything else, signs included, is treated like
/// an unmatched route.
fn path_id(id: Result<Path<String>, PathRejection>, uri: &Uri) -> Result<i32, AppError> {
    id.ok()
        .filter(|Path(raw)| raw.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|Path(raw)| raw.parse().ok())
        .ok_or_else(|| AppError::NotFound(format!("No page at {}", uri.path())))
}

pub async fn landing(session: AuthSession) -> Response {
    if session.is_authenticated() {
        return Redirect::to(HOME_URL).into_response();
    }
    Page::Landing.into_response()
}

/// Access is checked by `login_required` before this runs.
pub async fn home() -> Page {
    Page::Home
}

pub async fn events(State(state): State<DatabaseState>) -> Result<Page, AppError> {
    let events = queries::get_all_events(&state.connection).await?;
    Ok(Page::Events { events })
}

pub async fn albums() -> Page {
    Page::Albums {
        albums: featured_albums(),
    }
}

pub async fn artists() -> Page {
    Page::Artists
}

// TODO: look the album up once album pages show more than the id
pub async fn album_detail(
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
) -> Result<Page, AppError> {
    let id = path_id(id, &uri)?;
    Ok(Page::AlbumDetail { id })
}

pub async fn event_detail(
    State(state): State<DatabaseState>,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
) -> Result<Page, AppError> {
    let id = path_id(id, &uri)?;
    let event = queries::get_event_by_id(&state.connection, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No event matching id {}", id)))?;
    Ok(Page::EventDetail { event })
}

/// Guests get the home page rather than a login prompt.
pub async fn subscribe(session: AuthSession) -> Page {
    if session.is_authenticated() {
        Page::Subscribe
    } else {
        Page::Home
    }
}

pub async fn unsubscribe_page() -> Page {
    Page::Unsubscribe {
        message: String::new(),
        message_type: None,
    }
}

/// A body that is missing or not a urlencoded form counts as no email.
pub async fn unsubscribe(form: Option<Form<UnsubscribeForm>>) -> Page {
    let email = form.and_then(|Form(form)| form.email);
    let page = Page::unsubscribe_result(email.as_deref());
    if let Some(email) = email.as_deref().filter(|email| !email.is_empty()) {
        info!("Unsubscribe requested for {}", email);
    }
    page
}

pub async fn login_page(session: AuthSession, Query(query): Query<NextQuery>) -> Response {
    if session.is_authenticated() {
        return Redirect::to(HOME_URL).into_response();
    }
    Page::Login {
        form: LoginForm {
            next: query.next,
            ..Default::default()
        },
        errors: FormErrors::default(),
    }
    .into_response()
}

async fn authenticate(
    state: &DatabaseState,
    credentials: &Credentials,
) -> Result<Option<user::Model>, AppError> {
    let user = queries::get_user_by_username(&state.connection, &credentials.username).await?;
    Ok(user.filter(|user| verify_password(&credentials.password, &user.password)))
}

pub async fn login_submit(
    State(state): State<DatabaseState>,
    session: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    let errors = match form.validate() {
        Ok(credentials) => {
            let mut errors = FormErrors::default();
            match authenticate(&state, &credentials).await? {
                Some(user) if user.is_active => {
                    let target = safe_next(form.next.as_deref()).unwrap_or(HOME_URL);
                    session::login(&state, &session, user).await?;
                    return Ok(Redirect::to(target).into_response());
                }
                Some(user) => {
                    warn!("Inactive user {} tried to log in", user.username);
                    errors.add_non_field(INACTIVE_ACCOUNT);
                }
                None => {
                    warn!("Failed login for user {}", credentials.username);
                    errors.add_non_field(INVALID_LOGIN);
                }
            }
            errors
        }
        Err(errors) => errors,
    };

    let form = LoginForm {
        password: String::new(),
        ..form
    };
    Ok(Page::Login { form, errors }.into_response())
}

pub async fn logout_view(session: AuthSession) -> Result<Redirect, AppError> {
    session::logout(&session).await?;
    Ok(Redirect::to(LANDING_URL))
}

pub async fn register_page(session: AuthSession) -> Response {
    if session.is_authenticated() {
        return Redirect::to(HOME_URL).into_response();
    }
    Page::Register {
        form: RegistrationForm::default(),
        errors: FormErrors::default(),
    }
    .into_response()
}

pub async fn register_submit(
    State(state): State<DatabaseState>,
    session: AuthSession,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    if session.is_authenticated() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    let errors = match form.validate() {
        Ok(account) => {
            let mut errors = FormErrors::default();
            let taken = queries::get_user_by_username(&state.connection, &account.username)
                .await?
                .is_some();
            if taken {
                errors.add("username", DUPLICATE_USERNAME);
            } else {
                let new_user = UserModel {
                    username: account.username,
                    password: hash_password(&account.password)?,
                    email: String::new(),
                    first_name: String::new(),
                    last_name: String::new(),
                    is_active: true,
                    date_joined: Utc::now(),
                };
                match queries::add_user(&state.connection, new_user).await {
                    Ok(user) => {
                        info!("Registered user {}", user.username);
                        session::login(&state, &session, user).await?;
                        return Ok(Redirect::to(HOME_URL).into_response());
                    }
                    // Lost a race with a concurrent registration
                    Err(err) if is_unique_violation(&err) => {
                        errors.add("username", DUPLICATE_USERNAME);
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            errors
        }
        Err(errors) => errors,
    };

    let form = RegistrationForm {
        username: form.username,
        ..Default::default()
    };
    Ok(Page::Register { form, errors }.into_response())
}

pub async fn profile_page(
    State(state): State<DatabaseState>,
    session: AuthSession,
) -> Result<Response, AppError> {
    let Some(user) = session.user() else {
        return Ok(Redirect::to(LOGIN_URL).into_response());
    };
    let favorites = queries::get_favorite_albums(&state.connection, user).await?;
    Ok(Page::Profile {
        form: ProfileEditForm::from_user(user),
        errors: FormErrors::default(),
        favorites,
    }
    .into_response())
}

pub async fn profile_submit(
    State(state): State<DatabaseState>,
    session: AuthSession,
    Form(form): Form<ProfileEditForm>,
) -> Result<Response, AppError> {
    let Some(user) = session.user().cloned() else {
        return Ok(Redirect::to(LOGIN_URL).into_response());
    };

    let errors = match form.validate() {
        Ok(update) => {
            let mut errors = FormErrors::default();
            if update.username != user.username
                && queries::get_user_by_username(&state.connection, &update.username)
                    .await?
                    .is_some()
            {
                errors.add("username", DUPLICATE_USERNAME);
            } else {
                let changes = ProfileChanges {
                    username: update.username,
                    email: update.email,
                    first_name: update.first_name,
                    last_name: update.last_name,
                };
                match queries::update_user_profile(&state.connection, user.clone(), changes).await
                {
                    Ok(updated) => {
                        info!("User {} updated their profile", updated.username);
                        return Ok(Redirect::to(PROFILE_URL).into_response());
                    }
                    Err(err) if is_unique_violation(&err) => {
                        errors.add("username", DUPLICATE_USERNAME);
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            errors
        }
        Err(errors) => errors,
    };

    let favorites = queries::get_favorite_albums(&state.connection, &user).await?;
    Ok(Page::Profile {
        form,
        errors,
        favorites,
    }
    .into_response())
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No page at {}", uri.path()))
}
