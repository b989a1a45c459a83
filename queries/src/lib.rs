use entities::album_local_model::AlbumModel;
use entities::event_local_model::EventModel;
use entities::prelude::{Album, Event, Session, User, UserFavoriteAlbum};
use entities::user_local_model::UserModel;
use entities::{album, event, session, user, user_favorite_album};
use log::info;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub async fn get_all_events(db: &DatabaseConnection) -> Result<Vec<event::Model>, DbErr> {
    Event::find().order_by_asc(event::Column::Id).all(db).await
}

pub async fn get_event_by_id(
    db: &DatabaseConnection,
    event_id: i32,
) -> Result<Option<event::Model>, DbErr> {
    Event::find_by_id(event_id).one(db).await
}

pub async fn add_event(db: &DatabaseConnection, event: EventModel) -> Result<event::Model, DbErr> {
    event.into_active_model().insert(db).await
}

pub async fn get_album_by_id(
    db: &DatabaseConnection,
    album_id: i32,
) -> Result<Option<album::Model>, DbErr> {
    Album::find_by_id(album_id).one(db).await
}

pub async fn add_album(db: &DatabaseConnection, album: AlbumModel) -> Result<album::Model, DbErr> {
    album.into_active_model().insert(db).await
}

/// Removes an album together with every favorite pointing at it.
pub async fn delete_album_by_id(db: &DatabaseConnection, album_id: i32) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    UserFavoriteAlbum::delete_many()
        .filter(user_favorite_album::Column::AlbumId.eq(album_id))
        .exec(&txn)
        .await?;
    Album::delete_by_id(album_id).exec(&txn).await?;
    txn.commit().await
}

pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<user::Model>, DbErr> {
    User::find_by_id(user_id).one(db).await
}

pub async fn add_user(db: &DatabaseConnection, user: UserModel) -> Result<user::Model, DbErr> {
    let created = user.into_active_model().insert(db).await?;
    info!("Created user {} with id {}", created.username, created.id);
    Ok(created)
}

pub async fn set_last_login(
    db: &DatabaseConnection,
    user: user::Model,
    when: DateTimeUtc,
) -> Result<user::Model, DbErr> {
    let mut active = user.into_active_model();
    active.last_login = Set(Some(when));
    active.update(db).await
}

pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn update_user_profile(
    db: &DatabaseConnection,
    user: user::Model,
    changes: ProfileChanges,
) -> Result<user::Model, DbErr> {
    let mut active = user.into_active_model();
    active.username = Set(changes.username);
    active.email = Set(changes.email);
    active.first_name = Set(changes.first_name);
    active.last_name = Set(changes.last_name);
    active.update(db).await
}

/// Removes a user, their favorites and their sessions in one transaction.
pub async fn delete_user_by_id(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    UserFavoriteAlbum::delete_many()
        .filter(user_favorite_album::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Session::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    User::delete_by_id(user_id).exec(&txn).await?;
    txn.commit().await
}

/// Fails with a unique constraint violation when the pair is already recorded.
pub async fn add_favorite_album(
    db: &DatabaseConnection,
    user_id: i32,
    album_id: i32,
) -> Result<user_favorite_album::Model, DbErr> {
    user_favorite_album::ActiveModel {
        user_id: Set(user_id),
        album_id: Set(album_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn get_favorite_albums(
    db: &DatabaseConnection,
    user: &user::Model,
) -> Result<Vec<album::Model>, DbErr> {
    user.find_related(Album)
        .order_by_asc(album::Column::Title)
        .all(db)
        .await
}

fn session_active_model(stored: session::Model) -> session::ActiveModel {
    session::ActiveModel {
        id: Set(stored.id),
        user_id: Set(stored.user_id),
        data: Set(stored.data),
        expiry_date: Set(stored.expiry_date),
    }
}

/// Inserts a brand new session. Fails with a unique constraint violation when
/// the id is already taken.
pub async fn insert_session(db: &DatabaseConnection, stored: session::Model) -> Result<(), DbErr> {
    Session::insert(session_active_model(stored))
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Writes a session, replacing whatever was stored under the same id.
pub async fn save_session(db: &DatabaseConnection, stored: session::Model) -> Result<(), DbErr> {
    Session::insert(session_active_model(stored))
        .on_conflict(
            OnConflict::column(session::Column::Id)
                .update_columns([
                    session::Column::UserId,
                    session::Column::Data,
                    session::Column::ExpiryDate,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Loads a live session. Expired sessions are removed and never load.
pub async fn load_session(
    db: &DatabaseConnection,
    session_id: &str,
    now: DateTimeUtc,
) -> Result<Option<session::Model>, DbErr> {
    match Session::find_by_id(session_id.to_owned()).one(db).await? {
        Some(stored) if stored.expiry_date <= now => {
            stored.delete(db).await?;
            Ok(None)
        }
        found => Ok(found),
    }
}

pub async fn delete_session(db: &DatabaseConnection, session_id: &str) -> Result<(), DbErr> {
    Session::delete_by_id(session_id.to_owned()).exec(db).await?;
    Ok(())
}

/// Sweeps every session that expired at or before `now`.
pub async fn delete_expired_sessions(
    db: &DatabaseConnection,
    now: DateTimeUtc,
) -> Result<u64, DbErr> {
    let result = Session::delete_many()
        .filter(session::Column::ExpiryDate.lte(now))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
