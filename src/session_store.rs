use axum::async_trait;
use chrono::{DateTime, Utc};
use entities::session;
use log::debug;
use sea_orm::{DatabaseConnection, DbErr};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

use crate::error::is_unique_violation;
use crate::session::USER_ID_KEY;

/// Keeps session records in the `session` table through sea-orm.
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    connection: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

fn backend(err: DbErr) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

fn to_stored(record: &Record) -> session_store::Result<session::Model> {
    let expiry_date = DateTime::<Utc>::from_timestamp(
        record.expiry_date.unix_timestamp(),
        record.expiry_date.nanosecond(),
    )
    .ok_or_else(|| {
        session_store::Error::Encode(format!("Expiry out of range: {}", record.expiry_date))
    })?;
    let data =
        serde_json::to_string(record).map_err(|err| session_store::Error::Encode(err.to_string()))?;
    let user_id = record
        .data
        .get(USER_ID_KEY)
        .and_then(serde_json::Value::as_i64)
        .and_then(|id| i32::try_from(id).ok());
    Ok(session::Model {
        id: record.id.to_string(),
        user_id,
        data,
        expiry_date,
    })
}

#[async_trait]
impl SessionStore for SeaOrmStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            match queries::insert_session(&self.connection, to_stored(record)?).await {
                Ok(()) => return Ok(()),
                Err(err) if is_unique_violation(&err) => {
                    debug!("Session id collision, drawing a new one");
                    record.id = Id::default();
                }
                Err(err) => return Err(backend(err)),
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        queries::save_session(&self.connection, to_stored(record)?)
            .await
            .map_err(backend)
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let stored = queries::load_session(&self.connection, &session_id.to_string(), Utc::now())
            .await
            .map_err(backend)?;
        stored
            .map(|stored| {
                serde_json::from_str(&stored.data)
                    .map_err(|err| session_store::Error::Decode(err.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        queries::delete_session(&self.connection, &session_id.to_string())
            .await
            .map_err(backend)
    }
}
