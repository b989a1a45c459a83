use sea_orm::prelude::DateTimeUtc;
use sea_orm::DeriveIntoActiveModel;
use crate::user::ActiveModel;

/// Fields supplied when an account is created. `password` must already be hashed.
#[derive(DeriveIntoActiveModel, PartialEq, Eq, Hash, Clone, Debug)]
pub struct UserModel {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
}
