use crate::album::ActiveModel;
use sea_orm::prelude::Date;
use sea_orm::DeriveIntoActiveModel;

#[derive(DeriveIntoActiveModel, PartialEq, Eq, Hash, Clone, Debug)]
pub struct AlbumModel {
    pub title: String,
    pub artist: String,
    pub release_date: Date,
    pub genre: String,
}
