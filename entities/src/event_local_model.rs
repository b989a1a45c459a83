use crate::event::ActiveModel;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::DeriveIntoActiveModel;

#[derive(DeriveIntoActiveModel, PartialEq, Eq, Hash, Clone, Debug)]
pub struct EventModel {
    pub title: String,
    pub date: DateTimeUtc,
    pub venue: String,
    pub description: String,
}
