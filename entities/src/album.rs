use std::fmt;

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub artist: String,
    pub release_date: Date,
    pub genre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_favorite_album::Entity")]
    UserFavoriteAlbum,
}

impl Related<super::user_favorite_album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFavoriteAlbum.def()
    }
}

// Users who favorited this album, through the join table
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_favorite_album::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_favorite_album::Relation::Album.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
