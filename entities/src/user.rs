use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// PHC-formatted argon2 hash, never the raw password
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_favorite_album::Entity")]
    UserFavoriteAlbum,
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::user_favorite_album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFavoriteAlbum.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_favorite_album::Relation::Album.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_favorite_album::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
