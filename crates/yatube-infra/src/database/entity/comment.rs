//! Comment entity for SeaORM.

use sea_orm::entity::prelude::*;

use yatube_core::domain::Comment;
use yatube_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub created: DateTimeWithTimeZone,
    pub post_id: i32,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn into_domain(
    model: Model,
    author: Option<super::user::Model>,
) -> Result<Comment, RepoError> {
    let author = author
        .ok_or_else(|| RepoError::Query(format!("comment {} has no author row", model.id)))?;

    Ok(Comment {
        id: model.id,
        text: model.text,
        post_id: model.post_id,
        created: model.created.into(),
        author_id: model.author_id,
        author: author.username,
    })
}
