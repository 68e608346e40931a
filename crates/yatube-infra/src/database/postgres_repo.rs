//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use yatube_core::domain::{
    Comment, Follow, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post, PostChanges,
    User,
};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Page, PageRequest};
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

async fn load_user(db: &sea_orm::DbConn, id: i32) -> Result<Option<user::Model>, RepoError> {
    UserEntity::find_by_id(id).one(db).await.map_err(map_db_err)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            date_joined: Set(new.date_joined.into()),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Group>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn create(&self, new: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            slug: Set(new.slug),
            description: Set(new.description),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let count = PostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let rows = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let items = rows
            .into_iter()
            .map(|(model, author)| post::into_domain(model, author))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { count, items })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(|(model, author)| post::into_domain(model, author))
            .transpose()
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            text: Set(new.text),
            pub_date: Set(new.pub_date.into()),
            image: Set(new.image),
            group_id: Set(new.group_id),
            author_id: Set(new.author_id),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        let author = load_user(&self.db, model.author_id).await?;
        post::into_domain(model, author)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let model = self.require_model(id).await?;

        let model = if changes.is_empty() {
            model
        } else {
            let mut active = model.into_active_model();
            if let Some(text) = changes.text {
                active.text = Set(text);
            }
            if let Some(image) = changes.image {
                active.image = Set(image);
            }
            if let Some(group_id) = changes.group_id {
                active.group_id = Set(group_id);
            }
            active.update(&self.db).await.map_err(map_db_err)?
        };

        let author = load_user(&self.db, model.author_id).await?;
        post::into_domain(model, author)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        // comments go with the post via ON DELETE CASCADE
        self.delete_by_id(id).await
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(model, author)| comment::into_domain(model, author))
            .collect()
    }

    async fn find_in_post(&self, post_id: i32, id: i32) -> Result<Option<Comment>, RepoError> {
        let row = CommentEntity::find()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(|(model, author)| comment::into_domain(model, author))
            .transpose()
    }

    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            text: Set(new.text),
            created: Set(new.created.into()),
            post_id: Set(new.post_id),
            author_id: Set(new.author_id),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        let author = load_user(&self.db, model.author_id).await?;
        comment::into_domain(model, author)
    }

    async fn update_text(&self, id: i32, text: String) -> Result<Comment, RepoError> {
        let mut active = self.require_model(id).await?.into_active_model();
        active.text = Set(text);
        let model = active.update(&self.db).await.map_err(map_db_err)?;

        let author = load_user(&self.db, model.author_id).await?;
        comment::into_domain(model, author)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.delete_by_id(id).await
    }
}

/// Escape `LIKE` wildcards so terms match literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn list_for_user(
        &self,
        user_id: i32,
        terms: &[String],
    ) -> Result<Vec<Follow>, RepoError> {
        let Some(follower) = load_user(&self.db, user_id).await? else {
            return Ok(Vec::new());
        };

        let mut query = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .order_by_asc(follow::Column::Id);

        for term in terms {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((UserEntity, user::Column::Username))))
                    .like(LikeExpr::new(like_pattern(term)).escape('\\')),
            );
        }

        let rows = query
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(model, following)| {
                let following = following.ok_or_else(|| {
                    RepoError::Query(format!("follow {} has no followee row", model.id))
                })?;
                Ok(Follow {
                    id: model.id,
                    user_id: model.user_id,
                    user: follower.username.clone(),
                    following_id: model.following_id,
                    following: following.username,
                })
            })
            .collect()
    }

    async fn exists(&self, user_id: i32, following_id: i32) -> Result<bool, RepoError> {
        let count = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn create(&self, new: NewFollow) -> Result<Follow, RepoError> {
        let model = follow::ActiveModel {
            id: NotSet,
            user_id: Set(new.user_id),
            following_id: Set(new.following_id),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        let user = load_user(&self.db, model.user_id)
            .await?
            .ok_or(RepoError::NotFound)?;
        let following = load_user(&self.db, model.following_id)
            .await?
            .ok_or(RepoError::NotFound)?;

        Ok(Follow {
            id: model.id,
            user_id: model.user_id,
            user: user.username,
            following_id: model.following_id,
            following: following.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Bob"), "%bob%");
        assert_eq!(like_pattern("a_b%"), "%a\\_b\\%%");
    }
}
