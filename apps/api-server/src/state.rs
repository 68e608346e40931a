//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::pagination::PageParams;
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PasswordService, PostRepository,
    UserRepository,
};
use yatube_core::services::{
    AccountService, CommentService, FollowService, GroupService, PostService,
};
use yatube_infra::InMemoryStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub groups: GroupService,
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub pagination: PageParams,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: yatube_infra::database::DbConn) -> Self {
        use yatube_infra::database::{
            PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
            PostgresPostRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db)),
        }
    }
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(
        config: &AppConfig,
        passwords: Arc<dyn PasswordService>,
    ) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            use anyhow::Context;
            use migration::MigratorTrait;

            let db = yatube_infra::init_connection(db_config)
                .await
                .context("failed to connect to the database")?;

            if config.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .context("failed to apply migrations")?;
                tracing::info!("Database migrations applied");
            }

            tracing::info!("Application state initialized (postgres)");
            return Ok(Self::from_repositories(
                Repositories::postgres(db),
                passwords,
                config.pagination,
            ));
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL is set but the postgres feature is disabled");
        }

        tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
        Ok(Self::in_memory(
            Arc::new(InMemoryStore::new()),
            passwords,
            config.pagination,
        ))
    }

    /// State over an in-memory store.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        passwords: Arc<dyn PasswordService>,
        pagination: PageParams,
    ) -> Self {
        Self::from_repositories(Repositories::memory(store), passwords, pagination)
    }

    fn from_repositories(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        pagination: PageParams,
    ) -> Self {
        Self {
            accounts: AccountService::new(repos.users.clone(), passwords),
            groups: GroupService::new(repos.groups.clone()),
            posts: PostService::new(repos.posts.clone(), repos.groups),
            comments: CommentService::new(repos.comments, repos.posts),
            follows: FollowService::new(repos.follows, repos.users),
            pagination,
        }
    }
}
