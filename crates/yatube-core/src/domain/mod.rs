//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, NewComment};
pub use follow::{Follow, NewFollow};
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostDraft};
pub use user::{NewUser, User};
