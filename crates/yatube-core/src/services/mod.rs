//! Resource services - query scoping, create-time injection and object
//! lookup for each resource exposed by the API.

mod account;
mod comment;
mod follow;
mod group;
mod post;

pub use account::{AccountService, Registration};
pub use comment::CommentService;
pub use follow::{FollowService, search_terms};
pub use group::GroupService;
pub use post::PostService;
