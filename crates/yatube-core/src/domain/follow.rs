use serde::{Deserialize, Serialize};

/// Directed follow edge: `user` follows `following`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i32,
    pub user_id: i32,
    pub user: String,
    pub following_id: i32,
    pub following: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewFollow {
    pub user_id: i32,
    pub following_id: i32,
}
