//! User domain model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Row of the `utilisateurs` table.
///
/// `id` is 0 until the record has been persisted; the database assigns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct User {
    pub id: i32,
    #[sqlx(rename = "nom")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} - {}", self.id, self.name, self.email)
    }
}

/// Input for creating a user (also the element type of bulk imports)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

impl From<NewUser> for User {
    fn from(input: NewUser) -> Self {
        User::new(input.name, input.email)
    }
}
