//! Domain models for userdb

pub mod player;
pub mod user;

pub use player::*;
pub use user::*;
