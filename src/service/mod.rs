//! Business logic layer

pub mod player;
pub mod user;

pub use player::PlayerService;
pub use user::UserService;
