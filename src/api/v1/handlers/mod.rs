pub mod arts;
pub mod comments;
pub mod health;
pub mod places;
pub mod votes;
