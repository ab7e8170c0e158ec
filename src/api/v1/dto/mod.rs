pub mod arts;
pub mod comments;
pub mod places;
pub mod votes;
