pub mod access_jwt;
pub mod bearer;
pub mod factory;
pub mod principal;

pub use access_jwt::AccessTokenDecoder;
pub use bearer::{BearerOptions, BearerStrategy};
pub use factory::build_bearer_strategy;
pub use principal::{Principal, UserTokenVerifier};
