pub mod auth;
pub mod cooldown;
pub mod rate_limit;
