pub mod attendance;
pub mod photo;
pub mod sponsorship;
pub mod student;
pub mod user;
