pub mod attendance;
pub mod health;
pub mod parent_assignments;
pub mod photos;
pub mod sponsorships;
pub mod students;
