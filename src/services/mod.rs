pub mod assignment_service;
pub mod attendance_service;
pub mod photo_service;
pub mod sponsorship_service;
pub mod student_service;
