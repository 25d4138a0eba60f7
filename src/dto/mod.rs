pub mod assignment_dto;
pub mod attendance_dto;
pub mod photo_dto;
pub mod sponsorship_dto;
pub mod student_dto;
