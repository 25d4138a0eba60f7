pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod workflow;

use crate::middleware::cooldown::AdmitGuard;
use crate::services::{
    assignment_service::AssignmentService, attendance_service::AttendanceService,
    photo_service::PhotoService, sponsorship_service::SponsorshipService,
    student_service::StudentService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub student_service: StudentService,
    pub sponsorship_service: SponsorshipService,
    pub attendance_service: AttendanceService,
    pub photo_service: PhotoService,
    pub assignment_service: AssignmentService,
    pub admit_guard: AdmitGuard,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let student_service = StudentService::new(pool.clone());
        let sponsorship_service = SponsorshipService::new(pool.clone());
        let attendance_service = AttendanceService::new(pool.clone());
        let photo_service = PhotoService::new(pool.clone(), config.uploads_dir.clone());
        let assignment_service = AssignmentService::new(pool.clone());
        let admit_guard = AdmitGuard::new(std::time::Duration::from_secs(
            config.admit_cooldown_secs,
        ));

        Self {
            pool,
            student_service,
            sponsorship_service,
            attendance_service,
            photo_service,
            assignment_service,
            admit_guard,
        }
    }
}
