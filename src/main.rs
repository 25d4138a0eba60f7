use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use schooladmin_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let staff_api = Router::new()
        .route(
            "/api/students",
            get(routes::students::list_students).post(routes::students::create_student),
        )
        .route(
            "/api/students/:id",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        .route(
            "/api/students/:id/eligibility",
            post(routes::students::review_eligibility),
        )
        .route(
            "/api/sponsorships",
            get(routes::sponsorships::list_sponsorships),
        )
        .route(
            "/api/sponsorships/:id",
            get(routes::sponsorships::get_sponsorship).put(routes::sponsorships::update_sponsorship),
        )
        .route(
            "/api/sponsorships/:id/approve",
            post(routes::sponsorships::approve_sponsorship),
        )
        .route(
            "/api/sponsorships/:id/reject",
            post(routes::sponsorships::reject_sponsorship),
        )
        .route(
            "/api/attendance",
            get(routes::attendance::list_attendance).post(routes::attendance::mark_attendance),
        )
        .route(
            "/api/attendance/summary",
            get(routes::attendance::attendance_summary),
        )
        .route(
            "/api/attendance/:id",
            put(routes::attendance::update_attendance),
        )
        .route(
            "/api/parent-assignments",
            get(routes::parent_assignments::list_assignments)
                .post(routes::parent_assignments::create_assignment),
        )
        .route(
            "/api/parent-assignments/:parent_id/students/:student_id",
            delete(routes::parent_assignments::delete_assignment),
        )
        .route("/api/photos", get(routes::photos::list_photos))
        .route("/api/photos/stats", get(routes::photos::photo_stats))
        .route(
            "/api/photos/profile/:id",
            post(routes::photos::upload_profile_photo),
        )
        .route(
            "/api/photos/family/:id",
            post(routes::photos::upload_family_photo),
        )
        .route(
            "/api/photos/passport/:id",
            post(routes::photos::upload_passport_photo),
        )
        .route(
            "/api/dashboard/stats",
            get(routes::students::get_dashboard_stats),
        )
        .layer(axum::middleware::from_fn_with_state(
            schooladmin_backend::middleware::rate_limit::new_rps_state(config.admin_rps),
            schooladmin_backend::middleware::rate_limit::rps_middleware,
        ))
        .layer(axum::middleware::from_fn(
            schooladmin_backend::middleware::auth::require_bearer_auth,
        ));

    // Sponsor- and parent-facing surface.
    let public_api = Router::new()
        .route(
            "/api/students/available",
            get(routes::students::list_available_students),
        )
        .route(
            "/api/sponsorships",
            post(routes::sponsorships::request_sponsorship),
        )
        .route(
            "/api/parent-assignments/:parent_id",
            get(routes::parent_assignments::students_for_parent),
        )
        .layer(axum::middleware::from_fn_with_state(
            schooladmin_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            schooladmin_backend::middleware::rate_limit::rps_middleware,
        ))
        .layer(axum::middleware::from_fn(
            schooladmin_backend::middleware::auth::require_bearer_auth,
        ));

    let admin_api = Router::new()
        .route(
            "/api/photos/cleanup-orphaned",
            post(routes::photos::cleanup_orphaned_photos),
        )
        .route("/api/photos/:filename", delete(routes::photos::delete_photo))
        .layer(axum::middleware::from_fn_with_state(
            schooladmin_backend::middleware::rate_limit::new_rps_state(config.admin_rps),
            schooladmin_backend::middleware::rate_limit::rps_middleware,
        ))
        .layer(axum::middleware::from_fn(
            schooladmin_backend::middleware::auth::require_admin,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(staff_api)
        .merge(public_api)
        .merge(admin_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(config.uploads_dir.clone()),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
