pub mod paths;

use crate::handlers::{appointments, auth, doctors, health};
use crate::server::MedibookServer;
use axum::routing::{get, post, put};
use axum::Router;

/// Create health check routes.
pub fn health_routes() -> Router<MedibookServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Create authentication routes.
pub fn auth_routes() -> Router<MedibookServer> {
    Router::new()
        .route(paths::auth::REGISTER, post(auth::register))
        .route(paths::auth::LOGIN, post(auth::login))
        .route(paths::auth::ME, get(auth::me))
        .route(paths::auth::FORGOT_PASSWORD, post(auth::forgot_password))
        .route(paths::auth::RESET_PASSWORD, post(auth::reset_password))
}

/// Create doctor directory routes.
pub fn doctor_routes() -> Router<MedibookServer> {
    Router::new()
        .route(paths::doctors::DOCTORS, get(doctors::list_doctors))
        .route(paths::doctors::DOCTOR_BY_ID, get(doctors::get_doctor))
}

/// Create appointment routes.
pub fn appointment_routes() -> Router<MedibookServer> {
    Router::new()
        .route(
            paths::appointments::APPOINTMENTS,
            post(appointments::book_appointment),
        )
        .route(
            paths::appointments::MY_APPOINTMENTS,
            get(appointments::my_appointments),
        )
        .route(
            paths::appointments::APPOINTMENT_BY_ID,
            get(appointments::get_appointment),
        )
        .route(
            paths::appointments::APPOINTMENT_STATUS,
            put(appointments::update_appointment_status),
        )
}

/// All routes, merged.
pub fn create_routes() -> Router<MedibookServer> {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(doctor_routes())
        .merge(appointment_routes())
}
