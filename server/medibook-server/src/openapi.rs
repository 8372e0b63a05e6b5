use crate::handlers::{appointments, auth, doctors, health};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI document for the public surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MediBook API",
        description = "Healthcare appointment booking backend"
    ),
    modifiers(&SecurityAddon),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::forgot_password,
        auth::reset_password,
        doctors::list_doctors,
        doctors::get_doctor,
        appointments::book_appointment,
        appointments::my_appointments,
        appointments::get_appointment,
        appointments::update_appointment_status,
    ),
    components(schemas(
        health::HealthResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::TokenResponse,
        auth::UserResponse,
        auth::ForgotPasswordRequest,
        auth::ResetPasswordRequest,
        auth::MessageResponse,
        appointments::UpdateStatusRequest,
        ::appointments::Appointment,
        ::appointments::AppointmentStatus,
        ::appointments::BookingType,
        ::appointments::BookAppointmentRequest,
        provider_directory::DoctorProfile,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Registration, login, and password reset"),
        (name = "doctors", description = "Professional directory"),
        (name = "appointments", description = "Appointment booking"),
    )
)]
pub struct ApiDoc;
