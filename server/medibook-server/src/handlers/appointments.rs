use crate::error::ApiResult;
use crate::middleware::AuthContext;
use crate::server::MedibookServer;
use appointments::{Appointment, AppointmentStatus, BookAppointmentRequest};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Status write payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Book an appointment for the authenticated account.
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "appointments",
    security(("bearer_token" = [])),
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid booking"),
        (status = 401, description = "Missing or invalid bearer token"),
    )
)]
pub async fn book_appointment(
    State(server): State<MedibookServer>,
    ctx: AuthContext,
    Json(request): Json<BookAppointmentRequest>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let appointment = server.appointments.book(ctx.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Appointments visible to the authenticated account.
#[utoipa::path(
    get,
    path = "/api/appointments/me",
    tag = "appointments",
    security(("bearer_token" = [])),
    responses((status = 200, description = "Own appointments", body = [Appointment]))
)]
pub async fn my_appointments(
    State(server): State<MedibookServer>,
    ctx: AuthContext,
) -> ApiResult<Json<Vec<Appointment>>> {
    let list = server
        .appointments
        .list_for_user(ctx.user_id, ctx.role)
        .await?;
    Ok(Json(list))
}

/// One appointment, visible to its parties and admins only.
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "appointments",
    security(("bearer_token" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Appointment not found"),
    )
)]
pub async fn get_appointment(
    State(server): State<MedibookServer>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Appointment>> {
    let appointment = server
        .appointments
        .get(id, ctx.user_id, ctx.role)
        .await?;
    Ok(Json(appointment))
}

/// Write an appointment status.
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    tag = "appointments",
    security(("bearer_token" = [])),
    request_body = UpdateStatusRequest,
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 404, description = "Appointment not found"),
    )
)]
pub async fn update_appointment_status(
    State(server): State<MedibookServer>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Appointment>> {
    let appointment = server
        .appointments
        .update_status(id, ctx.user_id, ctx.role, request.status)
        .await?;
    Ok(Json(appointment))
}
