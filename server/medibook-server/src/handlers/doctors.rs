use crate::error::ApiResult;
use crate::server::MedibookServer;
use axum::extract::{Path, Query, State};
use axum::Json;
use provider_directory::{DoctorFilter, DoctorProfile};

/// List verified doctors, with optional filters.
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "doctors",
    params(DoctorFilter),
    responses((status = 200, description = "Matching doctors", body = [DoctorProfile]))
)]
pub async fn list_doctors(
    State(server): State<MedibookServer>,
    Query(filter): Query<DoctorFilter>,
) -> ApiResult<Json<Vec<DoctorProfile>>> {
    let doctors = server.directory.list_doctors(&filter).await?;
    Ok(Json(doctors))
}

/// Get a single doctor by id.
///
/// The id arrives as an opaque string: a malformed id is answered with the
/// same 404 as an unknown one.
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "doctors",
    params(("id" = String, Path, description = "Doctor account id")),
    responses(
        (status = 200, description = "Doctor profile", body = DoctorProfile),
        (status = 404, description = "Doctor not found"),
    )
)]
pub async fn get_doctor(
    State(server): State<MedibookServer>,
    Path(id): Path<String>,
) -> ApiResult<Json<DoctorProfile>> {
    let doctor = server.directory.get_doctor(&id).await?;
    Ok(Json(doctor))
}
