use appointments::error::Result;
use appointments::models::{Appointment, AppointmentStatus, BookingType};
use appointments::repository::AppointmentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, professional_id, patient_id, appointment_date, \
                                   appointment_time, booking_type, symptoms, previous_meds, \
                                   report_image, status, fee, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    professional_id: Uuid,
    patient_id: Uuid,
    appointment_date: String,
    appointment_time: String,
    booking_type: String,
    symptoms: String,
    previous_meds: Option<String>,
    report_image: Option<String>,
    status: String,
    fee: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment> {
        let booking_type = self
            .booking_type
            .parse::<BookingType>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status = self
            .status
            .parse::<AppointmentStatus>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Appointment {
            id: self.id,
            professional_id: self.professional_id,
            patient_id: self.patient_id,
            appointment_date: self.appointment_date,
            appointment_time: self.appointment_time,
            booking_type,
            symptoms: self.symptoms,
            previous_meds: self.previous_meds,
            report_image: self.report_image,
            status,
            fee: self.fee,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Appointment store over PostgreSQL.
pub struct PostgresAppointmentRepository {
    pool: PgPool,
}

impl PostgresAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, id: Uuid) -> Result<Vec<Appointment>> {
        let query = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE {column} = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AppointmentRow::into_appointment)
            .collect()
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        sqlx::query(
            "INSERT INTO appointments (id, professional_id, patient_id, appointment_date, \
             appointment_time, booking_type, symptoms, previous_meds, report_image, status, \
             fee, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(appointment.id)
        .bind(appointment.professional_id)
        .bind(appointment.patient_id)
        .bind(&appointment.appointment_date)
        .bind(&appointment.appointment_time)
        .bind(appointment.booking_type.as_str())
        .bind(&appointment.symptoms)
        .bind(&appointment.previous_meds)
        .bind(&appointment.report_image)
        .bind(appointment.status.as_str())
        .bind(appointment.fee)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(AppointmentRow::into_appointment)
            .transpose()
    }

    async fn list_for_professional(&self, professional_id: Uuid) -> Result<Vec<Appointment>> {
        self.list_where("professional_id", professional_id).await
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        self.list_where("patient_id", patient_id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let query = format!(
            "UPDATE appointments SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(AppointmentRow::into_appointment)
            .transpose()
    }
}
