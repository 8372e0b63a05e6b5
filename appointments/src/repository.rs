use crate::error::Result;
use crate::models::{Appointment, AppointmentStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence contract for appointment records.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Appointments assigned to a professional, newest first.
    async fn list_for_professional(&self, professional_id: Uuid) -> Result<Vec<Appointment>>;

    /// Appointments booked by a patient, newest first.
    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>>;

    /// Write a status value. Returns the updated record, or `None` when the
    /// id does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>>;
}

/// In-memory appointment store for the test suites.
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAppointmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn list_for_professional(&self, professional_id: Uuid) -> Result<Vec<Appointment>> {
        let mut list: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.professional_id == professional_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        let mut list: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.get_mut(&id).map(|appointment| {
            appointment.status = status;
            appointment.updated_at = Utc::now();
            appointment.clone()
        }))
    }
}
