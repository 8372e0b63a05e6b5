use crate::error::{AppointmentError, Result};
use crate::models::{Appointment, AppointmentStatus, BookAppointmentRequest, BookingType};
use crate::repository::AppointmentRepository;
use auth_identity::models::Role;
use auth_identity::repository::UserRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Booking and retrieval of appointment records.
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            appointments,
            users,
        }
    }

    /// Book an appointment for a patient. The professional must exist, hold
    /// the role the booking type calls for, and be verified; the record
    /// starts `Pending`.
    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment> {
        if request.symptoms.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Please describe your symptoms or needs".to_string(),
            ));
        }
        if request.fee <= 0 {
            return Err(AppointmentError::Validation(
                "A booking fee is required".to_string(),
            ));
        }

        let professional = self
            .users
            .find_by_id(request.professional_id)
            .await?
            .ok_or_else(|| {
                AppointmentError::Validation("Selected professional does not exist".to_string())
            })?;
        let required_role = match request.booking_type {
            BookingType::NurseAssignment => Role::Nurse,
            BookingType::InHomeVisit | BookingType::VideoConsultation => Role::Doctor,
        };
        if professional.role != required_role || !professional.is_verified {
            return Err(AppointmentError::Validation(
                "Selected professional is not available for this booking type".to_string(),
            ));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            professional_id: professional.id,
            patient_id,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
            booking_type: request.booking_type,
            symptoms: request.symptoms,
            previous_meds: request.previous_meds,
            report_image: request.report_image,
            status: AppointmentStatus::Pending,
            fee: request.fee,
            created_at: now,
            updated_at: now,
        };
        let created = self.appointments.create(&appointment).await?;
        info!(
            appointment_id = %created.id,
            patient_id = %patient_id,
            professional_id = %professional.id,
            booking_type = %created.booking_type,
            "appointment booked"
        );
        Ok(created)
    }

    /// Appointments visible to the given account: bookings they made, or for
    /// professional roles, appointments assigned to them.
    pub async fn list_for_user(&self, user_id: Uuid, role: Role) -> Result<Vec<Appointment>> {
        match role {
            Role::Doctor | Role::Nurse => self.appointments.list_for_professional(user_id).await,
            Role::Patient | Role::Admin => self.appointments.list_for_patient(user_id).await,
        }
    }

    /// Fetch one appointment. Accounts that are not a party to it get the
    /// same `NotFound` as a missing id; admins may read anything.
    pub async fn get(
        &self,
        id: Uuid,
        requester_id: Uuid,
        requester_role: Role,
    ) -> Result<Appointment> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        let is_party = appointment.patient_id == requester_id
            || appointment.professional_id == requester_id;
        if !is_party && requester_role != Role::Admin {
            return Err(AppointmentError::NotFound);
        }
        Ok(appointment)
    }

    /// Write a status. No transition checks: the assigned professional and
    /// admins may set any value, and the booking patient may cancel.
    pub async fn update_status(
        &self,
        id: Uuid,
        requester_id: Uuid,
        requester_role: Role,
        status: AppointmentStatus,
    ) -> Result<Appointment> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        let allowed = requester_role == Role::Admin
            || appointment.professional_id == requester_id
            || (appointment.patient_id == requester_id
                && status == AppointmentStatus::Cancelled);
        if !allowed {
            return Err(AppointmentError::NotFound);
        }
        self.appointments
            .update_status(id, status)
            .await?
            .ok_or(AppointmentError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryAppointmentRepository;
    use auth_identity::models::NewUser;
    use auth_identity::repository::InMemoryUserRepository;

    struct Fixture {
        service: AppointmentService,
        patient: Uuid,
        other_patient: Uuid,
        doctor: Uuid,
        nurse: Uuid,
        unverified_doctor: Uuid,
        admin: Uuid,
    }

    async fn seed_user(repo: &InMemoryUserRepository, email: &str, role: Role) -> Uuid {
        repo.create(NewUser {
            full_name: "Someone".to_string(),
            email: email.to_string(),
            password: "a-long-password".to_string(),
            role,
            phone: None,
            specialty: None,
            city: None,
            bio: None,
            consultation_fee: None,
        })
        .await
        .unwrap()
        .id
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new().unwrap());
        let patient = seed_user(&users, "pat@home.test", Role::Patient).await;
        let other_patient = seed_user(&users, "other@home.test", Role::Patient).await;
        let admin = seed_user(&users, "admin@clinic.test", Role::Admin).await;
        let doctor = seed_user(&users, "doc@clinic.test", Role::Doctor).await;
        let nurse = seed_user(&users, "nurse@clinic.test", Role::Nurse).await;
        let unverified_doctor = seed_user(&users, "new-doc@clinic.test", Role::Doctor).await;
        users.set_verified(doctor, true).await.unwrap();
        users.set_verified(nurse, true).await.unwrap();

        let service = AppointmentService::new(
            Arc::new(InMemoryAppointmentRepository::new()),
            users.clone(),
        );
        Fixture {
            service,
            patient,
            other_patient,
            doctor,
            nurse,
            unverified_doctor,
            admin,
        }
    }

    fn request(professional_id: Uuid, booking_type: BookingType) -> BookAppointmentRequest {
        BookAppointmentRequest {
            professional_id,
            appointment_date: "2026-09-01".to_string(),
            appointment_time: "01:00 PM".to_string(),
            booking_type,
            symptoms: "Persistent cough".to_string(),
            previous_meds: None,
            report_image: None,
            fee: 75_00,
        }
    }

    #[tokio::test]
    async fn booking_starts_pending() {
        let f = fixture().await;
        let appointment = f
            .service
            .book(f.patient, request(f.doctor, BookingType::VideoConsultation))
            .await
            .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.professional_id, f.doctor);
        assert_eq!(appointment.patient_id, f.patient);
    }

    #[tokio::test]
    async fn booking_requires_symptoms_and_fee() {
        let f = fixture().await;

        let mut no_symptoms = request(f.doctor, BookingType::InHomeVisit);
        no_symptoms.symptoms = "   ".to_string();
        assert!(matches!(
            f.service.book(f.patient, no_symptoms).await.unwrap_err(),
            AppointmentError::Validation(_)
        ));

        let mut no_fee = request(f.doctor, BookingType::InHomeVisit);
        no_fee.fee = 0;
        assert!(matches!(
            f.service.book(f.patient, no_fee).await.unwrap_err(),
            AppointmentError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn booking_type_must_match_professional_role() {
        let f = fixture().await;

        // A nurse assignment against a doctor account.
        assert!(matches!(
            f.service
                .book(f.patient, request(f.doctor, BookingType::NurseAssignment))
                .await
                .unwrap_err(),
            AppointmentError::Validation(_)
        ));
        // A home visit against a nurse account.
        assert!(matches!(
            f.service
                .book(f.patient, request(f.nurse, BookingType::InHomeVisit))
                .await
                .unwrap_err(),
            AppointmentError::Validation(_)
        ));
        // Matching pairs are fine.
        f.service
            .book(f.patient, request(f.nurse, BookingType::NurseAssignment))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unverified_professionals_cannot_be_booked() {
        let f = fixture().await;
        assert!(matches!(
            f.service
                .book(
                    f.patient,
                    request(f.unverified_doctor, BookingType::VideoConsultation)
                )
                .await
                .unwrap_err(),
            AppointmentError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn only_parties_and_admins_can_read() {
        let f = fixture().await;
        let appointment = f
            .service
            .book(f.patient, request(f.doctor, BookingType::VideoConsultation))
            .await
            .unwrap();

        f.service
            .get(appointment.id, f.patient, Role::Patient)
            .await
            .unwrap();
        f.service
            .get(appointment.id, f.doctor, Role::Doctor)
            .await
            .unwrap();
        f.service
            .get(appointment.id, f.admin, Role::Admin)
            .await
            .unwrap();

        // A stranger sees the same NotFound as a missing id.
        assert!(matches!(
            f.service
                .get(appointment.id, f.other_patient, Role::Patient)
                .await
                .unwrap_err(),
            AppointmentError::NotFound
        ));
        assert!(matches!(
            f.service
                .get(Uuid::new_v4(), f.patient, Role::Patient)
                .await
                .unwrap_err(),
            AppointmentError::NotFound
        ));
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role() {
        let f = fixture().await;
        f.service
            .book(f.patient, request(f.doctor, BookingType::VideoConsultation))
            .await
            .unwrap();
        f.service
            .book(f.other_patient, request(f.doctor, BookingType::InHomeVisit))
            .await
            .unwrap();

        let mine = f.service.list_for_user(f.patient, Role::Patient).await.unwrap();
        assert_eq!(mine.len(), 1);

        let assigned = f.service.list_for_user(f.doctor, Role::Doctor).await.unwrap();
        assert_eq!(assigned.len(), 2);
    }

    #[tokio::test]
    async fn status_writes_are_unvalidated_but_gated() {
        let f = fixture().await;
        let appointment = f
            .service
            .book(f.patient, request(f.doctor, BookingType::VideoConsultation))
            .await
            .unwrap();

        // The professional may jump straight to Completed.
        let updated = f
            .service
            .update_status(appointment.id, f.doctor, Role::Doctor, AppointmentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);

        // The patient may cancel their own booking, but not confirm it.
        f.service
            .update_status(appointment.id, f.patient, Role::Patient, AppointmentStatus::Cancelled)
            .await
            .unwrap();
        assert!(matches!(
            f.service
                .update_status(
                    appointment.id,
                    f.patient,
                    Role::Patient,
                    AppointmentStatus::Confirmed
                )
                .await
                .unwrap_err(),
            AppointmentError::NotFound
        ));

        // A stranger cannot touch it at all.
        assert!(matches!(
            f.service
                .update_status(
                    appointment.id,
                    f.other_patient,
                    Role::Patient,
                    AppointmentStatus::Cancelled
                )
                .await
                .unwrap_err(),
            AppointmentError::NotFound
        ));
    }
}
