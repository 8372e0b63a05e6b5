use crate::error::{DirectoryError, Result};
use crate::models::{DoctorFilter, DoctorProfile};
use auth_identity::models::Role;
use auth_identity::repository::UserRepository;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Read-only queries over the professional directory.
pub struct DirectoryService {
    users: Arc<dyn UserRepository>,
}

impl DirectoryService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Verified doctors, optionally narrowed by specialty and city.
    pub async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<DoctorProfile>> {
        let doctors = self
            .users
            .list_doctors(filter.specialty(), filter.city())
            .await?;
        debug!(count = doctors.len(), "doctor listing served");
        Ok(doctors.into_iter().map(DoctorProfile::from).collect())
    }

    /// Single doctor lookup. A malformed id, an unknown id, and an id that
    /// belongs to a non-doctor account all produce the same `DoctorNotFound`:
    /// the directory does not reveal which of the three it was.
    pub async fn get_doctor(&self, id: &str) -> Result<DoctorProfile> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Err(DirectoryError::DoctorNotFound);
        };
        let user = self
            .users
            .find_by_id(id)
            .await?
            .filter(|user| user.role == Role::Doctor)
            .ok_or(DirectoryError::DoctorNotFound)?;
        Ok(DoctorProfile::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_identity::models::NewUser;
    use auth_identity::repository::InMemoryUserRepository;

    async fn seed_doctor(
        repo: &InMemoryUserRepository,
        name: &str,
        email: &str,
        specialty: &str,
        city: &str,
        verified: bool,
    ) -> Uuid {
        let user = repo
            .create(NewUser {
                full_name: name.to_string(),
                email: email.to_string(),
                password: "a-long-password".to_string(),
                role: Role::Doctor,
                phone: None,
                specialty: Some(specialty.to_string()),
                city: Some(city.to_string()),
                bio: None,
                consultation_fee: Some(50_00),
            })
            .await
            .unwrap();
        repo.set_verified(user.id, verified).await.unwrap();
        user.id
    }

    async fn seeded() -> (DirectoryService, Arc<InMemoryUserRepository>, Uuid, Uuid) {
        let repo = Arc::new(InMemoryUserRepository::new().unwrap());
        let verified_cardio = seed_doctor(
            &repo,
            "Asha Rao",
            "asha@clinic.test",
            "Cardiology",
            "Mumbai",
            true,
        )
        .await;
        seed_doctor(
            &repo,
            "Ben Okafor",
            "ben@clinic.test",
            "Cardiology",
            "Lagos",
            false,
        )
        .await;
        seed_doctor(
            &repo,
            "Carla Mendes",
            "carla@clinic.test",
            "Dermatology",
            "Mumbai",
            true,
        )
        .await;
        let patient = repo
            .create(NewUser {
                full_name: "Pat Ient".to_string(),
                email: "pat@home.test".to_string(),
                password: "a-long-password".to_string(),
                role: Role::Patient,
                phone: None,
                specialty: None,
                city: None,
                bio: None,
                consultation_fee: None,
            })
            .await
            .unwrap();
        let service = DirectoryService::new(repo.clone());
        (service, repo, verified_cardio, patient.id)
    }

    fn filter(specialty: Option<&str>, city: Option<&str>) -> DoctorFilter {
        DoctorFilter {
            specialty: specialty.map(str::to_string),
            city: city.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn specialty_filter_is_case_insensitive_and_partial() {
        let (service, _, verified_cardio, _) = seeded().await;

        let doctors = service
            .list_doctors(&filter(Some("cardio"), None))
            .await
            .unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].id, verified_cardio);

        let doctors = service
            .list_doctors(&filter(Some("CARDIO"), None))
            .await
            .unwrap();
        assert_eq!(doctors.len(), 1);
    }

    #[tokio::test]
    async fn unverified_doctors_never_appear_in_listings() {
        let (service, _, _, _) = seeded().await;
        let doctors = service.list_doctors(&DoctorFilter::default()).await.unwrap();
        assert_eq!(doctors.len(), 2);
        assert!(doctors.iter().all(|d| d.is_verified));
    }

    #[tokio::test]
    async fn empty_string_filters_impose_no_constraint() {
        let (service, _, _, _) = seeded().await;
        let doctors = service
            .list_doctors(&filter(Some(""), Some("  ")))
            .await
            .unwrap();
        assert_eq!(doctors.len(), 2);
    }

    #[tokio::test]
    async fn city_and_specialty_filters_combine() {
        let (service, _, verified_cardio, _) = seeded().await;
        let doctors = service
            .list_doctors(&filter(Some("cardio"), Some("mumbai")))
            .await
            .unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].id, verified_cardio);

        let doctors = service
            .list_doctors(&filter(Some("cardio"), Some("lagos")))
            .await
            .unwrap();
        assert!(doctors.is_empty());
    }

    #[tokio::test]
    async fn get_doctor_collapses_all_misses_to_not_found() {
        let (service, _, _, patient_id) = seeded().await;

        // Malformed id.
        assert!(matches!(
            service.get_doctor("not-a-uuid").await.unwrap_err(),
            DirectoryError::DoctorNotFound
        ));
        // Well-formed but absent.
        assert!(matches!(
            service.get_doctor(&Uuid::new_v4().to_string()).await.unwrap_err(),
            DirectoryError::DoctorNotFound
        ));
        // Exists, but is a patient.
        assert!(matches!(
            service.get_doctor(&patient_id.to_string()).await.unwrap_err(),
            DirectoryError::DoctorNotFound
        ));
    }

    #[tokio::test]
    async fn get_doctor_returns_even_unverified_doctors() {
        let (service, repo, _, _) = seeded().await;
        let unverified = repo.find_by_email("ben@clinic.test").await.unwrap().unwrap();

        let profile = service.get_doctor(&unverified.id.to_string()).await.unwrap();
        assert_eq!(profile.full_name, "Ben Okafor");
        assert!(!profile.is_verified);
    }
}
