use chrono::{DateTime, SecondsFormat, Utc};
use medadmin_core::{ApiError, FileUpload};
use medadmin_models::Doctor;
use validator::Validate;

use crate::http::MultipartPayload;
use crate::validator::validate_form;

/// Create/edit form for a doctor profile, submitted as multipart.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct DoctorForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Please select a category"))]
    pub category_id: String,
    #[validate(length(min = 1, message = "Specialization is required"))]
    pub specialization: String,
    pub years_experience: Option<u32>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub bio: String,
    pub languages: Vec<String>,
    #[validate(range(min = 0.0, message = "Consultation fee must not be negative"))]
    pub consultation_fee: Option<f64>,
    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub clinic_address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,
    pub available_slots: Vec<DateTime<Utc>>,
    /// New photo; `None` keeps the current one on update
    pub photo: Option<FileUpload>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DoctorForm {
    /// Prefills an edit form. The photo is left empty.
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            category_id: doctor
                .category_id
                .as_ref()
                .or(doctor.category.as_ref().map(|c| &c.id))
                .map(|id| id.to_string())
                .unwrap_or_default(),
            specialization: doctor.specialization.clone(),
            years_experience: doctor
                .years_experience
                .and_then(|y| u32::try_from(y).ok()),
            rating: doctor.rating,
            reviews_count: doctor.reviews_count.and_then(|c| u32::try_from(c).ok()),
            bio: doctor.bio.clone(),
            languages: doctor.languages.clone(),
            consultation_fee: doctor.consultation_fee,
            contact_email: doctor.contact_email.clone(),
            contact_phone: doctor.contact_phone.clone(),
            clinic_address: doctor.clinic_address.clone(),
            latitude: doctor.location.map(|l| l.latitude),
            longitude: doctor.location.map(|l| l.longitude),
            available_slots: doctor.available_slots.clone(),
            photo: None,
        }
    }

    /// Adds a language. Blank and duplicate entries are ignored.
    pub fn add_language(&mut self, language: &str) -> bool {
        let language = language.trim();
        if language.is_empty() || self.languages.iter().any(|l| l.eq_ignore_ascii_case(language)) {
            return false;
        }
        self.languages.push(language.to_string());
        true
    }

    pub fn remove_language(&mut self, index: usize) -> Option<String> {
        (index < self.languages.len()).then(|| self.languages.remove(index))
    }

    pub fn add_slot(&mut self, slot: DateTime<Utc>) -> bool {
        if self.available_slots.contains(&slot) {
            return false;
        }
        self.available_slots.push(slot);
        self.available_slots.sort();
        true
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<DateTime<Utc>> {
        (index < self.available_slots.len()).then(|| self.available_slots.remove(index))
    }

    fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.category_id = self.category_id.trim().to_string();
        self.specialization = self.specialization.trim().to_string();
        self.contact_email = non_blank(self.contact_email);
        self.contact_phone = non_blank(self.contact_phone);
        self.clinic_address = non_blank(self.clinic_address);
        self
    }

    /// Validates the form and encodes it as multipart fields.
    pub fn into_payload(self) -> Result<MultipartPayload, ApiError> {
        let form = self.normalized();
        validate_form(&form)?;

        let slots = form
            .available_slots
            .iter()
            .map(|slot| slot.to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(MultipartPayload::new()
            .text("firstName", &form.first_name)
            .text("lastName", &form.last_name)
            .text("categoryId", &form.category_id)
            .text("specialization", &form.specialization)
            .text_opt("yearsExperience", form.years_experience)
            .text_opt("rating", form.rating)
            .text_opt("reviewsCount", form.reviews_count)
            .text_opt("bio", Some(&form.bio))
            .list("languages", &form.languages)
            .text_opt("consultationFee", form.consultation_fee)
            .text_opt("contactEmail", form.contact_email)
            .text_opt("contactPhone", form.contact_phone)
            .text_opt("clinicAddress", form.clinic_address)
            .text_opt("latitude", form.latitude)
            .text_opt("longitude", form.longitude)
            .list("availableSlots", slots)
            .file("photo", form.photo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use medadmin_core::UploadPolicy;
    use medadmin_models::{CategoryId, DoctorId, GeoPoint};

    fn valid_form() -> DoctorForm {
        DoctorForm {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            category_id: "cat-1".into(),
            specialization: "Cardiology".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let err = DoctorForm::default().into_payload().unwrap_err();
        let ApiError::Validation { messages } = err else {
            panic!("expected validation error");
        };
        assert!(messages.contains(&"Please select a category".to_string()));
        assert!(messages.contains(&"First name is required".to_string()));
    }

    #[test]
    fn test_rating_out_of_range() {
        let form = DoctorForm {
            rating: Some(5.5),
            ..valid_form()
        };
        assert!(form.into_payload().is_err());
    }

    #[test]
    fn test_blank_contact_email_is_skipped_not_rejected() {
        let form = DoctorForm {
            contact_email: Some("  ".into()),
            ..valid_form()
        };
        let payload = form.into_payload().unwrap();
        assert!(payload.field("contactEmail").is_none());
    }

    #[test]
    fn test_lists_become_indexed_fields() {
        let mut form = valid_form();
        form.add_language("English");
        form.add_language(" ");
        form.add_language("english");
        form.add_language("Yoruba");
        form.add_slot(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());

        let payload = form.into_payload().unwrap();
        assert_eq!(payload.field("languages[0]"), Some("English"));
        assert_eq!(payload.field("languages[1]"), Some("Yoruba"));
        assert!(payload.field("languages[2]").is_none());
        assert_eq!(
            payload.field("availableSlots[0]"),
            Some("2025-03-01T09:00:00.000Z")
        );
    }

    #[test]
    fn test_no_photo_field_without_file() {
        let payload = valid_form().into_payload().unwrap();
        assert!(payload.file_part().is_none());

        let photo =
            FileUpload::from_bytes("me.jpg", vec![0xFF, 0xD8], &UploadPolicy::images()).unwrap();
        let payload = DoctorForm {
            photo: Some(photo),
            ..valid_form()
        }
        .into_payload()
        .unwrap();
        assert_eq!(payload.file_part().map(|p| p.field.as_str()), Some("photo"));
    }

    #[test]
    fn test_prefill_leaves_photo_empty() {
        let doctor: Doctor = serde_json::from_value(serde_json::json!({
            "id": "d-1",
            "firstName": "Ada",
            "lastName": "Obi",
            "categoryId": "cat-1",
            "photoUrl": "https://cdn.example.com/ada.jpg",
            "specialization": "Cardiology",
            "yearsExperience": 7,
            "languages": ["English"],
            "location": {"latitude": 6.5, "longitude": 3.4}
        }))
        .unwrap();
        assert_eq!(doctor.id, DoctorId::new("d-1"));

        let form = DoctorForm::from_doctor(&doctor);
        assert!(form.photo.is_none());
        assert_eq!(form.category_id, "cat-1");
        assert_eq!(form.years_experience, Some(7));
        assert_eq!(form.latitude, Some(6.5));
        assert_eq!(doctor.location, Some(GeoPoint { latitude: 6.5, longitude: 3.4 }));
        assert!(doctor.in_category(&CategoryId::new("cat-1")));
    }
}
