//! Contact form. Submissions are acknowledged, not delivered anywhere.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::FormError;

/// Simulated delivery time of a submission.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);

/// Subjects offered by the form, in display order.
pub const SUBJECTS: [&str; 6] = [
    "Residential Recycling",
    "Business Recycling",
    "Data Destruction",
    "Pickup Services",
    "Community Events",
    "Other",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub subject: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [&self.name, &self.email, &self.subject, &self.message];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }
        if !self.email.contains('@') {
            return Err(FormError::InvalidEmail);
        }
        if !SUBJECTS.contains(&self.subject.as_str()) {
            return Err(FormError::UnknownSubject);
        }
        Ok(())
    }

    /// Validate, wait `delay`, and acknowledge.
    pub async fn submit(&self, delay: Duration) -> Result<ContactReceipt, FormError> {
        self.validate()?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let receipt = ContactReceipt {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            subject: self.subject.clone(),
        };
        info!(id = %receipt.id, subject = %receipt.subject, "contact message received");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: None,
            subject: "Pickup Services".into(),
            message: "Can you collect two monitors?".into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn phone_is_optional_but_others_required() {
        let f = ContactForm { message: "  ".into(), ..form() };
        assert_eq!(f.validate(), Err(FormError::MissingFields));
    }

    #[test]
    fn email_and_subject_checked() {
        let f = ContactForm { email: "jane".into(), ..form() };
        assert_eq!(f.validate(), Err(FormError::InvalidEmail));
        let f = ContactForm { subject: "Billing".into(), ..form() };
        assert_eq!(f.validate(), Err(FormError::UnknownSubject));
    }

    #[tokio::test(start_paused = true)]
    async fn submit_waits_and_acknowledges() {
        let start = tokio::time::Instant::now();
        let receipt = form().submit(SUBMIT_DELAY).await.unwrap();
        assert!(start.elapsed() >= SUBMIT_DELAY);
        assert_eq!(receipt.subject, "Pickup Services");
    }

    #[tokio::test]
    async fn invalid_submit_rejected() {
        let err = ContactForm::default().submit(Duration::ZERO).await.unwrap_err();
        assert_eq!(err, FormError::MissingFields);
    }
}
