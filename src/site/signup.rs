//! Signup form.

use serde::Deserialize;

use crate::auth::{AuthStore, User};

use super::{FormError, SubmitError};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub agree_terms: bool,
}

impl SignupForm {
    /// Checks run in a fixed order; the first failure is reported.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(FormError::MissingFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if !self.agree_terms {
            return Err(FormError::TermsNotAccepted);
        }
        Ok(())
    }

    /// Validate, then create the account. On success the caller moves on to
    /// the dashboard.
    pub async fn submit<'a>(&self, auth: &'a mut AuthStore) -> Result<&'a User, SubmitError> {
        self.validate()?;
        Ok(auth.signup(&self.name, &self.email, &self.password).await?)
    }
}
