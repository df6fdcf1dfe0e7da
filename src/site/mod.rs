//! Back-office behaviour of the site's forms and the account dashboard.
//!
//! Each form validates locally and returns the first problem as a
//! [`FormError`] whose message is shown inline, the way the pages did.

pub mod contact;
pub mod dashboard;
pub mod signup;

use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("You must agree to the terms and conditions")]
    TermsNotAccepted,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please select a subject")]
    UnknownSubject,
}

/// Outcome of submitting a form that talks to the account backend.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
