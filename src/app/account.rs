use crate::core::services::AuthService;
use crate::domain::dto::RegisterRequest;
use crate::utils::error::{Result, RoadReadyError};
use crate::utils::validation::require_filled;

pub const SIGNUP_SUCCESS: &str = "Account created. You can sign in now.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        require_filled(
            &[&self.first_name, &self.email, &self.password],
            "First name, email and password are required.",
        )?;
        if self.password != self.confirm {
            return Err(RoadReadyError::validation("Passwords do not match."));
        }
        Ok(())
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            password: self.password.clone(),
        }
    }
}

/// Registers a new customer account. Nothing is sent if the form is invalid.
pub async fn sign_up(auth: &AuthService, form: &SignupForm) -> Result<&'static str> {
    form.validate()?;
    auth.register(&form.to_request()).await?;
    tracing::info!("✅ Registered {}", form.email);
    Ok(SIGNUP_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignupForm {
        SignupForm {
            first_name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            confirm: "pw".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_signup_requires_core_fields() {
        let err = SignupForm {
            first_name: " ".into(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "First name, email and password are required.");
    }

    #[test]
    fn test_signup_passwords_must_match() {
        let err = SignupForm {
            confirm: "other".into(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match.");
        assert!(form().validate().is_ok());
    }
}
