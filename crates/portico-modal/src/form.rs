//! The two forms the modal submits.
//!
//! Forms only check what can be checked without the service: that nothing
//! required is blank. Email syntax, password strength, and duplicate
//! accounts are the service's call.

use std::fmt;

use portico_api::{LoginRequest, RegisterRequest};

use crate::{FailureKind, ModalFailure};

/// Email and password, as typed.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<LoginRequest, ModalFailure> {
        require(&self.email, "Email is required.")?;
        require(&self.password, "Password is required.")?;
        Ok(LoginRequest::new(self.email.trim(), self.password.clone()))
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Email, display name, and password, as typed.
#[derive(Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

impl RegisterForm {
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            password: password.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<RegisterRequest, ModalFailure> {
        require(&self.email, "Email is required.")?;
        require(&self.display_name, "Display name is required.")?;
        require(&self.password, "Password is required.")?;
        Ok(RegisterRequest::new(
            self.email.trim(),
            self.display_name.trim(),
            self.password.clone(),
        ))
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

fn require(value: &str, message: &str) -> Result<(), ModalFailure> {
    if value.trim().is_empty() {
        Err(ModalFailure::new(FailureKind::InvalidInput, message))
    } else {
        Ok(())
    }
}
