//! One signup submission.

use serde::{Deserialize, Serialize};

/// Values typed into the signup form for a single attempt.
///
/// An empty string leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    /// Organization name
    pub organization: String,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Country dropdown text
    pub country: String,
    /// Account type dropdown text
    pub account_type: String,
    /// Account (URL) name
    pub account_name: String,
    /// Security code
    pub captcha: String,
}

impl SignupForm {
    /// Empty submission
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set organization
    #[must_use]
    pub fn with_organization(mut self, value: impl Into<String>) -> Self {
        self.organization = value.into();
        self
    }

    /// Set full name
    #[must_use]
    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = value.into();
        self
    }

    /// Set email
    #[must_use]
    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = value.into();
        self
    }

    /// Set country
    #[must_use]
    pub fn with_country(mut self, value: impl Into<String>) -> Self {
        self.country = value.into();
        self
    }

    /// Set account type
    #[must_use]
    pub fn with_account_type(mut self, value: impl Into<String>) -> Self {
        self.account_type = value.into();
        self
    }

    /// Set account name
    #[must_use]
    pub fn with_account_name(mut self, value: impl Into<String>) -> Self {
        self.account_name = value.into();
        self
    }

    /// Set security code
    #[must_use]
    pub fn with_captcha(mut self, value: impl Into<String>) -> Self {
        self.captcha = value.into();
        self
    }

    /// Field key/value pairs in form order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("organization", &self.organization),
            ("name", &self.name),
            ("email", &self.email),
            ("country", &self.country),
            ("account_type", &self.account_type),
            ("account_name", &self.account_name),
            ("captcha", &self.captcha),
        ]
    }
}
