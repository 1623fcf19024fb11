//! Element locator map of the SwiftAssess signup page.
//!
//! The ids are generated by ASP.NET WebForms (`SignUp1_*` is the user
//! control's naming container) and are stable across deployments.

use crate::locator::Selector;
use serde::{Deserialize, Serialize};

/// Input and control fields on the signup form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Organization text box
    Organization,
    /// Full name text box
    Name,
    /// Email text box
    Email,
    /// Country dropdown
    Country,
    /// Account type dropdown
    AccountType,
    /// Account (URL) name text box
    AccountName,
    /// Security code text box
    Captcha,
    /// Security code image
    CaptchaImage,
    /// Sign up button
    Submit,
}

impl Field {
    /// All fields in page order
    pub const ALL: [Self; 9] = [
        Self::Organization,
        Self::Name,
        Self::Email,
        Self::Country,
        Self::AccountType,
        Self::AccountName,
        Self::Captcha,
        Self::CaptchaImage,
        Self::Submit,
    ];

    /// Element id
    #[must_use]
    pub const fn element_id(&self) -> &'static str {
        match self {
            Self::Organization => "SignUp1_txtOrganization",
            Self::Name => "SignUp1_txtName",
            Self::Email => "SignUp1_txtEmail",
            Self::Country => "SignUp1_ddlCountry",
            Self::AccountType => "SignUp1_ddlAccountType",
            Self::AccountName => "SignUp1_txtAccountURL",
            Self::Captcha => "SignUp1_signUpCaptcha_CaptchaTextBox",
            Self::CaptchaImage => "SignUp1_signUpCaptcha_CaptchaImageUP",
            Self::Submit => "SignUp1_btnSignUp",
        }
    }

    /// Semantic field name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Name => "name",
            Self::Email => "email",
            Self::Country => "country",
            Self::AccountType => "account_type",
            Self::AccountName => "account_name",
            Self::Captcha => "captcha",
            Self::CaptchaImage => "captcha_image",
            Self::Submit => "submit",
        }
    }

    /// Selector resolving the field
    #[must_use]
    pub fn selector(&self) -> Selector {
        Selector::id(self.element_id())
    }

    /// Error shown when the field is left blank, if the form checks it
    #[must_use]
    pub const fn required_error(&self) -> Option<ErrorMessage> {
        match self {
            Self::Name => Some(ErrorMessage::NameRequired),
            Self::Email => Some(ErrorMessage::EmailRequired),
            Self::AccountName => Some(ErrorMessage::AccountNameRequired),
            Self::Captcha => Some(ErrorMessage::Captcha),
            _ => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validator messages the form can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMessage {
    /// Full name missing
    NameRequired,
    /// Email missing
    EmailRequired,
    /// Email malformed
    EmailFormat,
    /// Account name missing
    AccountNameRequired,
    /// Account name breaks the naming rules
    AccountNameFormat,
    /// Security code wrong or missing
    Captcha,
}

impl ErrorMessage {
    /// Every validator on the page
    pub const ALL: [Self; 6] = [
        Self::NameRequired,
        Self::EmailRequired,
        Self::EmailFormat,
        Self::AccountNameRequired,
        Self::AccountNameFormat,
        Self::Captcha,
    ];

    /// Validator element id
    #[must_use]
    pub const fn element_id(&self) -> &'static str {
        match self {
            Self::NameRequired => "SignUp1_reqName",
            Self::EmailRequired => "SignUp1_reqEmail",
            Self::EmailFormat => "SignUp1_reqEmailFormat",
            Self::AccountNameRequired => "SignUp1_RequiredFieldValidator1",
            Self::AccountNameFormat => "SignUp1_reqComment",
            Self::Captcha => "SignUp1_signUpCaptcha_ctl00",
        }
    }

    /// Field the validator belongs to
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::NameRequired => Field::Name,
            Self::EmailRequired | Self::EmailFormat => Field::Email,
            Self::AccountNameRequired | Self::AccountNameFormat => Field::AccountName,
            Self::Captcha => Field::Captcha,
        }
    }

    /// Selector resolving the validator
    #[must_use]
    pub fn selector(&self) -> Selector {
        Selector::id(self.element_id())
    }
}

/// Success panel shown once the account is created
pub const SUCCESS_MESSAGE_XPATH: &str = "//div[contains(@class, 'fadeInBig')]";

/// Header inside the success panel
pub const SUCCESS_HEADER_ID: &str = "SignUp1_litSuccess_HeadPanel";

/// Static description of one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Semantic name
    pub name: &'static str,
    /// Field locator
    pub locator: Selector,
    /// Locator of the field's primary validator, if any
    pub error_locator: Option<Selector>,
}

/// The full locator map in page order
#[must_use]
pub fn locator_map() -> Vec<FieldDescriptor> {
    Field::ALL
        .iter()
        .map(|field| FieldDescriptor {
            name: field.name(),
            locator: field.selector(),
            error_locator: field.required_error().map(|e| e.selector()),
        })
        .collect()
}
