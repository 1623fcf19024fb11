//! In-memory reproduction of the signup form for offline runs.
//!
//! Renders the same element ids as the live page and applies the same
//! validators when Sign Up is clicked: required fields first, then formats,
//! then the security code.

use super::locators::{ErrorMessage, Field, SUCCESS_HEADER_ID};
use super::page::SIGNUP_PATH;
use crate::data::{ACCOUNT_TYPES, COUNTRIES};
use crate::driver::{MockDom, MockDriver, MockElement, MockPage};
use crate::validation::{is_valid_email, validate_account_name};
use std::sync::Arc;

/// Id of the success panel wrapping the success header
pub const SUCCESS_PANEL_ID: &str = "SignUp1_pnlSuccess";

const DEFAULT_CAPTCHA_SOLUTION: &str = "QX7RM";

/// First option of the account type dropdown, selected on load
pub const ACCOUNT_TYPE_PLACEHOLDER: &str = "Select Account Type";

const EXTRA_COUNTRIES: [&str; 4] = ["India", "Japan", "Saudi Arabia", "United Arab Emirates"];

/// Simulated SwiftAssess signup page
#[derive(Debug, Clone)]
pub struct SimulatedSignupSite {
    captcha_solution: String,
}

impl Default for SimulatedSignupSite {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSignupSite {
    /// Site whose security code is unknown to the suite, like the real one
    #[must_use]
    pub fn new() -> Self {
        Self {
            captcha_solution: DEFAULT_CAPTCHA_SOLUTION.to_string(),
        }
    }

    /// Accept `solution` as the security code
    #[must_use]
    pub fn with_captcha_solution(mut self, solution: impl Into<String>) -> Self {
        self.captcha_solution = solution.into();
        self
    }

    /// Mock driver serving this site at `/Signup`
    #[must_use]
    pub fn into_driver(self) -> MockDriver {
        let mut driver = MockDriver::new();
        driver.mount(SIGNUP_PATH, Arc::new(self));
        driver
    }

    fn validator_text(error: ErrorMessage) -> &'static str {
        match error {
            ErrorMessage::NameRequired => "Name is required",
            ErrorMessage::EmailRequired => "Email is required",
            ErrorMessage::EmailFormat => "Invalid email format",
            ErrorMessage::AccountNameRequired => "Account name is required",
            ErrorMessage::AccountNameFormat => {
                "Account name must be at least 5 characters, No spaces or special characters allowed."
            }
            ErrorMessage::Captcha => "Incorrect security code",
        }
    }

    fn validate(&self, dom: &MockDom) -> Vec<ErrorMessage> {
        let mut errors = Vec::new();

        if dom.value_of(Field::Name.element_id()).trim().is_empty() {
            errors.push(ErrorMessage::NameRequired);
        }

        let email = dom.value_of(Field::Email.element_id()).trim();
        if email.is_empty() {
            errors.push(ErrorMessage::EmailRequired);
        } else if !is_valid_email(email) {
            errors.push(ErrorMessage::EmailFormat);
        }

        let account_name = dom.value_of(Field::AccountName.element_id());
        if account_name.is_empty() {
            errors.push(ErrorMessage::AccountNameRequired);
        } else if validate_account_name(account_name).is_err() {
            errors.push(ErrorMessage::AccountNameFormat);
        }

        // server-side check only runs once client validators pass
        if errors.is_empty() && dom.value_of(Field::Captcha.element_id()) != self.captcha_solution
        {
            errors.push(ErrorMessage::Captcha);
        }

        errors
    }
}

impl MockPage for SimulatedSignupSite {
    fn render(&self) -> MockDom {
        let countries: Vec<&str> = COUNTRIES.iter().chain(EXTRA_COUNTRIES.iter()).copied().collect();
        let account_types: Vec<&str> = std::iter::once(ACCOUNT_TYPE_PLACEHOLDER)
            .chain(ACCOUNT_TYPES.iter().copied())
            .collect();
        let mut dom = MockDom::new()
            .with(MockElement::input(Field::Organization.element_id()))
            .with(MockElement::input(Field::Name.element_id()))
            .with(MockElement::input(Field::Email.element_id()))
            .with(MockElement::select(Field::Country.element_id(), &countries[..]))
            .with(MockElement::select(Field::AccountType.element_id(), &account_types[..]))
            .with(MockElement::input(Field::AccountName.element_id()))
            .with(MockElement::input(Field::Captcha.element_id()))
            .with(MockElement::img(Field::CaptchaImage.element_id()))
            .with(MockElement::button(Field::Submit.element_id(), "Sign Up"));

        for error in ErrorMessage::ALL {
            dom.push(MockElement::validator(
                error.element_id(),
                Self::validator_text(error),
            ));
        }

        dom.push(
            MockElement::div(SUCCESS_PANEL_ID)
                .with_class("animated")
                .with_class("fadeInBig")
                .hidden(),
        );
        dom.push(
            MockElement::div(SUCCESS_HEADER_ID)
                .with_text("Your account has been created successfully")
                .hidden(),
        );
        dom
    }

    fn on_click(&self, element_id: &str, dom: &mut MockDom) {
        if element_id != Field::Submit.element_id() {
            return;
        }
        for error in ErrorMessage::ALL {
            dom.hide(error.element_id());
        }

        let errors = self.validate(dom);
        if errors.is_empty() {
            dom.show(SUCCESS_PANEL_ID);
            dom.show(SUCCESS_HEADER_ID);
            return;
        }

        for error in &errors {
            dom.show(error.element_id());
        }
        if errors.contains(&ErrorMessage::Captcha) {
            // a failed code regenerates the image and empties the box
            if let Some(captcha) = dom.get_mut(Field::Captcha.element_id()) {
                captcha.value = Some(String::new());
            }
        }
    }
}
