//! Page object for the signup form.

use super::form::SignupForm;
use super::locators::{ErrorMessage, Field, SUCCESS_HEADER_ID, SUCCESS_MESSAGE_XPATH};
use crate::driver::Driver;
use crate::locator::{Locator, Selector, DEFAULT_TIMEOUT_MS};
use crate::page_object::PageObject;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{ElementCondition, WaitOptions, WaitResult, Waiter};
use std::time::Duration;
use tracing::debug;

/// Path of the signup page relative to the site root
pub const SIGNUP_PATH: &str = "/Signup";

/// Intent-level operations on the signup form.
///
/// Owns the driver for the lifetime of one session. Every interaction waits
/// up to the configured timeout for its element before acting.
#[derive(Debug)]
pub struct SignupPage<D: Driver> {
    driver: D,
    base_url: String,
    timeout: Duration,
    waiter: Waiter,
}

impl<D: Driver> SignupPage<D> {
    /// Wrap a driver session for the site at `base_url`
    pub fn new(driver: D, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            waiter: Waiter::new(),
        }
    }

    /// Set the bounded wait used for every element
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.waiter = Waiter::with_options(
            WaitOptions::new().with_timeout(timeout.as_millis() as u64),
        );
        self
    }

    /// Element wait timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Borrow the driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Borrow the driver mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Release the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn locator(&self, selector: Selector) -> Locator {
        Locator::from_selector(selector).with_timeout(self.timeout)
    }

    /// Open the signup page and wait until it is interactive
    ///
    /// # Errors
    ///
    /// Navigation failures, or a timeout if the form never renders.
    pub async fn navigate(&mut self) -> ProbeResult<()> {
        let url = self.url(&self.base_url);
        debug!(%url, "opening signup page");
        self.driver.navigate(&url).await?;
        let _ = self.wait_for_page_load().await?;
        let ready = self.locator(self.ready_selector());
        let _ = self
            .waiter
            .for_element(&self.driver, &ready, ElementCondition::Present)
            .await?;
        Ok(())
    }

    /// Wait for `document.readyState == "complete"`
    ///
    /// # Errors
    ///
    /// Timeout if the document never finishes loading.
    pub async fn wait_for_page_load(&self) -> ProbeResult<WaitResult> {
        self.waiter.for_page_load(&self.driver).await
    }

    async fn enter(&mut self, field: Field, value: &str) -> ProbeResult<()> {
        let locator = self.locator(field.selector());
        let _ = self
            .waiter
            .for_element(&self.driver, &locator, ElementCondition::Present)
            .await?;
        self.driver.clear(locator.selector()).await?;
        self.driver.type_text(locator.selector(), value).await?;
        debug!(field = %field, len = value.len(), "entered text");
        Ok(())
    }

    async fn select(&mut self, field: Field, visible_text: &str) -> ProbeResult<()> {
        let locator = self.locator(field.selector());
        let _ = self
            .waiter
            .for_element(&self.driver, &locator, ElementCondition::Present)
            .await?;
        self.driver
            .select_option(locator.selector(), visible_text)
            .await?;
        debug!(field = %field, option = visible_text, "selected option");
        Ok(())
    }

    /// Type the organization name
    ///
    /// # Errors
    ///
    /// Timeout if the field never appears.
    pub async fn enter_organization(&mut self, value: &str) -> ProbeResult<()> {
        self.enter(Field::Organization, value).await
    }

    /// Type the full name
    ///
    /// # Errors
    ///
    /// Timeout if the field never appears.
    pub async fn enter_name(&mut self, value: &str) -> ProbeResult<()> {
        self.enter(Field::Name, value).await
    }

    /// Type the email address
    ///
    /// # Errors
    ///
    /// Timeout if the field never appears.
    pub async fn enter_email(&mut self, value: &str) -> ProbeResult<()> {
        self.enter(Field::Email, value).await
    }

    /// Type the account name
    ///
    /// # Errors
    ///
    /// Timeout if the field never appears.
    pub async fn enter_account_name(&mut self, value: &str) -> ProbeResult<()> {
        self.enter(Field::AccountName, value).await
    }

    /// Type the security code
    ///
    /// # Errors
    ///
    /// Timeout if the field never appears.
    pub async fn enter_captcha(&mut self, value: &str) -> ProbeResult<()> {
        self.enter(Field::Captcha, value).await
    }

    /// Choose a country by its visible text
    ///
    /// # Errors
    ///
    /// Timeout if the dropdown never appears; [`ProbeError::OptionNotFound`]
    /// if no option matches exactly.
    pub async fn select_country(&mut self, country: &str) -> ProbeResult<()> {
        self.select(Field::Country, country).await
    }

    /// Choose an account type by its visible text
    ///
    /// # Errors
    ///
    /// Timeout if the dropdown never appears; [`ProbeError::OptionNotFound`]
    /// if no option matches exactly.
    pub async fn select_account_type(&mut self, account_type: &str) -> ProbeResult<()> {
        self.select(Field::AccountType, account_type).await
    }

    /// Click Sign Up once it is clickable
    ///
    /// # Errors
    ///
    /// Timeout if the button never becomes clickable.
    pub async fn submit(&mut self) -> ProbeResult<()> {
        let locator = self.locator(Field::Submit.selector());
        let _ = self
            .waiter
            .for_element(&self.driver, &locator, ElementCondition::Clickable)
            .await?;
        self.driver.click(locator.selector()).await?;
        debug!("submitted signup form");
        Ok(())
    }

    /// Fill every non-empty value of `form`, in page order
    ///
    /// # Errors
    ///
    /// The first field that cannot be filled.
    pub async fn fill_form(&mut self, form: &SignupForm) -> ProbeResult<()> {
        if !form.organization.is_empty() {
            self.enter_organization(&form.organization).await?;
        }
        if !form.name.is_empty() {
            self.enter_name(&form.name).await?;
        }
        if !form.email.is_empty() {
            self.enter_email(&form.email).await?;
        }
        if !form.country.is_empty() {
            self.select_country(&form.country).await?;
        }
        if !form.account_type.is_empty() {
            self.select_account_type(&form.account_type).await?;
        }
        if !form.account_name.is_empty() {
            self.enter_account_name(&form.account_name).await?;
        }
        if !form.captcha.is_empty() {
            self.enter_captcha(&form.captcha).await?;
        }
        Ok(())
    }

    /// Fill `form` and click Sign Up
    ///
    /// # Errors
    ///
    /// Any fill or submit failure.
    pub async fn submit_form(&mut self, form: &SignupForm) -> ProbeResult<()> {
        self.fill_form(form).await?;
        self.submit().await
    }

    /// Whether the validator is shown right now. Does not wait.
    ///
    /// # Errors
    ///
    /// Driver failures other than the element being absent.
    pub async fn is_error_displayed(&self, error: ErrorMessage) -> ProbeResult<bool> {
        let state = self.driver.find_element(&error.selector()).await?;
        Ok(state.is_some_and(|s| s.is_visible()))
    }

    /// Text of the validator, empty if it is absent
    ///
    /// # Errors
    ///
    /// Driver failures.
    pub async fn error_text(&self, error: ErrorMessage) -> ProbeResult<String> {
        let state = self.driver.find_element(&error.selector()).await?;
        Ok(state.map(|s| s.text).unwrap_or_default())
    }

    /// Validators currently shown
    ///
    /// # Errors
    ///
    /// Driver failures.
    pub async fn visible_errors(&self) -> ProbeResult<Vec<ErrorMessage>> {
        let mut shown = Vec::new();
        for error in ErrorMessage::ALL {
            if self.is_error_displayed(error).await? {
                shown.push(error);
            }
        }
        Ok(shown)
    }

    /// Wait for the success header; `false` if it does not show in time
    ///
    /// # Errors
    ///
    /// Driver failures other than the timeout.
    pub async fn is_success_displayed(&self) -> ProbeResult<bool> {
        let locator = self.locator(Selector::id(SUCCESS_HEADER_ID));
        match self
            .waiter
            .for_element(&self.driver, &locator, ElementCondition::Visible)
            .await
        {
            Ok(_) => Ok(true),
            Err(ProbeError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the animated success panel is shown right now. Does not wait.
    ///
    /// # Errors
    ///
    /// Driver failures.
    pub async fn is_success_panel_displayed(&self) -> ProbeResult<bool> {
        let state = self
            .driver
            .find_element(&Selector::xpath(SUCCESS_MESSAGE_XPATH))
            .await?;
        Ok(state.is_some_and(|s| s.is_visible()))
    }

    /// Whether Sign Up is visible. Does not wait.
    ///
    /// # Errors
    ///
    /// Driver failures.
    pub async fn is_submit_visible(&self) -> ProbeResult<bool> {
        let state = self.driver.find_element(&Field::Submit.selector()).await?;
        Ok(state.is_some_and(|s| s.is_visible()))
    }

    /// `window.innerWidth` in CSS pixels
    ///
    /// # Errors
    ///
    /// Script failures or a non-numeric result.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub async fn viewport_width(&self) -> ProbeResult<u64> {
        let value = self.driver.execute_script("window.innerWidth").await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|w| w.max(0.0).round() as u64))
            .ok_or_else(|| ProbeError::script(format!("innerWidth was {value}")))
    }
}

impl<D: Driver> PageObject for SignupPage<D> {
    fn url_pattern(&self) -> &str {
        SIGNUP_PATH
    }

    fn ready_selector(&self) -> Selector {
        Field::Submit.selector()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn load_timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn page_name(&self) -> &str {
        "SignupPage"
    }
}
