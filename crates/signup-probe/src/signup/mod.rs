//! The SwiftAssess signup page: locators, submission model, page object and
//! an offline simulation of the form.

mod form;
mod locators;
mod page;
mod simulated;

pub use form::SignupForm;
pub use locators::{
    locator_map, ErrorMessage, Field, FieldDescriptor, SUCCESS_HEADER_ID, SUCCESS_MESSAGE_XPATH,
};
pub use page::{SignupPage, SIGNUP_PATH};
pub use simulated::{SimulatedSignupSite, ACCOUNT_TYPE_PLACEHOLDER, SUCCESS_PANEL_ID};
