//! Client-side validation rules of the signup form.
//!
//! These mirror what the site enforces so that generated data can be checked
//! before it is typed, and so the simulated page rejects the same inputs.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum account name length accepted by the site
pub const MIN_ACCOUNT_NAME_LEN: usize = 5;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Whether the site would accept `email`.
///
/// Beyond the basic shape, the local part may not start with a dot, no two
/// dots may be adjacent, and every domain label must be non-empty.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some(re) = email_regex() else {
        return false;
    };
    if !re.is_match(email) || email.contains("..") {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.starts_with('.')
        && !local.ends_with('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Why an account name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNameViolation {
    /// Empty input
    #[error("Account name is required")]
    Empty,

    /// Fewer than [`MIN_ACCOUNT_NAME_LEN`] characters
    #[error("Account name must be at least 5 characters (got {len})")]
    TooShort {
        /// Actual length in characters
        len: usize,
    },

    /// Contains a space or other whitespace
    #[error("No spaces allowed in account name")]
    ContainsWhitespace,

    /// Contains something other than ASCII letters and digits
    #[error("Character {0:?} is not allowed in account name")]
    InvalidCharacter(char),
}

/// Check an account name against the site's rules.
///
/// # Errors
///
/// Returns the first [`AccountNameViolation`] found. Whitespace is reported
/// before length so that `"TEST NAME"` reads as a spacing problem.
pub fn validate_account_name(name: &str) -> Result<(), AccountNameViolation> {
    if name.is_empty() {
        return Err(AccountNameViolation::Empty);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(AccountNameViolation::ContainsWhitespace);
    }
    let len = name.chars().count();
    if len < MIN_ACCOUNT_NAME_LEN {
        return Err(AccountNameViolation::TooShort { len });
    }
    match name.chars().find(|c| !c.is_ascii_alphanumeric()) {
        Some(c) => Err(AccountNameViolation::InvalidCharacter(c)),
        None => Ok(()),
    }
}

/// Convenience wrapper over [`validate_account_name`]
#[must_use]
pub fn is_valid_account_name(name: &str) -> bool {
    validate_account_name(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod email_tests {
        use super::*;

        #[test]
        fn test_accepts_generated_shape() {
            assert!(is_valid_email("testuser20260101120000@example.com"));
            assert!(is_valid_email("a@b.com"));
            assert!(is_valid_email("first.last+tag@sub.example.org"));
        }

        #[test]
        fn test_rejects_malformed() {
            for email in [
                "invalid@",
                "invalid.com",
                "@example.com",
                "test@",
                "test..email@example.com",
                "test email@example.com",
                "test@domain",
                "test@@example.com",
                "test@.com",
                ".test@example.com",
                "test@domain..com",
                "",
            ] {
                assert!(!is_valid_email(email), "{email:?} accepted");
            }
        }
    }

    mod account_name_tests {
        use super::*;

        #[test]
        fn test_valid() {
            assert_eq!(validate_account_name("test202610191200"), Ok(()));
            assert!(is_valid_account_name("Acme5"));
        }

        #[test]
        fn test_violations() {
            assert_eq!(validate_account_name(""), Err(AccountNameViolation::Empty));
            assert_eq!(
                validate_account_name("ab"),
                Err(AccountNameViolation::TooShort { len: 2 })
            );
            assert_eq!(
                validate_account_name("test name"),
                Err(AccountNameViolation::ContainsWhitespace)
            );
            assert_eq!(
                validate_account_name("TEST NAME"),
                Err(AccountNameViolation::ContainsWhitespace)
            );
            assert_eq!(
                validate_account_name("test-name"),
                Err(AccountNameViolation::InvalidCharacter('-'))
            );
            assert_eq!(
                validate_account_name("test.name"),
                Err(AccountNameViolation::InvalidCharacter('.'))
            );
        }

        #[test]
        fn test_violation_messages() {
            assert!(AccountNameViolation::TooShort { len: 4 }
                .to_string()
                .contains("at least 5 characters"));
            assert!(AccountNameViolation::ContainsWhitespace
                .to_string()
                .contains("No spaces"));
        }
    }

    proptest! {
        #[test]
        fn prop_short_names_rejected(name in "[a-z0-9]{1,4}") {
            let is_too_short = matches!(
                validate_account_name(&name),
                Err(AccountNameViolation::TooShort { .. })
            );
            prop_assert!(is_too_short);
        }

        #[test]
        fn prop_names_with_spaces_rejected(head in "[a-z]{0,8}", tail in "[a-z]{0,8}") {
            let name = format!("{head} {tail}");
            prop_assert_eq!(
                validate_account_name(&name),
                Err(AccountNameViolation::ContainsWhitespace)
            );
        }

        #[test]
        fn prop_alphanumeric_names_accepted(name in "[A-Za-z0-9]{5,20}") {
            prop_assert!(is_valid_account_name(&name));
        }

        #[test]
        fn prop_simple_emails_accepted(local in "[a-z][a-z0-9]{0,10}", domain in "[a-z]{1,10}") {
            let email = format!("{local}@{domain}.com");
            prop_assert!(is_valid_email(&email));
        }
    }
}
