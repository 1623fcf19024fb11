//! Test data generation.
//!
//! Valid submissions are randomized so that re-runs never collide on email or
//! account name; invalid inputs come from fixed curated lists.

use crate::signup::SignupForm;
use crate::validation::MIN_ACCOUNT_NAME_LEN;
use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Countries offered by the country dropdown
pub const COUNTRIES: [&str; 6] = [
    "United States",
    "United Kingdom",
    "Canada",
    "Australia",
    "Germany",
    "France",
];

/// Account types offered by the account type dropdown
pub const ACCOUNT_TYPES: [&str; 3] = ["School", "College", "General"];

/// Placeholder security code; the real image cannot be read unattended
pub const PLACEHOLDER_CAPTCHA: &str = "12345";

/// Default account name length
pub const DEFAULT_ACCOUNT_NAME_LEN: usize = 10;

/// Malformed emails the form must reject
pub const INVALID_EMAILS: [&str; 11] = [
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
];

/// Account names the form must reject, with the reason each is invalid
pub const INVALID_ACCOUNT_NAMES: [(&str, &str); 7] = [
    ("ab", "Too short - less than 5 characters"),
    ("test", "Too short - only 4 characters"),
    ("test name", "Contains space"),
    ("test-name", "Contains special character"),
    ("test@name", "Contains special character"),
    ("test.name", "Contains period"),
    ("TEST NAME", "Contains space and uppercase"),
];

const ORG_PREFIXES: [&str; 8] = [
    "Riverside", "Summit", "Oakwood", "Harbor", "Maple", "Northgate", "Lakeview", "Brighton",
];
const ORG_SUFFIXES: [&str; 6] = [
    "Academy",
    "High School",
    "College",
    "Learning Center",
    "Institute",
    "Training Group",
];
const FIRST_NAMES: [&str; 10] = [
    "John", "Maria", "Wei", "Aisha", "Lucas", "Emma", "Omar", "Sofia", "Noah", "Priya",
];
const LAST_NAMES: [&str; 10] = [
    "Doe", "Garcia", "Chen", "Khan", "Silva", "Muller", "Haddad", "Rossi", "Smith", "Patel",
];

/// Generator for signup test data
#[derive(Debug)]
pub struct TestDataGenerator {
    rng: StdRng,
    clock: Option<NaiveDateTime>,
}

impl Default for TestDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataGenerator {
    /// Generator seeded from OS entropy, stamping with the local clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            clock: None,
        }
    }

    /// Deterministic generator for reproducible runs
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: None,
        }
    }

    /// Freeze the timestamp used in generated values
    #[must_use]
    pub fn with_clock(mut self, at: NaiveDateTime) -> Self {
        self.clock = Some(at);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// `{prefix}{YYYYmmddHHMMSS}{1000..=9999}@example.com`
    pub fn generate_email(&mut self, prefix: &str) -> String {
        let stamp = self.now().format("%Y%m%d%H%M%S");
        let suffix: u16 = self.rng.gen_range(1000..=9999);
        format!("{prefix}{stamp}{suffix}@example.com")
    }

    /// `test{YYYYmmddHHMM}` cut to `len` characters, never shorter than
    /// [`MIN_ACCOUNT_NAME_LEN`]
    #[must_use]
    pub fn generate_account_name(&self, len: usize) -> String {
        let mut name = format!("test{}", self.now().format("%Y%m%d%H%M"));
        name.truncate(len.max(MIN_ACCOUNT_NAME_LEN));
        name
    }

    /// Plausible school or company name
    pub fn generate_organization_name(&mut self) -> String {
        let prefix = ORG_PREFIXES.choose(&mut self.rng).copied().unwrap_or("Test");
        let suffix = ORG_SUFFIXES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Organization");
        format!("{prefix} {suffix}")
    }

    /// First and last name
    pub fn generate_full_name(&mut self) -> String {
        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("John");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Doe");
        format!("{first} {last}")
    }

    /// Fully valid randomized submission
    pub fn valid_submission(&mut self) -> SignupForm {
        let country = COUNTRIES.choose(&mut self.rng).copied().unwrap_or(COUNTRIES[0]);
        let account_type = ACCOUNT_TYPES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ACCOUNT_TYPES[0]);
        SignupForm::new()
            .with_organization(self.generate_organization_name())
            .with_name(self.generate_full_name())
            .with_email(self.generate_email("testuser"))
            .with_country(country)
            .with_account_type(account_type)
            .with_account_name(self.generate_account_name(DEFAULT_ACCOUNT_NAME_LEN))
            .with_captcha(PLACEHOLDER_CAPTCHA)
    }

    /// The fixed record most cases start from, with timestamped unique fields
    #[must_use]
    pub fn baseline_submission(&self) -> SignupForm {
        let stamp = self.now().format("%Y%m%d%H%M%S").to_string();
        SignupForm::new()
            .with_organization("Test Organization")
            .with_name("John Doe")
            .with_email(format!("testuser{stamp}@example.com"))
            .with_country("United States")
            .with_account_type("School")
            .with_account_name(format!("test{stamp}"))
            .with_captcha(PLACEHOLDER_CAPTCHA)
    }

    /// Curated malformed emails
    #[must_use]
    pub const fn invalid_emails() -> &'static [&'static str] {
        &INVALID_EMAILS
    }

    /// Curated invalid account names with reasons
    #[must_use]
    pub const fn invalid_account_names() -> &'static [(&'static str, &'static str)] {
        &INVALID_ACCOUNT_NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{is_valid_account_name, is_valid_email};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap()
    }

    mod generator_tests {
        use super::*;

        #[test]
        fn test_email_shape() {
            let mut generator = TestDataGenerator::seeded(7).with_clock(fixed_clock());
            let email = generator.generate_email("testuser");
            assert!(email.starts_with("testuser20261019140509"));
            assert!(email.ends_with("@example.com"));
            let suffix: u16 = email["testuser20261019140509".len()..email.len() - 12]
                .parse()
                .unwrap();
            assert!((1000..=9999).contains(&suffix));
        }

        #[test]
        fn test_account_name_truncates() {
            let generator = TestDataGenerator::new().with_clock(fixed_clock());
            assert_eq!(generator.generate_account_name(10), "test202610");
            assert_eq!(generator.generate_account_name(100), "test202610191405");
        }

        #[test]
        fn test_account_name_never_below_minimum() {
            let generator = TestDataGenerator::new().with_clock(fixed_clock());
            for len in 0..MIN_ACCOUNT_NAME_LEN {
                let name = generator.generate_account_name(len);
                assert_eq!(name, "test2", "len {len}");
                assert!(is_valid_account_name(&name), "len {len}");
            }
        }

        #[test]
        fn test_baseline() {
            let form = TestDataGenerator::new()
                .with_clock(fixed_clock())
                .baseline_submission();
            assert_eq!(form.organization, "Test Organization");
            assert_eq!(form.name, "John Doe");
            assert_eq!(form.email, "testuser20261019140509@example.com");
            assert_eq!(form.account_name, "test20261019140509");
            assert_eq!(form.country, "United States");
            assert_eq!(form.account_type, "School");
            assert_eq!(form.captcha, "12345");
        }

        #[test]
        fn test_seeded_is_reproducible() {
            let a = TestDataGenerator::seeded(42)
                .with_clock(fixed_clock())
                .valid_submission();
            let b = TestDataGenerator::seeded(42)
                .with_clock(fixed_clock())
                .valid_submission();
            assert_eq!(a, b);
        }

        #[test]
        fn test_curated_lists() {
            assert_eq!(TestDataGenerator::invalid_emails().len(), 11);
            assert_eq!(TestDataGenerator::invalid_account_names().len(), 7);
            assert!(INVALID_EMAILS.iter().all(|e| !is_valid_email(e)));
            assert!(INVALID_ACCOUNT_NAMES
                .iter()
                .all(|(name, _)| !is_valid_account_name(name)));
        }
    }

    proptest! {
        #[test]
        fn prop_valid_submission_passes_rules(seed in any::<u64>()) {
            let form = TestDataGenerator::seeded(seed).valid_submission();
            prop_assert!(is_valid_email(&form.email));
            prop_assert!(is_valid_account_name(&form.account_name));
            prop_assert!(!form.name.is_empty());
            prop_assert!(COUNTRIES.contains(&form.country.as_str()));
            prop_assert!(ACCOUNT_TYPES.contains(&form.account_type.as_str()));
        }
    }
}
