//! Small helpers shared by cases and the runner: logging, retry and browser
//! housekeeping.

use crate::driver::{DeviceDescriptor, Driver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use crate::signup::SignupForm;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Keys whose values never reach the logs
const SENSITIVE_KEYS: [&str; 3] = ["password", "captcha", "security"];

/// Log a step with its status
pub fn log_test_step(step: &str, status: &str) {
    let at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    info!(%at, status, "{step}");
}

/// Replace the value of sensitive keys with asterisks
#[must_use]
pub fn mask_value<'a>(key: &str, value: &'a str) -> std::borrow::Cow<'a, str> {
    let key = key.to_ascii_lowercase();
    if SENSITIVE_KEYS.iter().any(|s| key.contains(s)) && !value.is_empty() {
        std::borrow::Cow::Owned("*".repeat(value.chars().count()))
    } else {
        std::borrow::Cow::Borrowed(value)
    }
}

/// Log arbitrary key/value test data with sensitive values masked
pub fn log_test_data(pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        info!(key, value = %mask_value(key, value), "test data");
    }
}

/// Log a submission with the security code masked
pub fn log_submission(form: &SignupForm) {
    log_test_data(&form.fields());
}

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
///
/// # Errors
///
/// The error of the last attempt, or [`ProbeError::Config`] if `attempts` is 0.
pub async fn retry_on_error<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> ProbeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
{
    let mut last = ProbeError::Config {
        message: "retry_on_error needs at least one attempt".to_string(),
    };
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt, attempts, error = %e, "attempt failed");
                last = e;
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(last)
}

/// Delete cookies and web storage
///
/// # Errors
///
/// Driver failures.
pub async fn clear_browser_data<D: Driver + ?Sized>(driver: &mut D) -> ProbeResult<()> {
    driver.clear_browsing_data().await
}

/// Emulate the named mobile device (unknown names fall back to the iPhone X)
///
/// # Errors
///
/// Driver failures.
pub async fn set_mobile_viewport<D: Driver + ?Sized>(
    driver: &mut D,
    device_name: &str,
) -> ProbeResult<DeviceDescriptor> {
    let device = DeviceDescriptor::by_name(device_name);
    driver.set_device(&device).await?;
    Ok(device)
}

/// Script scrolling `selector` into view, evaluating to whether it was found
#[must_use]
pub fn scroll_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} el.scrollIntoView(true); return true; }})()",
        selector.to_query()
    )
}

/// Scroll an element into view
///
/// # Errors
///
/// [`ProbeError::ElementNotFound`] if nothing matches, or script failures.
pub async fn scroll_to_element<D: Driver + ?Sized>(driver: &D, selector: &Selector) -> ProbeResult<()> {
    let found = driver.execute_script(&scroll_script(selector)).await?;
    if found.as_bool() == Some(true) {
        Ok(())
    } else {
        Err(ProbeError::ElementNotFound {
            selector: selector.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod masking_tests {
        use super::*;

        #[test]
        fn test_sensitive_keys_masked() {
            assert_eq!(mask_value("captcha", "12345"), "*****");
            assert_eq!(mask_value("Password", "hunter2"), "*******");
            assert_eq!(mask_value("security_code", "ab"), "**");
            assert_eq!(mask_value("email", "a@b.com"), "a@b.com");
            assert_eq!(mask_value("captcha", ""), "");
        }
    }

    mod retry_tests {
        use super::*;

        #[tokio::test]
        async fn test_succeeds_after_failures() {
            let calls = AtomicU32::new(0);
            let result = retry_on_error(3, Duration::from_millis(1), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ProbeError::assertion("flaky"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
            assert_eq!(result.unwrap(), 2);
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_returns_last_error() {
            let result: ProbeResult<()> = retry_on_error(2, Duration::ZERO, || async {
                Err(ProbeError::assertion("always"))
            })
            .await;
            assert!(result.unwrap_err().to_string().contains("always"));
        }

        #[tokio::test]
        async fn test_zero_attempts() {
            let result: ProbeResult<()> = retry_on_error(0, Duration::ZERO, || async { Ok(()) }).await;
            assert!(matches!(result, Err(ProbeError::Config { .. })));
        }
    }

    mod browser_tests {
        use super::*;

        #[tokio::test]
        async fn test_mobile_viewport_by_name() {
            let mut driver = MockDriver::new();
            let device = set_mobile_viewport(&mut driver, "samsung_s21").await.unwrap();
            assert_eq!(device.viewport_width, 360);
            assert!(driver.was_called("set_device:samsung_s21"));

            let device = set_mobile_viewport(&mut driver, "unknown").await.unwrap();
            assert_eq!(device, DeviceDescriptor::IPHONE_X);
        }

        #[tokio::test]
        async fn test_clear_browser_data() {
            let mut driver = MockDriver::new();
            clear_browser_data(&mut driver).await.unwrap();
            assert!(driver.was_called("clear_browsing_data"));
        }

        #[tokio::test]
        async fn test_scroll() {
            let selector = Selector::id("SignUp1_btnSignUp");
            let mut driver = MockDriver::new();
            driver.set_script_result(scroll_script(&selector), serde_json::json!(true));
            scroll_to_element(&driver, &selector).await.unwrap();

            driver.set_script_result(scroll_script(&selector), serde_json::json!(false));
            let err = scroll_to_element(&driver, &selector).await.unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotFound { .. }));
        }
    }
}
