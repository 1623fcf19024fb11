//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Element state is read with one script evaluation per probe (see
//! [`Selector::to_state_script`]); typing and clicking go through real CDP
//! input events for id and CSS selectors so that the page's validators see
//! genuine keystrokes.

#![allow(
    clippy::significant_drop_tightening,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

use crate::driver::{DeviceDescriptor, Driver, DriverConfig, ElementState, Screenshot};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Probe {
    count: usize,
    state: Option<ElementState>,
}

/// Browser session with a single page
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<CdpPage>>,
    device: DeviceDescriptor,
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page emulating `config.device`
    ///
    /// # Errors
    ///
    /// Returns error if no browser can be found or launched.
    pub async fn launch(config: &DriverConfig) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.device.viewport_width, config.device.viewport_height)
            .request_timeout(config.navigation_timeout);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let cdp_config = builder.build().map_err(|message| {
            if message.contains("executable") {
                ProbeError::BrowserNotFound
            } else {
                ProbeError::BrowserLaunch { message }
            }
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::Session {
                message: e.to_string(),
            })?;

        let mut driver = Self {
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(page)),
            device: config.device,
            handle,
        };
        if config.device.is_mobile {
            driver.set_device(&config.device).await?;
        }
        debug!(device = config.device.name, headless = config.headless, "browser launched");
        Ok(driver)
    }

    /// Device currently emulated
    #[must_use]
    pub const fn device(&self) -> &DeviceDescriptor {
        &self.device
    }

    async fn evaluate(&self, script: &str) -> ProbeResult<serde_json::Value> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| ProbeError::script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn probe(&self, selector: &Selector) -> ProbeResult<Probe> {
        let raw = self.evaluate(&selector.to_state_script()).await?;
        let json = raw
            .as_str()
            .ok_or_else(|| ProbeError::script(format!("state probe returned {raw}")))?;
        Ok(serde_json::from_str(json)?)
    }

    async fn require(&self, selector: &Selector) -> ProbeResult<ElementState> {
        self.find_element(selector)
            .await?
            .ok_or_else(|| ProbeError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    /// Run an element-scoped script; `body` sees the element as `el`
    async fn with_element(&self, selector: &Selector, body: &str) -> ProbeResult<serde_json::Value> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) {{ return null; }} {body} }})()",
            selector.to_query()
        );
        let value = self.evaluate(&script).await?;
        if value.is_null() {
            return Err(ProbeError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(value)
    }
}

fn input_error(e: impl std::fmt::Display) -> ProbeError {
    ProbeError::Input {
        message: e.to_string(),
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let page = self.page.lock().await;
        page.goto(url).await.map_err(|e| ProbeError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let page = self.page.lock().await;
        let url = page.url().await.map_err(|e| ProbeError::Session {
            message: e.to_string(),
        })?;
        Ok(url.unwrap_or_default())
    }

    async fn find_element(&self, selector: &Selector) -> ProbeResult<Option<ElementState>> {
        let probe = self.probe(selector).await?;
        if probe.count > 1 {
            return Err(ProbeError::AmbiguousSelector {
                selector: selector.to_string(),
                count: probe.count,
            });
        }
        Ok(probe.state)
    }

    async fn clear(&mut self, selector: &Selector) -> ProbeResult<()> {
        let _ = self
            .with_element(
                selector,
                "el.focus(); el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true })); return true;",
            )
            .await?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        let state = self.require(selector).await?;
        if !state.enabled {
            return Err(input_error(format!("{selector} is disabled")));
        }
        match selector.as_css() {
            Some(css) => {
                let page = self.page.lock().await;
                let element = page.find_element(css).await.map_err(input_error)?;
                let _ = element.click().await.map_err(input_error)?;
                let _ = element.type_str(text).await.map_err(input_error)?;
            }
            None => {
                let body = format!(
                    "el.value += {}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;",
                    serde_json::to_string(text)?
                );
                let _ = self.with_element(selector, &body).await?;
            }
        }
        Ok(())
    }

    async fn select_option(&mut self, selector: &Selector, visible_text: &str) -> ProbeResult<()> {
        let body = format!(
            r"if (el.tagName !== 'SELECT') {{ return 'not-select'; }}
            const idx = Array.from(el.options).findIndex(o => o.text.trim() === {wanted});
            if (idx < 0) {{ return 'missing'; }}
            el.selectedIndex = idx;
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return 'ok';",
            wanted = serde_json::to_string(visible_text)?
        );
        let outcome = self.with_element(selector, &body).await?;
        match outcome.as_str() {
            Some("ok") => Ok(()),
            Some("missing") => Err(ProbeError::OptionNotFound {
                selector: selector.to_string(),
                option: visible_text.to_string(),
            }),
            _ => Err(input_error(format!("{selector} is not a <select>"))),
        }
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        match selector.as_css() {
            Some(css) => {
                let page = self.page.lock().await;
                let element = page.find_element(css).await.map_err(|_| {
                    ProbeError::ElementNotFound {
                        selector: selector.to_string(),
                    }
                })?;
                let _ = element.click().await.map_err(input_error)?;
            }
            None => {
                let _ = self
                    .with_element(selector, "el.click(); return true;")
                    .await?;
            }
        }
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> ProbeResult<serde_json::Value> {
        self.evaluate(script).await
    }

    async fn screenshot(&self) -> ProbeResult<Screenshot> {
        let page = self.page.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| ProbeError::Screenshot {
                message: e.to_string(),
            })?;

        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| ProbeError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(Screenshot::new(
            data,
            self.device.viewport_width,
            self.device.viewport_height,
        ))
    }

    async fn set_device(&mut self, device: &DeviceDescriptor) -> ProbeResult<()> {
        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(device.viewport_width))
            .height(i64::from(device.viewport_height))
            .device_scale_factor(device.device_scale_factor)
            .mobile(device.is_mobile)
            .build()
            .map_err(|message| ProbeError::Session { message })?;

        let page = self.page.lock().await;
        let session_error = |e: chromiumoxide::error::CdpError| ProbeError::Session {
            message: e.to_string(),
        };
        let _ = page.execute(metrics).await.map_err(session_error)?;
        let _ = page
            .execute(SetTouchEmulationEnabledParams::new(device.has_touch))
            .await
            .map_err(session_error)?;
        if !device.user_agent.is_empty() {
            let _ = page
                .execute(SetUserAgentOverrideParams::new(device.user_agent))
                .await
                .map_err(session_error)?;
        }
        drop(page);
        self.device = *device;
        debug!(device = device.name, "device emulation applied");
        Ok(())
    }

    async fn clear_browsing_data(&mut self) -> ProbeResult<()> {
        {
            let page = self.page.lock().await;
            let _ = page
                .execute(ClearBrowserCookiesParams::default())
                .await
                .map_err(|e| ProbeError::Session {
                    message: e.to_string(),
                })?;
        }
        // storage access throws on about:blank
        let _ = self
            .evaluate("try { window.localStorage.clear(); window.sessionStorage.clear(); true } catch (e) { false }")
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await.map_err(|e| ProbeError::Session {
            message: e.to_string(),
        });
        let _ = browser.wait().await;
        self.handle.abort();
        closed.map(|_| ())
    }
}
