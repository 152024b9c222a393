//! Chrome DevTools Protocol renderer (uses the `headless_chrome` crate)

use crate::renderer::{RenderConfig, Renderer};
use crate::{Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// Resolves `true` once the document has loaded, web fonts are ready and two
/// animation frames have been painted, or `false` after `{{TIMEOUT_MS}}`.
const READY_SCRIPT: &str = r#"(async function(){
    const ready = new Promise(function(resolve){
        const painted = function(){
            requestAnimationFrame(function(){ requestAnimationFrame(function(){ resolve(true); }); });
        };
        const fonts = function(){
            (document.fonts ? document.fonts.ready : Promise.resolve()).then(painted, painted);
        };
        if (document.readyState === 'complete') { fonts(); }
        else { window.addEventListener('load', fonts, { once: true }); }
    });
    const timeout = new Promise(function(resolve){ setTimeout(function(){ resolve(false); }, {{TIMEOUT_MS}}); });
    return await Promise.race([ready, timeout]);
})()"#;

/// Headless Chrome with a single tab reused for every slide.
///
/// Dropping the renderer (including during a panic) terminates the browser
/// process, since `headless_chrome::Browser` kills its child on drop.
pub struct ChromeRenderer {
    browser: Browser,
    tab: Arc<Tab>,
    config: RenderConfig,
}

impl ChromeRenderer {
    fn wait_for_render(&self) -> Result<()> {
        let script = READY_SCRIPT.replace("{{TIMEOUT_MS}}", &self.config.load_timeout_ms.to_string());
        let eval = self
            .tab
            .evaluate(&script, true)
            .map_err(|e| Error::LoadError(format!("Readiness check failed: {}", e)))?;

        match eval.value {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            Some(serde_json::Value::Bool(false)) => Err(Error::Timeout(self.config.load_timeout_ms)),
            other => Err(Error::LoadError(format!("Unexpected readiness result: {:?}", other))),
        }
    }
}

/// Launch options for `config`. The browser connection is kept open for
/// [`RenderConfig::session_timeout`], which outlasts the in-page readiness race
/// and the settle delay.
fn launch_options(config: &RenderConfig) -> Result<LaunchOptions<'static>> {
    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .window_size(Some((config.viewport.width, config.viewport.height)))
        .idle_browser_timeout(config.session_timeout())
        .args(vec![
            OsStr::new("--hide-scrollbars"),
            OsStr::new("--force-device-scale-factor=1"),
            OsStr::new("--allow-file-access-from-files"),
        ]);
    if let Some(path) = &config.chrome_path {
        builder.path(Some(path.clone()));
    }
    builder
        .build()
        .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))
}

impl Renderer for ChromeRenderer {
    fn launch(config: RenderConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let timeout = Duration::from_millis(config.load_timeout_ms);
        let launch_options = launch_options(&config)?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(timeout);

        debug!(
            "Launched headless Chrome with a {}x{} viewport",
            config.viewport.width, config.viewport.height
        );
        Ok(Self { browser, tab, config })
    }

    fn load(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation to {} failed: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        self.wait_for_render()
    }

    fn capture_png(&self) -> Result<Vec<u8>> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(self.config.viewport.width),
            height: f64::from(self.config.viewport.height),
            scale: 1.0,
        };
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))
    }

    fn close(self) -> Result<()> {
        // Drop the tab before the browser so the child process goes away last.
        drop(self.tab);
        drop(self.browser);
        debug!("Closed headless Chrome");
        Ok(())
    }
}
