//! Headful browser substrate shared by the login-gated adapters.
//!
//! One persistent profile directory holds cookies and sessions across runs,
//! so a single interactive login covers every site. Phase 3 runs the
//! adapters sequentially because only one browser may own the profile at a
//! time; each adapter launches, works, and closes its own browser.

pub mod jobright;
pub mod linkedin;
pub mod simplify;

use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use rand::Rng;
use tokio::task::JoinHandle;

use crate::error::AppError;

const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

pub(crate) const NAV_TIMEOUT: Duration = Duration::from_secs(20);
pub(crate) const LOGIN_POLL_SECS: u64 = 120;

/// A headful Chromium bound to the persistent profile directory, with the
/// automation-signature flag disabled and a desktop viewport.
pub(crate) struct ProfileBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ProfileBrowser {
    pub(crate) async fn launch(profile_dir: &Path) -> Result<ProfileBrowser, AppError> {
        let config = BrowserConfig::builder()
            .with_head()
            .user_data_dir(profile_dir)
            .window_size(1366, 900)
            .arg("--disable-blink-features=AutomationControlled")
            .build()
            .map_err(AppError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(ProfileBrowser {
            browser,
            handler: handle,
        })
    }

    /// Open a fresh tab with the desktop user agent applied.
    pub(crate) async fn new_page(&self) -> Result<Page, AppError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;
        page.set_user_agent(DESKTOP_UA)
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;
        Ok(page)
    }

    pub(crate) async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

/// Navigate with the 20 s budget. Returns false on timeout or error; the
/// caller decides whether to skip the URL or bail.
pub(crate) async fn goto(page: &Page, url: &str) -> bool {
    matches!(
        tokio::time::timeout(NAV_TIMEOUT, page.goto(url)).await,
        Ok(Ok(_))
    )
}

pub(crate) async fn current_url(page: &Page) -> String {
    page.url().await.ok().flatten().unwrap_or_default()
}

/// Poll the page URL once per second until it contains one of the post-login
/// fragments. Returns whether login was observed within the window.
pub(crate) async fn poll_for_login(page: &Page, fragments: &[&str], max_secs: u64) -> bool {
    for _ in 0..max_secs {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let url = current_url(page).await;
        if fragments.iter().any(|f| url.contains(f)) {
            return true;
        }
    }
    false
}

/// Number of elements matching a CSS selector, via the page's own DOM.
pub(crate) async fn query_count(page: &Page, selector: &str) -> usize {
    let js = format!("document.querySelectorAll({selector:?}).length");
    match page.evaluate(js).await {
        Ok(result) => result.into_value::<usize>().unwrap_or(0),
        Err(_) => 0,
    }
}

pub(crate) async fn scroll_by(page: &Page, pixels: u32) {
    let _ = page.evaluate(format!("window.scrollBy(0, {pixels})")).await;
}

pub(crate) async fn scroll_to_bottom(page: &Page) {
    let _ = page
        .evaluate("window.scrollTo(0, document.body.scrollHeight)")
        .await;
}

/// Randomized wait so page interactions resemble human pacing.
pub(crate) async fn human_pause(min_ms: u64, max_ms: u64) {
    let ms = rand::rng().random_range(min_ms..=max_ms);
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
