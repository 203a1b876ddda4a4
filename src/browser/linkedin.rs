//! Authenticated LinkedIn scrape over the persistent profile. Supplements
//! the guest-API adapter with results only visible to a logged-in session.

use std::collections::HashSet;
use std::time::Duration;

use chromiumoxide::page::Page;
use serde::Deserialize;

use crate::browser::{
    LOGIN_POLL_SECS, ProfileBrowser, current_url, goto, human_pause, poll_for_login, query_count,
    scroll_by, scroll_to_bottom,
};
use crate::collectors::boards;
use crate::collectors::linkedin_guest::time_window;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::models::job::{JobRecord, Source, normalize_url};

const FEED_URL: &str = "https://www.linkedin.com/feed/";
const LOGIN_URL: &str = "https://www.linkedin.com/login";

/// URL fragments that mean LinkedIn soft-blocked this request; skip the URL
/// and keep going.
const AUTH_WALLS: &[&str] = &["authwall", "checkpoint", "uas/login", "signup"];

/// Consecutive all-empty queries before the phase bails out.
const EMPTY_QUERY_LIMIT: usize = 4;

#[derive(Deserialize)]
struct BrowserCard {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    date: String,
}

pub async fn run(run_ctx: &Discovery) -> Result<(), AppError> {
    let browser = ProfileBrowser::launch(run_ctx.browser_profile()).await?;
    let result = scrape(&browser, run_ctx).await;
    browser.close().await;
    result
}

async fn scrape(browser: &ProfileBrowser, run: &Discovery) -> Result<(), AppError> {
    let page = browser.new_page().await?;

    // Login check: the feed redirects logged-out sessions away.
    tracing::info!("[LinkedIn] checking login status");
    goto(&page, FEED_URL).await;
    tokio::time::sleep(Duration::from_secs(4)).await;

    let url = current_url(&page).await;
    if !url.contains("feed") && !url.contains("mynetwork") {
        tracing::info!("[LinkedIn] not logged in; waiting for interactive login");
        goto(&page, LOGIN_URL).await;
        if !poll_for_login(&page, &["feed"], LOGIN_POLL_SECS).await {
            tracing::warn!(
                "[LinkedIn] login not detected after {LOGIN_POLL_SECS}s; skipping browser scrape"
            );
            return Ok(());
        }
        tracing::info!("[LinkedIn] login detected");
    }

    let tpr = time_window(run.hours_back());
    let mut seen: HashSet<String> = HashSet::new();
    let mut consecutive_empty = 0;
    let mut total = 0;

    for query in boards::LINKEDIN_QUERIES.iter().copied() {
        let kw = query.replace(' ', "%20");
        let mut query_added = 0;

        for start in [0usize, 25, 50, 75, 100] {
            let search_url = format!(
                "https://www.linkedin.com/jobs/search/?keywords={kw}&location=United%20States&f_E=1%2C2&f_TPR={tpr}&sortBy=DD&start={start}"
            );
            if !goto(&page, &search_url).await {
                continue; // navigation timeout; try the next offset
            }
            if start == 0 {
                human_pause(4000, 6000).await;
            } else {
                human_pause(2500, 4000).await;
            }

            // Soft block: skip this URL, not the whole session.
            let cur = current_url(&page).await;
            if AUTH_WALLS.iter().any(|w| cur.contains(w)) {
                tracing::warn!("[LinkedIn] soft block on '{query}' start={start}; skipping URL");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }

            // A login form appearing mid-run means the session died; records
            // admitted so far are already flushed, so stop cleanly.
            if query_count(&page, "#session_key").await > 0 {
                tracing::warn!("[LinkedIn] session expired mid-run; stopping ({total} jobs kept)");
                return Ok(());
            }

            // Incremental scroll to trigger the lazy-loaded list.
            for _ in 0..8 {
                scroll_by(&page, 600).await;
                tokio::time::sleep(Duration::from_millis(500)).await;
                if query_count(&page, "li[data-occludable-job-id]").await >= 20 {
                    break;
                }
            }
            scroll_to_bottom(&page).await;
            tokio::time::sleep(Duration::from_secs(1)).await;

            let cards = extract_cards(&page).await;
            if cards.is_empty() {
                break; // truly empty page; stop paginating this query
            }

            let mut page_new = 0;
            for card in cards {
                let mut job_url = normalize_url(&card.url);
                if job_url.starts_with('/') {
                    job_url = format!("https://www.linkedin.com{job_url}");
                }
                if job_url.is_empty() || seen.contains(&job_url) {
                    continue;
                }
                seen.insert(job_url.clone());

                if card.title.chars().count() < 3 {
                    continue;
                }
                if !filters::is_role_match(&card.title, run.roles()) {
                    continue;
                }

                let mut record = JobRecord::new(
                    Source::LinkedIn,
                    card.title,
                    if card.company.is_empty() {
                        "Unknown".to_string()
                    } else {
                        card.company
                    },
                );
                record.location = if card.location.is_empty() {
                    "United States".to_string()
                } else {
                    card.location
                };
                record.url = job_url;
                record.description = format!("LinkedIn browser | {query}");
                record.date = if card.date.is_empty() {
                    "today".to_string()
                } else {
                    card.date
                };

                if run.add(record).await {
                    page_new += 1;
                    query_added += 1;
                    total += 1;
                }
            }

            tracing::debug!("[LinkedIn browser] '{query}' start={start}: +{page_new}");
            if page_new == 0 && start > 0 {
                break; // a full page of already-seen cards; move on
            }
            human_pause(1500, 3000).await;
        }

        if query_added == 0 {
            consecutive_empty += 1;
            if consecutive_empty >= EMPTY_QUERY_LIMIT {
                tracing::info!("[LinkedIn] {EMPTY_QUERY_LIMIT} consecutive empty queries; stopping early");
                break;
            }
        } else {
            consecutive_empty = 0;
        }
        human_pause(2000, 3500).await;
    }

    tracing::info!("LinkedIn browser: +{total} jobs");
    Ok(())
}

/// One-shot DOM extraction. Primary wrapper is `li[data-occludable-job-id]`
/// with `a[href*='/jobs/view/']` and `time[datetime]`; older list classes
/// are the fallback.
async fn extract_cards(page: &Page) -> Vec<BrowserCard> {
    let js = r#"(() => {
        let cards = Array.from(document.querySelectorAll('li[data-occludable-job-id]'));
        if (cards.length === 0) {
            cards = Array.from(document.querySelectorAll(
                '.job-search-card, .jobs-search-results__list-item, .scaffold-layout__list-item'));
        }
        return cards.map(card => {
            const link = card.querySelector("a[href*='/jobs/view/']")
                || card.querySelector("a[href*='/jobs/collections/']");
            const title = card.querySelector(
                "h3.base-search-card__title, a[href*='/jobs/view/'] span[aria-hidden='true'], .job-card-list__title, h3, h4");
            const co = card.querySelector(
                ".job-card-container__primary-description, .job-card-container__company-name, .artdeco-entity-lockup__subtitle, h4.base-search-card__subtitle, .job-search-card__company-name");
            const loc = card.querySelector(
                "span.job-search-card__location, .job-card-container__metadata-wrapper");
            const time = card.querySelector('time[datetime]') || card.querySelector('time');
            return {
                url: link ? (link.getAttribute('href') || '') : '',
                title: title && title.innerText ? title.innerText.trim() : '',
                company: co && co.innerText ? co.innerText.trim() : '',
                location: loc && loc.innerText ? loc.innerText.trim() : '',
                date: time ? ((time.getAttribute('datetime') || time.innerText || '').trim()) : ''
            };
        });
    })()"#;

    match page.evaluate(js).await {
        Ok(result) => result.into_value::<Vec<BrowserCard>>().unwrap_or_default(),
        Err(e) => {
            tracing::debug!("[LinkedIn browser] card extraction failed: {e}");
            Vec::new()
        }
    }
}
