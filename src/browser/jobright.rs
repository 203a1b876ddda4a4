//! Jobright AI browser adapter. Opt-in: the site's bot protection makes it
//! unreliable headless-adjacent, so it only runs behind `--with-jobright`.

use std::collections::HashSet;
use std::time::Duration;

use chromiumoxide::page::Page;
use serde::Deserialize;

use crate::browser::{ProfileBrowser, goto, human_pause, query_count, scroll_to_bottom};
use crate::collectors::boards;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::models::job::{JobRecord, Source, normalize_url};

const CARD_SELECTOR: &str = "[data-testid='job-card'], .job-card, article";
const LOAD_MORE_ATTEMPTS: usize = 5;

/// Words marking a line as a timestamp rather than a title.
const TIMESTAMP_WORDS: &[&str] = &[
    "ago", "today", "yesterday", "hour", "hours", "day", "days", "week", "month", "minute",
];

#[derive(Deserialize)]
struct JobrightCard {
    #[serde(default)]
    href: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    salary: String,
    #[serde(default, rename = "innerText")]
    inner_text: String,
}

pub async fn run(run_ctx: &Discovery) -> Result<(), AppError> {
    let browser = ProfileBrowser::launch(run_ctx.browser_profile()).await?;
    let result = scrape(&browser, run_ctx).await;
    browser.close().await;
    result
}

async fn scrape(browser: &ProfileBrowser, run: &Discovery) -> Result<(), AppError> {
    let page = browser.new_page().await?;

    // Search works without login; recommendations would need one, and
    // they're not scraped here.
    goto(&page, "https://jobright.ai/").await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let mut total = 0;
    for (role, experience) in boards::JOBRIGHT_QUERIES.iter().copied() {
        let url = format!(
            "https://jobright.ai/jobs/search?value={}&experienceLevel={experience}&country=US&daysAgo=1",
            role.replace(' ', "+")
        );
        tracing::debug!("[Jobright] '{role}' ({experience})");
        if !goto(&page, &url).await {
            continue;
        }
        human_pause(4000, 6000).await;

        load_all_cards(&page).await;

        total += extract_and_add(&page, run).await;
        human_pause(1500, 3000).await;
    }

    tracing::info!("Jobright: +{total} jobs");
    Ok(())
}

/// Scroll to the bottom and click "Load More" until the card count stops
/// growing or the attempt budget runs out.
async fn load_all_cards(page: &Page) {
    for _ in 0..LOAD_MORE_ATTEMPTS {
        for _ in 0..3 {
            scroll_to_bottom(page).await;
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        let before = query_count(page, CARD_SELECTOR).await;
        let clicked = page
            .evaluate(
                r#"(() => {
                    const texts = ['load more', 'show more', 'see more jobs'];
                    const btn = Array.from(document.querySelectorAll('button'))
                        .find(b => texts.some(t => (b.innerText || '').toLowerCase().includes(t)))
                        || document.querySelector("[data-testid='load-more']");
                    if (btn) { btn.click(); return true; }
                    return false;
                })()"#,
            )
            .await
            .ok()
            .and_then(|r| r.into_value::<bool>().ok())
            .unwrap_or(false);
        if !clicked {
            break;
        }

        tokio::time::sleep(Duration::from_millis(2500)).await;
        if query_count(page, CARD_SELECTOR).await <= before {
            break;
        }
    }
}

/// Single-evaluate extraction of every card linked to a job detail page.
async fn extract_and_add(page: &Page, run: &Discovery) -> usize {
    // Make sure lazy cards are rendered before reading the DOM.
    for _ in 0..4 {
        scroll_to_bottom(page).await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
    }

    let js = r#"(() => {
        const cards = Array.from(document.querySelectorAll('a[href*="/jobs/info/"]'));
        return cards.map(card => {
            const h2 = card.querySelector('h2, h3');
            const companyEl = card.querySelector('[class*="company"]');
            const timeEl = card.querySelector('[class*="time"]');
            const metaEls = Array.from(card.querySelectorAll('[class*="job-metadata-item"]'));
            const loc = metaEls.map(e => e.innerText ? e.innerText.trim() : '')
                .find(t => t.includes('United States') || t.includes('Remote') || /,\s*[A-Z]{2}$/.test(t))
                || 'United States';
            const salary = Array.from(card.querySelectorAll('*'))
                .map(e => e.innerText || '')
                .find(t => t.includes('$') && (t.includes('/yr') || t.includes('K/yr') || t.includes('/year')))
                || '';
            return {
                href: card.getAttribute('href') || '',
                title: h2 && h2.innerText ? h2.innerText.trim() : '',
                company: companyEl && companyEl.innerText ? companyEl.innerText.trim().split('\n')[0] : 'Unknown',
                location: loc,
                date: timeEl && timeEl.innerText ? timeEl.innerText.trim() : 'today',
                salary: salary.trim().substring(0, 80),
                innerText: card.innerText ? card.innerText.substring(0, 400) : ''
            };
        });
    })()"#;

    let cards: Vec<JobrightCard> = match page.evaluate(js).await {
        Ok(result) => result.into_value().unwrap_or_default(),
        Err(e) => {
            tracing::debug!("[Jobright] extraction failed: {e}");
            return 0;
        }
    };
    tracing::debug!("[Jobright] {} raw cards", cards.len());

    let mut seen: HashSet<String> = HashSet::new();
    let mut added = 0;

    for card in cards {
        if card.href.is_empty() {
            continue;
        }
        let full_url = if card.href.starts_with('/') {
            format!("https://jobright.ai{}", card.href)
        } else {
            card.href.clone()
        };
        let base_url = normalize_url(&full_url);
        if seen.contains(&base_url) {
            continue;
        }
        seen.insert(base_url);

        let title = resolve_title(&card.title, &card.inner_text);
        let Some(title) = title else {
            continue;
        };

        if !filters::is_role_match(&title, run.roles()) {
            continue;
        }
        if !filters::is_us_location(&card.location) {
            continue;
        }

        let mut record = JobRecord::new(Source::JobrightAi, title.clone(), card.company);
        record.location = card.location;
        record.url = full_url;
        record.description = format!(
            "JobRight AI: {title} at {} -- {}",
            record.company, record.location
        );
        record.date = card.date;
        record.salary = card.salary;
        record.sponsorship = filters::extract_sponsorship(&card.inner_text).to_string();

        if run.add(record).await {
            added += 1;
        }
    }

    added
}

/// The extracted heading is sometimes empty or a relative timestamp; in
/// that case scan the card text for the first plausible title line.
fn resolve_title(raw: &str, inner_text: &str) -> Option<String> {
    let raw = raw.trim();
    let looks_like_timestamp = {
        let rl = raw.to_lowercase();
        TIMESTAMP_WORDS.iter().any(|w| rl.contains(w))
    };

    if raw.chars().count() >= 3 && !looks_like_timestamp {
        return Some(raw.to_string());
    }

    for line in inner_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        let words: HashSet<&str> = lower.split_whitespace().collect();
        if TIMESTAMP_WORDS.iter().any(|w| words.contains(w)) {
            continue;
        }
        if line.chars().count() >= 5
            && !line.starts_with("http")
            && !line.contains(['/', '|', '$'])
        {
            return Some(line.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_titles_pass_through() {
        assert_eq!(
            resolve_title("Software Engineer I", "whatever"),
            Some("Software Engineer I".to_string())
        );
    }

    #[test]
    fn timestamp_titles_fall_back_to_inner_text() {
        let inner = "3 hours ago\nAcme Corp\nSoftware Engineer, Backend\n$120K/yr";
        assert_eq!(
            resolve_title("2 days ago", inner),
            Some("Software Engineer, Backend".to_string())
        );
    }

    #[test]
    fn unresolvable_cards_are_dropped() {
        assert_eq!(resolve_title("", "1 day ago\nhttp://x\n$5"), None);
    }
}
