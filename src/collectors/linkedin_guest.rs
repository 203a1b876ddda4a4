use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::{ElementRef, Html, Selector};

use crate::collectors::{SourceAdapter, boards};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source, normalize_url};

/// Characters that encodeURIComponent does NOT encode.
/// RFC 3986 unreserved: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const BASE_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const PAGE_SIZE: usize = 25;
const START_CAP: usize = 200;

/// `f_TPR` window: seconds-from-now tier matched to the lookback.
pub(crate) fn time_window(hours_back: f64) -> &'static str {
    if hours_back <= 1.0 {
        "r3600"
    } else if hours_back <= 6.0 {
        "r21600"
    } else if hours_back <= 24.0 {
        "r86400"
    } else if hours_back <= 72.0 {
        "r259200"
    } else {
        "r604800"
    }
}

static CARD_DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.base-card").unwrap());
static CARD_LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.base-search-card__title").unwrap());
static TITLE_H3: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static TITLE_H4: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4").unwrap());
static SUBTITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h4.base-search-card__subtitle").unwrap());
static HIDDEN_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.hidden-nested-link").unwrap());
static FULL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.base-card__full-link").unwrap());
static VIEW_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/jobs/view/"]"#).unwrap());
static LOCATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.job-search-card__location").unwrap());
static TIME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("time").unwrap());

/// LinkedIn guest search API: no login, HTML fragments of 25 job cards per
/// page. Run per query over the shared matrix; pagination per query stops at
/// the first page that adds nothing new.
pub struct LinkedInGuest;

#[async_trait]
impl SourceAdapter for LinkedInGuest {
    fn name(&self) -> String {
        "linkedin-guest".to_string()
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let tpr = time_window(run.hours_back());
        let mut seen: HashSet<String> = HashSet::new();
        let mut total = 0;

        for query in boards::LINKEDIN_QUERIES.iter().copied() {
            let kw = utf8_percent_encode(query, ENCODE_URI_COMPONENT_SET).to_string();

            for start in (0..START_CAP).step_by(PAGE_SIZE) {
                let url = format!(
                    "{BASE_URL}?keywords={kw}&location=United%20States&f_E=1%2C2&f_TPR={tpr}&sortBy=DD&start={start}"
                );
                let resp = match http
                    .send(
                        http.get(&url)
                            .header("Accept-Language", "en-US,en;q=0.5")
                            .header("Referer", "https://www.linkedin.com/"),
                    )
                    .await
                {
                    Ok(resp) if resp.status().is_success() => resp,
                    _ => break,
                };
                let html = match resp.text().await {
                    Ok(html) if !html.trim().is_empty() => html,
                    _ => break,
                };

                let cards = parse_cards(&html);
                if cards.is_empty() {
                    break;
                }

                let mut page_new = 0;
                for card in cards {
                    if seen.contains(&card.url) {
                        continue;
                    }
                    seen.insert(card.url.clone());

                    if !filters::is_role_match(&card.title, run.roles()) {
                        continue;
                    }

                    let mut record = JobRecord::new(Source::LinkedIn, card.title, card.company);
                    record.location = card.location;
                    record.url = card.url;
                    record.description = format!("LinkedIn API | {query}");
                    record.date = card.date;

                    if run.add(record).await {
                        page_new += 1;
                        total += 1;
                    }
                }

                tracing::debug!("[LinkedIn API] q='{query}' start={start}: +{page_new}");
                if page_new == 0 && start > 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(800)).await;
            }
        }

        if total > 0 {
            tracing::info!("LinkedIn API: +{total} jobs");
        }
        Ok(())
    }
}

pub(crate) struct GuestCard {
    pub title: String,
    pub company: String,
    pub url: String,
    pub location: String,
    pub date: String,
}

/// Parse a guest-search HTML fragment into plain card data. LinkedIn A/B
/// tests the wrapper: `div.base-card` on the newer shape, bare `<li>` on the
/// older one; both are handled.
pub(crate) fn parse_cards(html: &str) -> Vec<GuestCard> {
    let doc = Html::parse_document(html);
    let mut cards: Vec<ElementRef> = doc.select(&CARD_DIV).collect();
    if cards.is_empty() {
        cards = doc.select(&CARD_LI).collect();
    }

    let mut out = Vec::new();
    for card in cards {
        let Some(title) = first_text(card, &[&TITLE, &TITLE_H3, &TITLE_H4]) else {
            continue;
        };
        if title.chars().count() < 3 {
            continue;
        }

        // The bare-h4 fallback used for titles can land on the location
        // span; the company lookup therefore only trusts explicit classes.
        let company =
            first_text(card, &[&SUBTITLE, &HIDDEN_LINK]).unwrap_or_else(|| "Unknown".to_string());

        let Some(link) = card
            .select(&FULL_LINK)
            .next()
            .or_else(|| card.select(&VIEW_LINK).next())
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let url = normalize_url(link);
        if url.is_empty() {
            continue;
        }

        let location = first_text(card, &[&LOCATION]).unwrap_or_else(|| "United States".to_string());

        let date = card
            .select(&TIME)
            .next()
            .map(|t| {
                t.value()
                    .attr("datetime")
                    .map(String::from)
                    .unwrap_or_else(|| element_text(t))
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "today".to_string());

        out.push(GuestCard {
            title,
            company,
            url,
            location,
            date,
        });
    }
    out
}

fn element_text(el: ElementRef<'_>) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(card: ElementRef<'_>, selectors: &[&Selector]) -> Option<String> {
    for sel in selectors {
        if let Some(el) = card.select(sel).next() {
            let text = element_text(el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_SHAPE: &str = r#"
        <ul>
          <div class="base-card">
            <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/123?refId=abc"></a>
            <h3 class="base-search-card__title">Software Engineer I</h3>
            <h4 class="base-search-card__subtitle">Acme Corp</h4>
            <span class="job-search-card__location">Austin, TX</span>
            <time datetime="2026-07-30">1 day ago</time>
          </div>
        </ul>"#;

    const OLD_SHAPE: &str = r#"
        <ul>
          <li>
            <a href="https://www.linkedin.com/jobs/view/456/"></a>
            <h3>Data Analyst</h3>
            <h4>Beta Inc</h4>
            <time>2 days ago</time>
          </li>
        </ul>"#;

    #[test]
    fn parses_new_card_shape() {
        let cards = parse_cards(NEW_SHAPE);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Software Engineer I");
        assert_eq!(cards[0].company, "Acme Corp");
        // Tracking params stripped.
        assert_eq!(cards[0].url, "https://www.linkedin.com/jobs/view/123");
        assert_eq!(cards[0].location, "Austin, TX");
        assert_eq!(cards[0].date, "2026-07-30");
    }

    #[test]
    fn falls_back_to_li_cards() {
        let cards = parse_cards(OLD_SHAPE);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Data Analyst");
        assert_eq!(cards[0].url, "https://www.linkedin.com/jobs/view/456");
        assert_eq!(cards[0].location, "United States");
        assert_eq!(cards[0].date, "2 days ago");
    }

    #[test]
    fn cards_without_links_are_dropped() {
        let html = r#"<div class="base-card"><h3>Orphan Role</h3></div>"#;
        assert!(parse_cards(html).is_empty());
    }

    #[test]
    fn time_window_tiers() {
        assert_eq!(time_window(1.0), "r3600");
        assert_eq!(time_window(6.0), "r21600");
        assert_eq!(time_window(24.0), "r86400");
        assert_eq!(time_window(48.0), "r259200");
        assert_eq!(time_window(168.0), "r604800");
    }
}
