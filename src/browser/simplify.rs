//! Simplify.jobs browser adapter. The site renders through an internal
//! search API that a plain HTTP client cannot reach (Cloudflare), so instead
//! of scraping the DOM this adapter listens for the search responses the
//! page itself receives and parses those.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, GetResponseBodyParams, RequestId,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::browser::{
    LOGIN_POLL_SECS, ProfileBrowser, goto, poll_for_login, query_count, scroll_to_bottom,
};
use crate::collectors::boards;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::models::job::{JobRecord, Source};

/// DOM markers that only render for a logged-in session.
const LOGIN_INDICATORS: &str = r#"[data-testid="user-avatar"], a[href*="/applications"], [aria-label="Profile menu"], a[href*="/profile"]"#;

/// Search-API responses worth intercepting.
fn is_search_response(url: &str) -> bool {
    url.contains("js-ha.simplify.jobs") && (url.contains("search") || url.contains("multi_search"))
}

/// North America bounding box used by the Simplify frontend.
const SIMPLIFY_POINTS: &str = "83%3B-170%3B7%3B-52";

fn search_url(query: &str) -> String {
    let kw = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    format!(
        "https://simplify.jobs/jobs?query={kw}\
         &state=North%20America\
         &points={SIMPLIFY_POINTS}\
         &experience=Entry%20Level%2FNew%20Grad%3BJunior\
         &category=Software%20Engineering%3BData%20%26%20Analytics%3BAI%20%26%20Machine%20Learning\
         &h1b=true\
         &jobType=Full-Time%3BContract\
         &workArrangement=Remote%3BHybrid%3BIn%20Person"
    )
}

pub async fn run(run_ctx: &Discovery) -> Result<(), AppError> {
    let browser = ProfileBrowser::launch(run_ctx.browser_profile()).await?;
    let result = scrape(&browser, run_ctx).await;
    browser.close().await;
    result
}

async fn scrape(browser: &ProfileBrowser, run: &Discovery) -> Result<(), AppError> {
    let page = browser.new_page().await?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .map_err(|e| AppError::Browser(e.to_string()))?;

    tracing::info!("[Simplify] checking login status");
    goto(&page, "https://simplify.jobs/").await;
    tokio::time::sleep(Duration::from_millis(3500)).await;

    if query_count(&page, LOGIN_INDICATORS).await == 0 {
        tracing::info!("[Simplify] not logged in; waiting for interactive login");
        goto(&page, "https://simplify.jobs/auth/login").await;
        if poll_for_login(&page, &["/jobs", "/home", "/applications"], LOGIN_POLL_SECS).await {
            tracing::info!("[Simplify] login detected");
        } else {
            // Guest search still works, just with fewer results.
            tracing::warn!("[Simplify] login not detected; continuing as guest");
        }
    }

    let mut total = 0;
    for query in boards::SIMPLIFY_QUERIES.iter().copied() {
        goto(&page, &search_url(query)).await;

        // Let the page fire its search calls, then nudge the infinite
        // scroll once for any follow-up page.
        let mut request_ids = drain_matching(&mut responses, Duration::from_secs(5)).await;
        scroll_to_bottom(&page).await;
        request_ids.extend(drain_matching(&mut responses, Duration::from_secs(2)).await);

        let mut query_added = 0;
        let mut fetched = 0;
        for id in request_ids {
            let Some(body) = response_body(&page, id).await else {
                continue;
            };
            let Ok(data) = serde_json::from_str::<Value>(&body) else {
                continue;
            };

            for doc in search_documents(&data) {
                fetched += 1;
                let Some(record) = document_to_record(&doc, query) else {
                    continue;
                };
                if !filters::is_role_match(&record.title, run.roles())
                    && !record.title.to_lowercase().contains("engineer")
                    && !record.title.to_lowercase().contains("analyst")
                {
                    continue;
                }
                if run.add(record).await {
                    query_added += 1;
                    total += 1;
                }
            }
        }

        tracing::debug!("[Simplify] '{query}': {fetched} fetched, +{query_added} added");
    }

    tracing::info!("Simplify browser: +{total} jobs");
    Ok(())
}

/// Drain the response stream for `window`, keeping search-API request ids.
async fn drain_matching(
    responses: &mut (impl futures::Stream<Item = std::sync::Arc<EventResponseReceived>> + Unpin),
    window: Duration,
) -> Vec<RequestId> {
    let deadline = tokio::time::Instant::now() + window;
    let mut ids = Vec::new();
    loop {
        match tokio::time::timeout_at(deadline, responses.next()).await {
            Ok(Some(event)) => {
                if is_search_response(&event.response.url) {
                    ids.push(event.request_id.clone());
                }
            }
            Ok(None) => break,
            Err(_) => break, // window elapsed
        }
    }
    ids
}

async fn response_body(page: &Page, id: RequestId) -> Option<String> {
    let resp = page.execute(GetResponseBodyParams::new(id)).await.ok()?;
    if resp.base64_encoded {
        return None; // search responses are plain JSON
    }
    Some(resp.body.clone())
}

/// Hit documents from either response shape:
/// `results[].hits[].document` (multi-search) or `hits[].document`.
fn search_documents(data: &Value) -> Vec<Value> {
    let mut docs = Vec::new();
    let mut push_hits = |hits: &Value| {
        if let Some(list) = hits.as_array() {
            for hit in list {
                if let Some(doc) = hit.get("document") {
                    docs.push(doc.clone());
                }
            }
        }
    };

    if let Some(results) = data.get("results").and_then(|r| r.as_array()) {
        for result in results {
            if let Some(hits) = result.get("hits") {
                push_hits(hits);
            }
        }
    } else if let Some(hits) = data.get("hits") {
        push_hits(hits);
    }
    docs
}

fn document_to_record(doc: &Value, query: &str) -> Option<JobRecord> {
    let title = doc.get("title").and_then(|t| t.as_str())?.trim().to_string();
    if title.chars().count() < 3 {
        return None;
    }
    let tl = title.to_lowercase();
    if ["senior", "staff ", "principal", "director"].iter().any(|x| tl.contains(x)) {
        return None;
    }

    let id = doc
        .get("id")
        .or_else(|| doc.get("job_id"))
        .and_then(|i| i.as_str())?;
    let url = format!("https://simplify.jobs/p/{id}");

    let date = doc
        .get("start_date")
        .or_else(|| doc.get("updated_date"))
        .and_then(|d| d.as_i64())
        .and_then(filters::parse_epoch)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "today".to_string());

    let locations = doc.get("locations").and_then(|l| l.as_array());
    let loc_str = locations
        .and_then(|l| l.first())
        .map(|first| match first {
            Value::Object(obj) => obj
                .get("value")
                .and_then(|v| v.as_str())
                .unwrap_or("United States")
                .to_string(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "United States".to_string());
    let remote = doc
        .get("travel_requirements")
        .and_then(|t| t.as_str())
        .is_some_and(|t| t.contains("Remote"));
    let location = if remote {
        format!("{loc_str} (Remote)")
    } else {
        loc_str
    };

    let salary = match (
        doc.get("min_salary").and_then(|s| s.as_f64()),
        doc.get("max_salary").and_then(|s| s.as_f64()),
    ) {
        (Some(min), Some(max)) => {
            let mut s = format!("${min:.0} - ${max:.0}");
            if doc.get("salary_period").and_then(|p| p.as_i64()) == Some(1) {
                s.push_str("/hr");
            }
            s
        }
        _ => String::new(),
    };

    let mut record = JobRecord::new(
        Source::Simplify,
        title,
        doc.get("company_name").and_then(|c| c.as_str()).unwrap_or("Unknown"),
    );
    record.location = location;
    record.url = url;
    record.description = format!("Simplify API | {query}");
    record.date = date;
    record.salary = salary;
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn documents_extracted_from_both_shapes() {
        let multi = json!({"results": [{"hits": [{"document": {"id": "a"}}, {"document": {"id": "b"}}]}]});
        assert_eq!(search_documents(&multi).len(), 2);

        let single = json!({"hits": [{"document": {"id": "c"}}]});
        assert_eq!(search_documents(&single).len(), 1);

        assert!(search_documents(&json!({})).is_empty());
    }

    #[test]
    fn document_becomes_record() {
        let doc = json!({
            "title": "Software Engineer I",
            "id": "abc-123",
            "company_name": "Acme",
            "start_date": 1_753_000_000i64,
            "locations": [{"value": "Austin, TX"}],
            "travel_requirements": "Remote OK",
            "min_salary": 95000.0,
            "max_salary": 120000.0
        });
        let record = document_to_record(&doc, "swe new grad").unwrap();
        assert_eq!(record.url, "https://simplify.jobs/p/abc-123");
        assert_eq!(record.location, "Austin, TX (Remote)");
        assert_eq!(record.salary, "$95000 - $120000");
        assert!(record.date.starts_with("20"));
    }

    #[test]
    fn senior_documents_rejected() {
        let doc = json!({"title": "Senior Engineer", "id": "x"});
        assert!(document_to_record(&doc, "q").is_none());
    }

    #[test]
    fn search_response_filter() {
        assert!(is_search_response("https://js-ha.simplify.jobs/multi_search?x=1"));
        assert!(is_search_response("https://js-ha.simplify.jobs/collections/jobs/search"));
        assert!(!is_search_response("https://simplify.jobs/jobs"));
    }
}
