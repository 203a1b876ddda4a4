use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::collectors::{SourceAdapter, boards};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// Hard-senior tokens for the curated feeds. The lists are pre-curated for
/// new grads, so only clearly wrong titles are rejected here; full seniority
/// blocking still happens at admission.
const FEED_REJECT: &[&str] = &["senior", "staff ", "principal", "director", "manager", "lead "];

/// Curated community JSON feeds of new-grad positions (primary pair).
/// The repos update daily at best, so the freshness window is widened to at
/// least 7 days; entries without a parseable date are dropped.
pub struct CuratedJsonFeeds;

#[async_trait]
impl SourceAdapter for CuratedJsonFeeds {
    fn name(&self) -> String {
        "curated-json-feeds".to_string()
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let cutoff = filters::github_cutoff(run.cutoff(), 7);

        for url in boards::JSON_FEEDS.iter().copied() {
            let resp = match http.send(http.get(url)).await {
                Ok(resp) if resp.status().is_success() => resp,
                _ => continue,
            };
            let jobs: Vec<Value> = match resp.json().await {
                Ok(Value::Array(list)) => list,
                _ => continue,
            };

            let mut added = 0;
            for job in &jobs {
                let Some(posted) = entry_date(job) else {
                    continue;
                };
                if posted < cutoff {
                    continue;
                }

                let title = job
                    .get("role")
                    .or_else(|| job.get("title"))
                    .and_then(|t| t.as_str())
                    .unwrap_or("");
                if title.is_empty() {
                    continue;
                }
                let tl = title.to_lowercase();
                if FEED_REJECT.iter().any(|r| tl.contains(r)) {
                    continue;
                }

                let location = entry_locations(job);
                if !filters::is_us_location(&location) {
                    continue;
                }

                let company = job
                    .get("companyName")
                    .or_else(|| job.get("company"))
                    .and_then(|c| c.as_str())
                    .unwrap_or("Unknown");

                let mut record = JobRecord::new(Source::SimplifyFeeds, title, company);
                record.location = location;
                record.url = entry_url(job);
                record.description = "Sourced from SimplifyJobs community list.".to_string();
                record.date = posted.format("%Y-%m-%d").to_string();
                record.sponsorship = entry_sponsorship(job).to_string();

                if run.add(record).await {
                    added += 1;
                }
            }

            if added > 0 {
                tracing::info!("SimplifyJobs feed {url}: +{added} jobs");
            }
        }

        Ok(())
    }
}

/// `datePosted` / `date_posted`, as epoch integer or ISO string. `None`
/// means undated, which these feeds treat as a rejection.
pub(super) fn entry_date(job: &Value) -> Option<DateTime<Utc>> {
    let raw = job.get("datePosted").or_else(|| job.get("date_posted"))?;
    match raw {
        Value::Number(n) => n.as_i64().and_then(filters::parse_epoch),
        Value::String(s) => filters::parse_date(s),
        _ => None,
    }
}

/// Best application URL across the field names the feeds use.
pub(super) fn entry_url(job: &Value) -> String {
    let links = job
        .get("applicationLinks")
        .or_else(|| job.get("applicationLink"));
    match links {
        Some(Value::Array(list)) => {
            if let Some(first) = list.first().and_then(|l| l.as_str()) {
                return first.to_string();
            }
        }
        Some(Value::String(s)) if !s.is_empty() => return s.clone(),
        _ => {}
    }
    job.get("url")
        .or_else(|| job.get("apply_url"))
        .or_else(|| job.get("applyUrl"))
        .and_then(|u| u.as_str())
        .unwrap_or("")
        .to_string()
}

/// Up to three locations joined " | "; feeds default to United States.
pub(super) fn entry_locations(job: &Value) -> String {
    let locs = job.get("locations").or_else(|| job.get("location"));
    match locs {
        Some(Value::Array(list)) => {
            let parts: Vec<&str> = list.iter().filter_map(|l| l.as_str()).take(3).collect();
            if parts.is_empty() {
                "United States".to_string()
            } else {
                parts.join(" | ")
            }
        }
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "United States".to_string(),
    }
}

/// The feeds carry a yes/no sponsorship field rather than free text.
pub(super) fn entry_sponsorship(job: &Value) -> &'static str {
    let sp = job
        .get("sponsorship")
        .map(|s| s.to_string().to_lowercase())
        .unwrap_or_default();
    if ["yes", "true", "sponsor"].iter().any(|x| sp.contains(x)) {
        return "Likely";
    }
    if ["no", "false"].iter().any(|x| sp.contains(x)) {
        return "No";
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_prefers_application_links_array() {
        let job = json!({"applicationLinks": ["https://a.test/apply"], "url": "https://b.test"});
        assert_eq!(entry_url(&job), "https://a.test/apply");

        let job = json!({"applicationLink": "https://c.test/apply"});
        assert_eq!(entry_url(&job), "https://c.test/apply");

        let job = json!({"apply_url": "https://d.test"});
        assert_eq!(entry_url(&job), "https://d.test");
    }

    #[test]
    fn date_handles_epoch_and_iso() {
        assert!(entry_date(&json!({"datePosted": 1_730_000_000i64})).is_some());
        assert!(entry_date(&json!({"datePosted": 1_730_000_000_000i64})).is_some());
        assert!(entry_date(&json!({"date_posted": "2026-07-01"})).is_some());
        assert!(entry_date(&json!({"datePosted": "not a date"})).is_none());
        assert!(entry_date(&json!({})).is_none());
    }

    #[test]
    fn locations_join_and_default() {
        assert_eq!(
            entry_locations(&json!({"locations": ["NYC", "SF", "Austin", "Boston"]})),
            "NYC | SF | Austin"
        );
        assert_eq!(entry_locations(&json!({})), "United States");
    }

    #[test]
    fn sponsorship_field_mapping() {
        assert_eq!(entry_sponsorship(&json!({"sponsorship": "Yes"})), "Likely");
        assert_eq!(entry_sponsorship(&json!({"sponsorship": "Does not offer"})), "No");
        assert_eq!(entry_sponsorship(&json!({})), "");
    }
}
