use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;

use crate::collectors::{SourceAdapter, boards, feeds_json};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// Role tokens accepted by the multi-repo fallback (new-grad focus).
const ACCEPT_ROLES: &[&str] = &[
    "software engineer", "swe", "sde", "developer", "engineer",
    // Data
    "data engineer", "data analyst", "data scientist", "analytics engineer",
    "analytics analyst", "business analyst", "business intelligence",
    "bi analyst", "bi developer", "bi engineer",
    "quantitative analyst", "operations analyst", "product analyst",
    "research analyst", "market analyst", "financial analyst",
    // ML / AI
    "machine learning", "ml engineer", "ai engineer", "ai researcher",
    "nlp engineer", "computer vision", "applied scientist",
    // Infra
    "cloud engineer", "devops", "platform engineer", "site reliability",
    "infrastructure engineer", "systems engineer",
    // Mobile
    "mobile engineer", "ios engineer", "android engineer",
    // Security / QA
    "security engineer", "qa engineer", "quality engineer",
    // Catch-all
    "analyst", "scientist",
];

const REJECT_ROLES: &[&str] = &[
    "senior", "staff ", "principal", "director", "manager", "lead ", "intern", "summer",
];

/// Multi-repo fallback over Simplify-style JSON feeds. The Simplify REST API
/// sits behind Cloudflare, so the same data is pulled from eight community
/// mirrors in parallel, with a 7-day minimum window and a broad role filter
/// that still excludes internships.
pub struct SimplifyRepos;

#[async_trait]
impl SourceAdapter for SimplifyRepos {
    fn name(&self) -> String {
        "simplify-multi-repo".to_string()
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let cutoff = filters::github_cutoff(run.cutoff(), 7);

        let fetches = boards::SIMPLIFY_REPO_FEEDS.iter().map(|(url, label)| {
            let http = http.clone();
            async move {
                let resp = http.send(http.get(url)).await.ok()?;
                if !resp.status().is_success() {
                    return None;
                }
                match resp.json::<Value>().await {
                    Ok(Value::Array(jobs)) => Some((*label, jobs)),
                    _ => None,
                }
            }
        });

        let mut total = 0;
        for feed in join_all(fetches).await.into_iter().flatten() {
            let (label, jobs) = feed;
            let mut added = 0;

            for job in &jobs {
                let Some(posted) = feeds_json::entry_date(job) else {
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
                if REJECT_ROLES.iter().any(|r| tl.contains(r)) {
                    continue;
                }
                if !ACCEPT_ROLES.iter().any(|r| tl.contains(r)) {
                    continue;
                }

                let location = feeds_json::entry_locations(job);
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
                record.url = feeds_json::entry_url(job);
                record.description = format!("Sourced from {label} GitHub feed.");
                record.date = posted.format("%Y-%m-%d").to_string();
                record.sponsorship = feeds_json::entry_sponsorship(job).to_string();

                if run.add(record).await {
                    added += 1;
                    total += 1;
                }
            }

            if added > 0 {
                tracing::info!("Simplify repo [{label}]: +{added} jobs");
            }
        }

        if total > 0 {
            tracing::info!("Simplify multi-repo total: +{total} jobs");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_list_trumps_accept_list() {
        // "Senior Data Engineer" contains an accept token but must fail.
        let tl = "senior data engineer";
        assert!(REJECT_ROLES.iter().any(|r| tl.contains(r)));

        // Internships are out even though "engineer" matches.
        let tl = "software engineer intern";
        assert!(REJECT_ROLES.iter().any(|r| tl.contains(r)));

        let tl = "data engineer";
        assert!(!REJECT_ROLES.iter().any(|r| tl.contains(r)));
        assert!(ACCEPT_ROLES.iter().any(|r| tl.contains(r)));
    }
}
