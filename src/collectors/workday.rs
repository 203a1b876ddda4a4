use async_trait::async_trait;
use serde_json::{Value, json};

use crate::collectors::{SourceAdapter, boards};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

const PAGE_SIZE: usize = 50;
const OFFSET_CAP: usize = 200;

/// Workday POST-based JSON search, run per keyword over the entry-level
/// keyword list. These boards share aggressive rate limiting, so the
/// orchestrator runs one company at a time on its own short-timeout session.
pub struct Workday {
    pub company: &'static str,
    pub base_url: &'static str,
}

#[async_trait]
impl SourceAdapter for Workday {
    fn name(&self) -> String {
        format!("workday:{}", self.company)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        // Some list entries point at other ATSes; those are covered by their
        // own adapters.
        if !self.base_url.contains("myworkdayjobs.com") {
            return Ok(());
        }

        let search_url = format!("{}/jobs", self.base_url.trim_end_matches('/'));
        let mut added = 0;

        for keyword in boards::WORKDAY_KEYWORDS.iter().copied() {
            let mut offset = 0;
            loop {
                let payload = json!({
                    "appliedFacets": {},
                    "limit": PAGE_SIZE,
                    "offset": offset,
                    "searchText": keyword,
                });
                // A dead board for one keyword shouldn't kill the others.
                let resp = match http.send(http.post(&search_url).json(&payload)).await {
                    Ok(resp) if resp.status().is_success() => resp,
                    _ => break,
                };
                let data: Value = resp.json().await?;
                let postings = data
                    .get("jobPostings")
                    .and_then(|p| p.as_array())
                    .cloned()
                    .unwrap_or_default();
                if postings.is_empty() {
                    break;
                }

                let mut page_added = 0;
                for job in &postings {
                    let title = job.get("title").and_then(|t| t.as_str()).unwrap_or("");
                    if !filters::is_role_match(title, run.roles()) {
                        continue;
                    }

                    let location = job
                        .get("locationsText")
                        .and_then(|l| l.as_str())
                        .unwrap_or("");
                    if !filters::is_us_location(location) {
                        continue;
                    }

                    // postedOn is usually "Posted Today" / "Posted 3 Days
                    // Ago"; the relative-date parser covers both.
                    let posted_on = job
                        .get("postedOn")
                        .and_then(|p| p.as_str())
                        .or_else(|| job.get("startDate").and_then(|s| s.as_str()))
                        .unwrap_or("");
                    if let Some(posted) = filters::parse_date(posted_on)
                        && posted < run.cutoff()
                    {
                        continue;
                    }

                    let ext_path = job
                        .get("externalPath")
                        .and_then(|e| e.as_str())
                        .map(String::from)
                        .or_else(|| {
                            job.get("bulletFields")
                                .and_then(|b| b.as_array())
                                .and_then(|b| b.first())
                                .and_then(|f| f.as_str())
                                .map(String::from)
                        })
                        .unwrap_or_default();
                    let apply_url = if ext_path.starts_with('/') {
                        format!("{}{ext_path}", self.base_url.trim_end_matches('/'))
                    } else {
                        format!("{}/{ext_path}", self.base_url.trim_end_matches('/'))
                    };

                    let description = job
                        .get("jobDescription")
                        .and_then(|d| d.as_str())
                        .unwrap_or("");

                    let mut record = JobRecord::new(Source::Workday, title, self.company);
                    record.location = location.to_string();
                    record.url = apply_url;
                    record.description = filters::truncate(description, 2000);
                    record.date = filters::standardize_date(posted_on);

                    if run.add(record).await {
                        page_added += 1;
                        added += 1;
                    }
                }

                let total = data.get("total").and_then(|t| t.as_u64()).unwrap_or(0) as usize;
                offset += PAGE_SIZE;
                if offset >= total.min(OFFSET_CAP) || page_added == 0 {
                    break;
                }
            }
        }

        if added > 0 {
            tracing::info!("Workday [{}]: +{added} jobs", self.company);
        }
        Ok(())
    }
}
