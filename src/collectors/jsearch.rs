use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::SourceAdapter;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

const QUERIES: &[&str] = &[
    "software engineer new grad United States",
    "entry level backend engineer remote",
    "junior data engineer United States",
    "entry level ML engineer remote",
];

/// JSearch aggregator on RapidAPI. Gated on `RAPIDAPI_KEY`; a missing key
/// makes this a silent no-op.
pub struct JSearch;

#[async_trait]
impl SourceAdapter for JSearch {
    fn name(&self) -> String {
        "jsearch".to_string()
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let api_key = std::env::var("RAPIDAPI_KEY").unwrap_or_default();
        if api_key.is_empty() || api_key.starts_with("YOUR") {
            return Ok(());
        }

        let mut added = 0;
        for query in QUERIES.iter().copied() {
            let resp = match http
                .send(
                    http.get("https://jsearch.p.rapidapi.com/search")
                        .header("X-RapidAPI-Key", &api_key)
                        .header("X-RapidAPI-Host", "jsearch.p.rapidapi.com")
                        .query(&[
                            ("query", query),
                            ("page", "1"),
                            ("num_pages", "3"),
                            ("date_posted", "3days"),
                        ]),
                )
                .await
            {
                Ok(resp) if resp.status().is_success() => resp,
                _ => continue,
            };
            let data: Value = match resp.json().await {
                Ok(data) => data,
                Err(_) => continue,
            };

            for job in data
                .get("data")
                .and_then(|d| d.as_array())
                .cloned()
                .unwrap_or_default()
            {
                let country = job.get("job_country").and_then(|c| c.as_str()).unwrap_or("");
                let state = job.get("job_state").and_then(|s| s.as_str()).unwrap_or("");
                if !filters::is_us_location(&format!("{country}{state}")) {
                    continue;
                }

                let title = job.get("job_title").and_then(|t| t.as_str()).unwrap_or("");
                if !filters::is_role_match(title, run.roles()) {
                    continue;
                }

                let salary = match (
                    job.get("job_min_salary").and_then(|s| s.as_f64()),
                    job.get("job_max_salary").and_then(|s| s.as_f64()),
                ) {
                    (None, None) => String::new(),
                    (min, max) => format!(
                        "${:.0}-${:.0}",
                        min.unwrap_or(0.0),
                        max.unwrap_or(0.0)
                    ),
                };

                let city = job.get("job_city").and_then(|c| c.as_str()).unwrap_or("");
                let description = job
                    .get("job_description")
                    .and_then(|d| d.as_str())
                    .unwrap_or("");
                let posted = job
                    .get("job_posted_at_datetime_utc")
                    .and_then(|p| p.as_str())
                    .unwrap_or("");

                let mut record = JobRecord::new(
                    Source::JSearch,
                    title,
                    job.get("employer_name").and_then(|e| e.as_str()).unwrap_or(""),
                );
                record.location = format!("{city}, {state}");
                record.url = job
                    .get("job_apply_link")
                    .and_then(|u| u.as_str())
                    .unwrap_or("")
                    .to_string();
                record.description = filters::truncate(description, 2000);
                record.date = if posted.len() >= 10 {
                    posted[..10].to_string()
                } else {
                    String::new()
                };
                record.salary = salary;
                record.sponsorship = filters::extract_sponsorship(description).to_string();

                if run.add(record).await {
                    added += 1;
                }
            }
        }

        if added > 0 {
            tracing::info!("JSearch: +{added} jobs");
        }
        Ok(())
    }
}
