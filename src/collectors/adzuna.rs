use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::SourceAdapter;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// Adzuna US search, one adapter per query. Requires `ADZUNA_APP_ID` and
/// `ADZUNA_APP_KEY`; without them the adapter is a silent no-op.
pub struct Adzuna {
    pub query: &'static str,
}

#[async_trait]
impl SourceAdapter for Adzuna {
    fn name(&self) -> String {
        format!("adzuna:{}", self.query)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let app_id = std::env::var("ADZUNA_APP_ID").unwrap_or_default();
        let app_key = std::env::var("ADZUNA_APP_KEY").unwrap_or_default();
        if app_id.is_empty() || app_id.starts_with("YOUR") || app_key.is_empty() {
            return Ok(());
        }

        let resp = http
            .send(
                http.get("https://api.adzuna.com/v1/api/jobs/us/search/1")
                    .query(&[
                        ("app_id", app_id.as_str()),
                        ("app_key", app_key.as_str()),
                        ("max_days_old", "7"),
                        ("what", self.query),
                        ("results_per_page", "50"),
                    ]),
            )
            .await?;
        if !resp.status().is_success() {
            return Ok(());
        }
        let data: Value = resp.json().await?;
        let mut added = 0;

        for job in data
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default()
        {
            let location = job
                .get("location")
                .and_then(|l| l.get("display_name"))
                .and_then(|d| d.as_str())
                .unwrap_or("US");
            if !filters::is_us_location(location) {
                continue;
            }

            let title = job.get("title").and_then(|t| t.as_str()).unwrap_or("");
            if !filters::is_role_match(title, run.roles()) {
                continue;
            }

            let company = job
                .get("company")
                .and_then(|c| c.get("display_name"))
                .and_then(|d| d.as_str())
                .unwrap_or("Unknown");

            let salary = match (
                job.get("salary_min").and_then(|s| s.as_f64()),
                job.get("salary_max").and_then(|s| s.as_f64()),
            ) {
                (Some(min), Some(max)) => format!("${min:.0}-${max:.0}"),
                (Some(min), None) => format!("${min:.0}"),
                _ => String::new(),
            };

            let description = job
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("");

            let mut record = JobRecord::new(Source::Adzuna, title, company);
            record.location = location.to_string();
            record.url = job
                .get("redirect_url")
                .and_then(|u| u.as_str())
                .unwrap_or("")
                .to_string();
            record.description = filters::truncate(description, 2000);
            record.date = chrono::Utc::now().format("%Y-%m-%d").to_string();
            record.salary = salary;

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("Adzuna [{}]: +{added} jobs", self.query);
        }
        Ok(())
    }
}
