use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::SourceAdapter;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// RemoteOK public API. The response is a JSON array whose first element is
/// legal/metadata boilerplate, skipped.
pub struct RemoteOk;

#[async_trait]
impl SourceAdapter for RemoteOk {
    fn name(&self) -> String {
        "remoteok".to_string()
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let resp = http.send(http.get("https://remoteok.com/api")).await?;
        if !resp.status().is_success() {
            return Ok(());
        }
        let data: Vec<Value> = resp.json().await?;
        let mut added = 0;

        for job in data.iter().skip(1) {
            let date = job.get("date").and_then(|d| d.as_str()).unwrap_or("");
            if let Some(posted) = filters::parse_date(date)
                && posted < run.cutoff()
            {
                continue;
            }

            let title = job.get("position").and_then(|p| p.as_str()).unwrap_or("");
            if !filters::is_role_match(title, run.roles()) {
                continue;
            }

            let location = job
                .get("location")
                .and_then(|l| l.as_str())
                .filter(|l| !l.is_empty())
                .unwrap_or("Remote");
            if !filters::is_us_location(location) {
                continue;
            }

            let description =
                filters::html_to_text(job.get("description").and_then(|d| d.as_str()).unwrap_or(""));

            let mut record = JobRecord::new(
                Source::RemoteOk,
                title,
                job.get("company").and_then(|c| c.as_str()).unwrap_or("Unknown"),
            );
            record.location = location.to_string();
            record.url = job.get("url").and_then(|u| u.as_str()).unwrap_or("").to_string();
            record.description = filters::truncate(&description, 2000);
            record.date = if date.len() >= 10 {
                date[..10].to_string()
            } else {
                String::new()
            };
            record.salary = job
                .get("salary")
                .and_then(|s| s.as_str())
                .unwrap_or("")
                .to_string();
            record.sponsorship = filters::extract_sponsorship(&description).to_string();

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("RemoteOK: +{added} jobs");
        }
        Ok(())
    }
}
