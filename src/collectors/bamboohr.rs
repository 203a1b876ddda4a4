use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// BambooHR careers endpoint, single page.
/// `GET https://{domain}.bamboohr.com/careers/list` with an explicit JSON
/// Accept header (the endpoint serves HTML otherwise).
pub struct BambooHr {
    pub domain: &'static str,
}

#[async_trait]
impl SourceAdapter for BambooHr {
    fn name(&self) -> String {
        format!("bamboohr:{}", self.domain)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let url = format!("https://{}.bamboohr.com/careers/list", self.domain);
        let resp = http
            .send(http.get(&url).header("Accept", "application/json"))
            .await?;
        if !resp.status().is_success() {
            return Ok(());
        }
        let data: Value = resp.json().await?;
        let jobs = data
            .get("result")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        let mut added = 0;

        for job in &jobs {
            let title = job
                .get("jobOpeningName")
                .and_then(|t| t.as_str())
                .unwrap_or("");
            if !filters::is_role_match(title, run.roles()) {
                continue;
            }

            let location = location_text(job.get("location"));
            if !filters::is_us_location(&location) {
                continue;
            }

            let raw_date = job
                .get("datePosted")
                .and_then(|d| d.as_str())
                .or_else(|| job.get("createdDate").and_then(|d| d.as_str()))
                .unwrap_or("");
            if let Some(posted) = filters::parse_date(raw_date)
                && posted < run.cutoff()
            {
                continue;
            }

            let job_id = job
                .get("id")
                .and_then(|i| i.as_str())
                .or_else(|| job.get("jobId").and_then(|i| i.as_str()))
                .unwrap_or("");
            let apply_url = if job_id.is_empty() {
                String::new()
            } else {
                format!("https://{}.bamboohr.com/careers/{job_id}", self.domain)
            };

            let description = job
                .get("summary")
                .and_then(|s| s.as_str())
                .or_else(|| job.get("description").and_then(|d| d.as_str()))
                .unwrap_or("");

            let company = job
                .get("companyName")
                .and_then(|c| c.as_str())
                .map(String::from)
                .unwrap_or_else(|| slug_to_company(self.domain));

            let department = job
                .get("department")
                .and_then(|d| d.as_str())
                .or_else(|| job.get("division").and_then(|d| d.as_str()))
                .unwrap_or("");

            let mut record = JobRecord::new(Source::BambooHr, title, company);
            record.location = location;
            record.url = apply_url;
            record.description = filters::truncate(description, 2000);
            record.date = if raw_date.len() >= 10 {
                raw_date[..10].to_string()
            } else {
                chrono::Utc::now().format("%Y-%m-%d").to_string()
            };
            record.department = department.to_string();
            record.sponsorship = filters::extract_sponsorship(description).to_string();

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("BambooHR [{}]: +{added} jobs", self.domain);
        }
        Ok(())
    }
}

/// The list endpoint returns location as either a plain string or an object
/// with city/state fields, depending on tenant configuration.
fn location_text(loc: Option<&Value>) -> String {
    match loc {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => {
            let city = obj.get("city").and_then(|c| c.as_str()).unwrap_or("");
            let state = obj.get("state").and_then(|s| s.as_str()).unwrap_or("");
            format!("{city} {state}").trim().to_string()
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_accepts_both_shapes() {
        assert_eq!(location_text(Some(&json!("Remote"))), "Remote");
        assert_eq!(
            location_text(Some(&json!({"city": "Provo", "state": "UT"}))),
            "Provo UT"
        );
        assert_eq!(location_text(None), "");
    }
}
