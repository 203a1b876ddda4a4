use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

const PAGE_LIMIT: usize = 100;
const OFFSET_CAP: usize = 500;

/// SmartRecruiters public postings API with offset pagination.
/// `GET https://api.smartrecruiters.com/v1/companies/{id}/postings?limit=100&offset=N`
/// Stops at `totalFound` or offset 500, whichever comes first.
pub struct SmartRecruiters {
    pub company: &'static str,
}

#[async_trait]
impl SourceAdapter for SmartRecruiters {
    fn name(&self) -> String {
        format!("smartrecruiters:{}", self.company)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let base = format!(
            "https://api.smartrecruiters.com/v1/companies/{}/postings",
            self.company
        );
        let mut offset = 0;
        let mut added = 0;

        loop {
            let url = format!("{base}?limit={PAGE_LIMIT}&offset={offset}");
            let resp = http.send(http.get(&url)).await?;
            if !resp.status().is_success() {
                break;
            }
            let data: Value = resp.json().await?;
            let jobs = data
                .get("content")
                .and_then(|c| c.as_array())
                .cloned()
                .unwrap_or_default();
            if jobs.is_empty() {
                break;
            }

            for job in &jobs {
                let title = job.get("name").and_then(|n| n.as_str()).unwrap_or("");
                if !filters::is_role_match(title, run.roles()) {
                    continue;
                }

                let loc_obj = job.get("location").cloned().unwrap_or(Value::Null);
                let city = loc_obj.get("city").and_then(|v| v.as_str()).unwrap_or("");
                let region = loc_obj.get("region").and_then(|v| v.as_str()).unwrap_or("");
                let country = loc_obj.get("country").and_then(|v| v.as_str()).unwrap_or("");
                let remote = loc_obj
                    .get("remote")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                let location = if remote {
                    "Remote".to_string()
                } else if !city.is_empty() {
                    format!("{city}, {region}")
                } else {
                    country.to_string()
                };
                if !filters::is_us_location(&format!("{location} {country}")) {
                    continue;
                }

                let released = job
                    .get("releasedDate")
                    .and_then(|d| d.as_str())
                    .unwrap_or("");
                if let Some(posted) = filters::parse_date(released)
                    && posted < run.cutoff()
                {
                    continue;
                }

                let job_id = job.get("id").and_then(|i| i.as_str()).unwrap_or("");
                let apply_url =
                    format!("https://jobs.smartrecruiters.com/{}/{job_id}", self.company);

                // The postings list usually carries jobDescription.text only
                // for a subset of companies; take it when present.
                let description = job
                    .get("jobDescription")
                    .and_then(|jd| jd.get("text"))
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();

                let company = job
                    .get("company")
                    .and_then(|c| c.get("name"))
                    .and_then(|n| n.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| slug_to_company(self.company));

                let department = job
                    .get("department")
                    .and_then(|d| d.get("label"))
                    .and_then(|l| l.as_str())
                    .unwrap_or("");

                let mut record = JobRecord::new(Source::SmartRecruiters, title, company);
                record.location = location.trim_matches([' ', ',']).to_string();
                record.url = apply_url;
                record.description = filters::truncate(&description, 2000);
                record.date = if released.len() >= 10 {
                    released[..10].to_string()
                } else {
                    String::new()
                };
                record.department = department.to_string();
                record.sponsorship = filters::extract_sponsorship(&description).to_string();

                if run.add(record).await {
                    added += 1;
                }
            }

            let total_found = data
                .get("totalFound")
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize;
            offset += PAGE_LIMIT;
            if offset >= total_found || offset >= OFFSET_CAP {
                break;
            }
        }

        if added > 0 {
            tracing::info!("SmartRecruiters [{}]: +{added} jobs", self.company);
        }
        Ok(())
    }
}
