use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

const PAGE_CAP: usize = 10;

/// Lever public postings API.
/// `GET https://api.lever.co/v0/postings/{board}?mode=json&limit=100`
/// The v0 endpoint returns a bare array (single page); the v1 shape wraps it
/// in `{data: [...], next: token}` which we follow until exhausted.
pub struct Lever {
    pub board: &'static str,
}

#[async_trait]
impl SourceAdapter for Lever {
    fn name(&self) -> String {
        format!("lever:{}", self.board)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let base = format!(
            "https://api.lever.co/v0/postings/{}?mode=json&limit=100",
            self.board
        );
        let mut offset: Option<String> = None;
        let mut pages = 0;
        let mut added = 0;

        while pages < PAGE_CAP {
            pages += 1;
            let url = match &offset {
                Some(token) => format!("{base}&offset={token}"),
                None => base.clone(),
            };

            let resp = http.send(http.get(&url)).await?;
            if !resp.status().is_success() {
                break;
            }
            let data: Value = resp.json().await?;

            let jobs: Vec<Value> = match &data {
                Value::Array(list) => {
                    offset = None; // v0 has no pagination
                    list.clone()
                }
                Value::Object(obj) => {
                    offset = obj.get("next").and_then(|n| n.as_str()).map(String::from);
                    obj.get("data")
                        .and_then(|d| d.as_array())
                        .cloned()
                        .unwrap_or_default()
                }
                _ => break,
            };
            if jobs.is_empty() {
                break;
            }

            for job in &jobs {
                // createdAt is Unix milliseconds.
                let created = job
                    .get("createdAt")
                    .and_then(|c| c.as_i64())
                    .and_then(filters::parse_epoch)
                    .unwrap_or_else(chrono::Utc::now);
                if created < run.cutoff() {
                    continue;
                }

                let cats = job.get("categories").cloned().unwrap_or(Value::Null);
                let location = cats
                    .get("location")
                    .and_then(|l| l.as_str())
                    .filter(|l| !l.is_empty())
                    .unwrap_or("Remote")
                    .to_string();
                if !filters::is_us_location(&location) {
                    continue;
                }

                let title = job.get("text").and_then(|t| t.as_str()).unwrap_or("");
                if !filters::is_role_match(title, run.roles()) {
                    continue;
                }

                let company = job
                    .get("company")
                    .and_then(|c| c.as_str())
                    .or_else(|| cats.get("team").and_then(|t| t.as_str()))
                    .map(String::from)
                    .unwrap_or_else(|| slug_to_company(self.board));

                let salary = job
                    .get("salaryRange")
                    .map(format_salary_range)
                    .unwrap_or_default();

                let description = match job.get("descriptionPlain").and_then(|d| d.as_str()) {
                    Some(plain) if !plain.is_empty() => plain.to_string(),
                    _ => filters::html_to_text(
                        job.get("description").and_then(|d| d.as_str()).unwrap_or(""),
                    ),
                };

                let mut record = JobRecord::new(Source::Lever, title, company);
                record.location = location;
                record.url = job
                    .get("hostedUrl")
                    .and_then(|u| u.as_str())
                    .unwrap_or("")
                    .to_string();
                record.description = filters::truncate(&description, 2000);
                record.date = created.format("%Y-%m-%d").to_string();
                record.salary = salary;
                record.department = cats
                    .get("department")
                    .and_then(|d| d.as_str())
                    .unwrap_or("")
                    .to_string();
                record.sponsorship = filters::extract_sponsorship(&description).to_string();

                if run.add(record).await {
                    added += 1;
                }
            }

            if offset.is_none() {
                break;
            }
        }

        if added > 0 {
            tracing::info!("Lever [{}]: +{added} jobs", self.board);
        }
        Ok(())
    }
}

/// "USD $120000-$150000" from a Lever salaryRange object.
fn format_salary_range(range: &Value) -> String {
    let min = range.get("min").and_then(|v| v.as_i64());
    let max = range.get("max").and_then(|v| v.as_i64());
    let currency = range
        .get("currency")
        .and_then(|c| c.as_str())
        .unwrap_or("USD");
    match (min, max) {
        (Some(min), Some(max)) => format!("{currency} ${min}-${max}"),
        (Some(one), None) | (None, Some(one)) => format!("{currency} ${one}"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn salary_range_formatting() {
        assert_eq!(
            format_salary_range(&json!({"min": 100000, "max": 130000, "currency": "USD"})),
            "USD $100000-$130000"
        );
        assert_eq!(format_salary_range(&json!({"min": 90000})), "USD $90000");
        assert_eq!(format_salary_range(&json!({})), "");
    }
}
