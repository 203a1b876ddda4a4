use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// Ashby public job board API. No auth, no pagination: one call returns the
/// whole board, compensation included.
/// `GET https://api.ashbyhq.com/posting-api/job-board/{slug}?includeCompensation=true`
pub struct Ashby {
    pub slug: &'static str,
}

#[derive(Deserialize)]
struct BoardResponse {
    #[serde(default)]
    jobs: Vec<AshbyJob>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AshbyJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    secondary_locations: Vec<SecondaryLocation>,
    #[serde(default)]
    compensation: Option<Compensation>,
    #[serde(default)]
    description_plain: Option<String>,
    #[serde(default)]
    description_html: Option<String>,
    #[serde(default)]
    job_url: Option<String>,
    #[serde(default)]
    apply_url: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecondaryLocation {
    #[serde(default)]
    location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Compensation {
    #[serde(default)]
    compensation_tier_summary: Option<String>,
    #[serde(default)]
    scrapeable_compensation_salary_summary: Option<String>,
}

#[async_trait]
impl SourceAdapter for Ashby {
    fn name(&self) -> String {
        format!("ashby:{}", self.slug)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let url = format!(
            "https://api.ashbyhq.com/posting-api/job-board/{}?includeCompensation=true",
            self.slug
        );
        let resp = http.send(http.get(&url)).await?;
        if !resp.status().is_success() {
            // Many slugs simply don't exist on Ashby; nothing to report.
            return Ok(());
        }
        let data: BoardResponse = resp.json().await?;
        let mut added = 0;

        for job in data.jobs {
            let published = job.published_at.as_deref().unwrap_or("");
            if let Ok(published_at) = DateTime::parse_from_rfc3339(published)
                && published_at.with_timezone(&Utc) < run.cutoff()
            {
                continue;
            }

            if !filters::is_role_match(&job.title, run.roles()) {
                continue;
            }

            let mut location = job.location.unwrap_or_default();
            let secondary: Vec<String> = job
                .secondary_locations
                .into_iter()
                .filter_map(|s| s.location)
                .filter(|l| !l.is_empty())
                .collect();
            if !secondary.is_empty() {
                location = format!("{} | {}", location, secondary.join(" | "));
            }
            if !filters::is_us_location(&location) {
                continue;
            }

            let salary = job
                .compensation
                .and_then(|c| {
                    c.compensation_tier_summary
                        .filter(|s| !s.is_empty())
                        .or(c.scrapeable_compensation_salary_summary)
                })
                .unwrap_or_default();

            let description = match job.description_plain {
                Some(plain) if !plain.is_empty() => plain,
                _ => filters::html_to_text(job.description_html.as_deref().unwrap_or("")),
            };

            let mut record =
                JobRecord::new(Source::Ashby, job.title, slug_to_company(self.slug));
            record.location = if location.is_empty() {
                "Remote".to_string()
            } else {
                location
            };
            record.url = job.job_url.or(job.apply_url).unwrap_or_default();
            record.description = filters::truncate(&description, 2000);
            record.date = if published.len() >= 10 {
                published[..10].to_string()
            } else {
                Utc::now().format("%Y-%m-%d").to_string()
            };
            record.salary = salary;
            record.department = job.department.unwrap_or_default();
            record.sponsorship = filters::extract_sponsorship(&description).to_string();

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("Ashby [{}]: +{added} jobs", self.slug);
        }
        Ok(())
    }
}
