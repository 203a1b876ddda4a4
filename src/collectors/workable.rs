use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

/// Workable widget API, single page.
/// `GET https://apply.workable.com/api/v1/widget/accounts/{slug}/jobs`
/// The apply URL is reconstructed from the posting shortcode.
pub struct Workable {
    pub slug: &'static str,
}

#[async_trait]
impl SourceAdapter for Workable {
    fn name(&self) -> String {
        format!("workable:{}", self.slug)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let url = format!(
            "https://apply.workable.com/api/v1/widget/accounts/{}/jobs",
            self.slug
        );
        let resp = http.send(http.get(&url)).await?;
        if !resp.status().is_success() {
            return Ok(());
        }
        let data: Value = resp.json().await?;
        let jobs = data
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        let mut added = 0;

        for job in &jobs {
            let title = job.get("title").and_then(|t| t.as_str()).unwrap_or("");
            if !filters::is_role_match(title, run.roles()) {
                continue;
            }

            let loc_obj = job.get("location").cloned().unwrap_or(Value::Null);
            let city = loc_obj.get("city").and_then(|c| c.as_str()).unwrap_or("");
            let country = loc_obj.get("country").and_then(|c| c.as_str()).unwrap_or("");
            let location = format!("{city}, {country}")
                .trim_matches([' ', ','])
                .to_string();
            if !filters::is_us_location(&location) {
                continue;
            }

            // published_on is a bare "YYYY-MM-DD".
            let published = job
                .get("published_on")
                .and_then(|p| p.as_str())
                .unwrap_or("");
            if let Some(published_at) = filters::parse_date(published)
                && published_at < run.cutoff()
            {
                continue;
            }

            let shortcode = job.get("shortcode").and_then(|s| s.as_str()).unwrap_or("");
            let apply_url = if shortcode.is_empty() {
                String::new()
            } else {
                format!("https://apply.workable.com/{}/j/{shortcode}/", self.slug)
            };

            let description = job
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("");

            let mut record =
                JobRecord::new(Source::Workable, title, slug_to_company(self.slug));
            record.location = location;
            record.url = apply_url;
            record.description = filters::truncate(description, 2000);
            record.date = if published.len() >= 10 {
                published[..10].to_string()
            } else {
                String::new()
            };
            record.sponsorship = filters::extract_sponsorship(description).to_string();

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("Workable [{}]: +{added} jobs", self.slug);
        }
        Ok(())
    }
}
