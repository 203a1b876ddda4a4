use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::collectors::{SourceAdapter, slug_to_company};
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

const PAGE_CAP: usize = 20;

/// Greenhouse public Job Board API.
/// `GET https://boards-api.greenhouse.io/v1/boards/{board}/jobs?content=true`
/// Paginates via the `Link: <url>; rel="next"` header. Freshness uses
/// `posted_at` (the real post date); `updated_at` also moves on edits to old
/// postings.
pub struct Greenhouse {
    pub board: &'static str,
    base_url: String,
}

impl Greenhouse {
    pub fn new(board: &'static str) -> Greenhouse {
        Greenhouse {
            board,
            base_url: "https://boards-api.greenhouse.io".to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base(board: &'static str, base_url: impl Into<String>) -> Greenhouse {
        Greenhouse {
            board,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct BoardResponse {
    #[serde(default)]
    company: Option<BoardCompany>,
    #[serde(default)]
    jobs: Vec<BoardJob>,
}

#[derive(Deserialize)]
struct BoardCompany {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct BoardJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    absolute_url: Option<String>,
    #[serde(default)]
    posted_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    location: Option<BoardLocation>,
    #[serde(default)]
    departments: Option<Vec<BoardDepartment>>,
    #[serde(default)]
    metadata: Option<Vec<BoardMetadata>>,
}

#[derive(Deserialize)]
struct BoardLocation {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct BoardDepartment {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct BoardMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

#[async_trait]
impl SourceAdapter for Greenhouse {
    fn name(&self) -> String {
        format!("greenhouse:{}", self.board)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let mut url = format!("{}/v1/boards/{}/jobs?content=true", self.base_url, self.board);
        let mut pages = 0;
        let mut added = 0;

        while pages < PAGE_CAP {
            pages += 1;
            let resp = http.send(http.get(&url)).await?;
            if !resp.status().is_success() {
                break;
            }

            let next = next_link(
                resp.headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or(""),
            );
            let data: BoardResponse = resp.json().await?;

            let board_company = data
                .company
                .and_then(|c| c.name)
                .unwrap_or_default();

            for job in data.jobs {
                let raw_posted = job
                    .posted_at
                    .as_deref()
                    .or(job.updated_at.as_deref())
                    .unwrap_or("");
                let posted: DateTime<Utc> = DateTime::parse_from_rfc3339(raw_posted)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());
                if posted < run.cutoff() {
                    continue;
                }

                if !filters::is_role_match(&job.title, run.roles()) {
                    continue;
                }

                let location = job
                    .location
                    .and_then(|l| l.name)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Remote".to_string());
                if !filters::is_us_location(&location) {
                    continue;
                }

                let description = filters::html_to_text(job.content.as_deref().unwrap_or(""));

                let company = job
                    .company_name
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| {
                        if board_company.is_empty() {
                            slug_to_company(self.board)
                        } else {
                            board_company.clone()
                        }
                    });

                let salary = job
                    .metadata
                    .unwrap_or_default()
                    .into_iter()
                    .find(|m| {
                        let name = m.name.as_deref().unwrap_or("").to_lowercase();
                        ["salary", "compensation", "pay"].iter().any(|w| name.contains(w))
                    })
                    .and_then(|m| m.value)
                    .map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .unwrap_or_default();

                let department = job
                    .departments
                    .unwrap_or_default()
                    .into_iter()
                    .next()
                    .and_then(|d| d.name)
                    .unwrap_or_default();

                let mut record = JobRecord::new(Source::Greenhouse, job.title, company);
                record.location = location;
                record.url = job.absolute_url.unwrap_or_default();
                record.description = filters::truncate(&description, 2000);
                record.date = posted.format("%Y-%m-%d").to_string();
                record.salary = salary;
                record.department = department;
                record.sponsorship = filters::extract_sponsorship(&description).to_string();

                if run.add(record).await {
                    added += 1;
                }
            }

            match next {
                Some(n) => url = n,
                None => break,
            }
        }

        if added > 0 {
            tracing::info!("Greenhouse [{}]: +{added} jobs ({pages} pages)", self.board);
        }
        Ok(())
    }
}

/// Extract the `rel="next"` target from a Link header.
fn next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let part = part.trim();
        if part.contains("rel=\"next\"") {
            let start = part.find('<')?;
            let end = part.find('>')?;
            return Some(part[start + 1..end].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::db::JobStore;
    use crate::profile::UserProfile;

    #[test]
    fn link_header_next_extraction() {
        let header = "<https://api.test/jobs?page=2>; rel=\"next\", <https://api.test/jobs?page=9>; rel=\"last\"";
        assert_eq!(next_link(header), Some("https://api.test/jobs?page=2".to_string()));
        assert_eq!(next_link("<https://api.test/jobs?page=9>; rel=\"last\""), None);
        assert_eq!(next_link(""), None);
    }

    fn board_job(title: &str, url: &str, posted: &str) -> serde_json::Value {
        json!({
            "title": title,
            "absolute_url": url,
            "posted_at": posted,
            "location": {"name": "New York, NY"},
            "content": "<p>Build things with us.</p>",
        })
    }

    async fn run_board(server: &MockServer, run: &Discovery) {
        let http = HttpClient::shared().unwrap();
        let adapter = Greenhouse::with_base("acme", server.uri());
        adapter.collect(&http, run).await.unwrap();
    }

    #[tokio::test]
    async fn board_run_filters_dedups_and_flushes() {
        let now = Utc::now().to_rfc3339();
        let stale = (Utc::now() - chrono::Duration::days(10)).to_rfc3339();

        let mut keeper = board_job("Software Engineer I", "https://acme.test/jobs/2", &now);
        keeper["metadata"] = json!([{"name": "Salary Range", "value": "$100k-$120k"}]);
        keeper["departments"] = json!([{"name": "Engineering"}]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/boards/acme/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "company": {"name": "Acme"},
                "jobs": [
                    board_job("Senior Software Engineer", "https://acme.test/jobs/1", &now),
                    keeper,
                    // Same posting surfaced again with a tracking param.
                    board_job("Software Engineer I", "https://acme.test/jobs/2?gh_src=dup", &now),
                    // Fresh enough title, stale date.
                    board_job("Data Analyst", "https://acme.test/jobs/3", &stale),
                ],
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        let run = Discovery::new(&UserProfile::default(), 24.0).with_store(store.clone());

        run_board(&server, &run).await;

        let jobs = run.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Software Engineer I");
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].url, "https://acme.test/jobs/2");
        assert_eq!(jobs[0].salary, "$100k-$120k");
        assert_eq!(jobs[0].department, "Engineering");

        // Incremental flush landed the record before the run finished.
        assert_eq!(store.pending_applications().await.unwrap().len(), 1);

        // Steady-state rerun inserts nothing new.
        let rerun = Discovery::new(&UserProfile::default(), 24.0).with_store(store.clone());
        run_board(&server, &rerun).await;
        assert_eq!(store.pending_applications().await.unwrap().len(), 1);
        assert_eq!(
            store.status_counts().await.unwrap(),
            vec![("NEW".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn same_job_on_two_boards_dedups_by_signature() {
        let now = Utc::now().to_rfc3339();
        let server = MockServer::start().await;
        for (board, url) in [("one", "https://one.test/j/1"), ("two", "https://two.test/j/9")] {
            Mock::given(method("GET"))
                .and(path(format!("/v1/boards/{board}/jobs")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "company": {"name": "Acme"},
                    "jobs": [board_job("SDE 1", url, &now)],
                })))
                .mount(&server)
                .await;
        }

        let run = Discovery::new(&UserProfile::default(), 24.0);
        let http = HttpClient::shared().unwrap();
        Greenhouse::with_base("one", server.uri())
            .collect(&http, &run)
            .await
            .unwrap();
        Greenhouse::with_base("two", server.uri())
            .collect(&http, &run)
            .await
            .unwrap();

        // Different URLs, identical company::title signature.
        assert_eq!(run.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn follows_link_header_pagination() {
        let now = Utc::now().to_rfc3339();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/boards/acme/jobs"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jobs": [board_job("Software Engineer II", "https://acme.test/jobs/20", &now)],
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/boards/acme/jobs"))
            .and(query_param("content", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Link",
                        format!(
                            "<{}/v1/boards/acme/jobs?page=2>; rel=\"next\"",
                            server.uri()
                        )
                        .as_str(),
                    )
                    .set_body_json(json!({
                        "jobs": [board_job("Software Engineer I", "https://acme.test/jobs/10", &now)],
                    })),
            )
            .mount(&server)
            .await;

        let run = Discovery::new(&UserProfile::default(), 24.0);
        run_board(&server, &run).await;
        assert_eq!(run.jobs().await.len(), 2);
    }
}
