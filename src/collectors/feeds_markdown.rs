use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::collectors::SourceAdapter;
use crate::discovery::Discovery;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source};

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=['"]?([^'" >]+)"#).unwrap());
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\((https?://[^)]+)\)").unwrap());
static DATE_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|\d+\s*[dh]\b|today|new")
        .unwrap()
});

/// Markers on a row meaning the posting is closed or filled.
const CLOSED_MARKERS: &[&str] = &["\u{1F512}", ":lock:", "[closed]", "filled"];

/// Community-curated markdown lists parsed row by row: company / title /
/// location come from the text columns between the first and last pipe, the
/// URL from the first link in any cell, the date from whichever cell looks
/// like one. Rows without a parseable date are skipped outright, and the
/// freshness window is at least 2 days (the repos update daily).
pub struct MarkdownFeed {
    pub url: &'static str,
    pub label: &'static str,
}

#[async_trait]
impl SourceAdapter for MarkdownFeed {
    fn name(&self) -> String {
        format!("github-md:{}", self.label)
    }

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError> {
        let resp = http.send(http.get(self.url)).await?;
        if !resp.status().is_success() {
            return Ok(());
        }
        let text = resp.text().await?;
        let cutoff = filters::github_cutoff(run.cutoff(), 2);
        let mut added = 0;

        for line in text.lines() {
            let Some(row) = parse_row(line) else {
                continue;
            };

            let Some(posted) = filters::parse_date(&row.date) else {
                continue; // could be a stale 2023/2024 entry
            };
            if posted < cutoff {
                continue;
            }

            if !row.location.is_empty() && !filters::is_us_location(&row.location) {
                continue;
            }

            let mut record = JobRecord::new(Source::GithubLists, row.title.clone(), row.company.clone());
            record.location = if row.location.is_empty() {
                "US".to_string()
            } else {
                row.location.clone()
            };
            record.url = row.url.clone();
            record.description = format!(
                "Source: {} | Company: {} | Role: {} | Location: {} | Posted: {}",
                self.label, row.company, row.title, row.location, row.date
            );
            record.date = row.date.clone();
            record.sponsorship = filters::extract_sponsorship(line).to_string();

            if run.add(record).await {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("GitHub [{}]: +{added} jobs", self.label);
        }
        Ok(())
    }
}

pub(super) struct MarkdownRow {
    pub company: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub date: String,
}

/// One pipe-delimited table row to a structured entry. Returns `None` for
/// non-table lines, rows without a link or date cell, and closed postings.
pub(super) fn parse_row(line: &str) -> Option<MarkdownRow> {
    if CLOSED_MARKERS.iter().any(|m| line.contains(m)) {
        return None;
    }

    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let url = parts.iter().find_map(|p| {
        HREF_RE
            .captures(p)
            .or_else(|| MD_LINK_RE.captures(p))
            .map(|c| c[1].to_string())
    })?;

    let date = parts
        .iter()
        .rev()
        .find(|p| DATE_CELL_RE.is_match(p))
        .map(|p| p.to_string())?;

    // Text columns between the first and last pipe, tags stripped.
    let mut text_cols: Vec<String> = Vec::new();
    for part in &parts[1..parts.len() - 1] {
        let text = filters::html_to_text(part)
            .replace("**", "")
            .replace("__", "");
        let text = text.trim().to_string();
        if text.len() > 1 && !text.to_lowercase().contains("http") {
            text_cols.push(text);
        }
    }
    if text_cols.is_empty() {
        return None;
    }

    let company = text_cols.first().cloned().unwrap_or_else(|| "Unknown".to_string());
    let mut title = text_cols
        .get(1)
        .cloned()
        .unwrap_or_else(|| "Software Engineer".to_string());
    if title.chars().count() < 3 {
        title = "Software Engineer (New Grad)".to_string();
    }
    let location = text_cols.get(2).cloned().unwrap_or_default();

    Some(MarkdownRow {
        company,
        title,
        location,
        url,
        date,
    })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::profile::UserProfile;

    #[tokio::test]
    async fn stale_rows_fall_outside_the_two_day_window() {
        let body = "\
| Company | Role | Location | Link | Age |\n\
|---|---|---|---|---|\n\
| Acme | Software Engineer I | NYC, NY | [Apply](https://acme.test/j/1) | 2d |\n\
| Beta | Software Engineer II | Remote | [Apply](https://beta.test/j/2) | 45d |\n\
| Gamma | Software Engineer III | Remote | [Apply](https://gamma.test/j/3) | ongoing |\n";

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        // hours_back=24, but the GitHub minimum widens the window to 2 days;
        // 45d is stale either way, and the undated row is dropped outright.
        let run = crate::discovery::Discovery::new(&UserProfile::default(), 24.0);
        let adapter = MarkdownFeed {
            url: Box::leak(server.uri().into_boxed_str()),
            label: "test-feed",
        };
        adapter
            .collect(&HttpClient::shared().unwrap(), &run)
            .await
            .unwrap();

        let jobs = run.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].url, "https://acme.test/j/1");
    }

    #[test]
    fn parses_markdown_link_rows() {
        let line = "| **Acme Corp** | Software Engineer I | NYC, NY | [Apply](https://acme.test/jobs/1) | 2d |";
        let row = parse_row(line).unwrap();
        assert_eq!(row.company, "Acme Corp");
        assert_eq!(row.title, "Software Engineer I");
        assert_eq!(row.location, "NYC, NY");
        assert_eq!(row.url, "https://acme.test/jobs/1");
        assert_eq!(row.date, "2d");
    }

    #[test]
    fn parses_html_anchor_rows() {
        let line = r#"| Beta | SWE New Grad | Remote | <a href="https://beta.test/j/9">link</a> | Jul 28 |"#;
        let row = parse_row(line).unwrap();
        assert_eq!(row.url, "https://beta.test/j/9");
        assert_eq!(row.date, "Jul 28");
    }

    #[test]
    fn rejects_closed_undated_and_linkless_rows() {
        assert!(parse_row("| Acme | SWE | NYC | [Apply](https://a.test) | \u{1F512} 2d |").is_none());
        assert!(parse_row("| Acme | SWE [closed] | NYC | [Apply](https://a.test) | 2d |").is_none());
        // No date cell anywhere.
        assert!(parse_row("| Acme | Platform Role | NYC | [Apply](https://a.test) | - |").is_none());
        // No link.
        assert!(parse_row("| Acme | SWE | NYC | apply by email | 2d |").is_none());
        // Not a table row.
        assert!(parse_row("## Heading").is_none());
    }

    #[test]
    fn short_titles_get_a_default() {
        let line = "| Acme | ?? | NYC | [Apply](https://a.test/1) | 1d |";
        let row = parse_row(line).unwrap();
        assert_eq!(row.title, "Software Engineer (New Grad)");
    }
}
