//! Source adapters. One module per ATS or feed; every adapter fetches,
//! paginates, filters, and pushes candidates through the run's `add`.

pub mod adzuna;
pub mod ashby;
pub mod bamboohr;
pub mod boards;
pub mod feeds_json;
pub mod feeds_markdown;
pub mod greenhouse;
pub mod jsearch;
pub mod lever;
pub mod linkedin_guest;
pub mod remoteok;
pub mod simplify_repos;
pub mod smartrecruiters;
pub mod workable;
pub mod workday;

use async_trait::async_trait;

use crate::discovery::Discovery;
use crate::error::AppError;
use crate::http::HttpClient;

/// Contract shared by all API adapters: consume the phase's HTTP client and
/// emit candidates via `run.add`. Errors are isolated by the orchestrator;
/// a failing adapter never takes the run down.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Label used in logs, e.g. "greenhouse:stripe".
    fn name(&self) -> String;

    async fn collect(&self, http: &HttpClient, run: &Discovery) -> Result<(), AppError>;
}

/// Everything that runs in the Phase 1 fan-out.
pub fn phase_one_adapters() -> Vec<Box<dyn SourceAdapter>> {
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();

    for board in boards::GREENHOUSE_BOARDS.iter().copied() {
        adapters.push(Box::new(greenhouse::Greenhouse::new(board)));
    }
    for board in boards::LEVER_BOARDS.iter().copied() {
        adapters.push(Box::new(lever::Lever { board }));
    }
    for slug in boards::ASHBY_BOARDS.iter().copied() {
        adapters.push(Box::new(ashby::Ashby { slug }));
    }
    for slug in boards::WORKABLE_BOARDS.iter().copied() {
        adapters.push(Box::new(workable::Workable { slug }));
    }
    for company in boards::SMARTRECRUITERS_BOARDS.iter().copied() {
        adapters.push(Box::new(smartrecruiters::SmartRecruiters { company }));
    }
    for domain in boards::BAMBOOHR_BOARDS.iter().copied() {
        adapters.push(Box::new(bamboohr::BambooHr { domain }));
    }

    adapters.push(Box::new(feeds_json::CuratedJsonFeeds));
    adapters.push(Box::new(simplify_repos::SimplifyRepos));
    adapters.push(Box::new(remoteok::RemoteOk));
    adapters.push(Box::new(jsearch::JSearch));

    for query in boards::ADZUNA_QUERIES.iter().copied() {
        adapters.push(Box::new(adzuna::Adzuna { query }));
    }
    for (url, label) in boards::MARKDOWN_FEEDS.iter().copied() {
        adapters.push(Box::new(feeds_markdown::MarkdownFeed { url, label }));
    }

    adapters.push(Box::new(linkedin_guest::LinkedInGuest));

    adapters
}

/// Phase 2 adapters: the first `limit` Workday companies, in list order.
/// Entries hosted on other ATSes are skipped inside the adapter.
pub fn workday_adapters(limit: usize) -> Vec<workday::Workday> {
    boards::WORKDAY_COMPANIES
        .iter()
        .take(limit)
        .copied()
        .map(|(name, url)| workday::Workday {
            company: name,
            base_url: url,
        })
        .collect()
}

/// "dbt-labs" -> "Dbt Labs". Used when a source exposes only its slug.
pub(crate) fn slug_to_company(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_titlecasing() {
        assert_eq!(slug_to_company("dbt-labs"), "Dbt Labs");
        assert_eq!(slug_to_company("weights_biases"), "Weights Biases");
        assert_eq!(slug_to_company("stripe"), "Stripe");
    }

    #[test]
    fn phase_one_covers_every_board() {
        let n = phase_one_adapters().len();
        let expected = boards::GREENHOUSE_BOARDS.len()
            + boards::LEVER_BOARDS.len()
            + boards::ASHBY_BOARDS.len()
            + boards::WORKABLE_BOARDS.len()
            + boards::SMARTRECRUITERS_BOARDS.len()
            + boards::BAMBOOHR_BOARDS.len()
            + boards::ADZUNA_QUERIES.len()
            + boards::MARKDOWN_FEEDS.len()
            + 5; // json feeds, simplify repos, remoteok, jsearch, linkedin guest
        assert_eq!(n, expected);
    }

    #[test]
    fn workday_limit_respected() {
        assert_eq!(workday_adapters(3).len(), 3);
        assert!(workday_adapters(100).len() <= boards::WORKDAY_COMPANIES.len());
    }
}
