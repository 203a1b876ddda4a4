use serde::{Deserialize, Serialize};

/// Fixed set of adapter names. The string form is what lands in the
/// `jobs.source` column and the per-source stats breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    Greenhouse,
    Lever,
    Ashby,
    Workable,
    SmartRecruiters,
    BambooHr,
    Workday,
    Adzuna,
    RemoteOk,
    JSearch,
    SimplifyFeeds,
    GithubLists,
    LinkedIn,
    JobrightAi,
    Simplify,
}

impl Source {
    #[allow(dead_code)]
    pub const ALL: [Source; 15] = [
        Source::Greenhouse,
        Source::Lever,
        Source::Ashby,
        Source::Workable,
        Source::SmartRecruiters,
        Source::BambooHr,
        Source::Workday,
        Source::Adzuna,
        Source::RemoteOk,
        Source::JSearch,
        Source::SimplifyFeeds,
        Source::GithubLists,
        Source::LinkedIn,
        Source::JobrightAi,
        Source::Simplify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Greenhouse => "Greenhouse",
            Source::Lever => "Lever",
            Source::Ashby => "Ashby",
            Source::Workable => "Workable",
            Source::SmartRecruiters => "SmartRecruiters",
            Source::BambooHr => "BambooHR",
            Source::Workday => "Workday",
            Source::Adzuna => "Adzuna",
            Source::RemoteOk => "RemoteOK",
            Source::JSearch => "JSearch",
            Source::SimplifyFeeds => "SimplifyJobs",
            Source::GithubLists => "GitHub Lists",
            Source::LinkedIn => "LinkedIn",
            Source::JobrightAi => "JobRight AI",
            Source::Simplify => "Simplify",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical record emitted by every adapter. Optional values are empty
/// strings rather than `None`, matching the store's `DEFAULT ''` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub source: Source,
    pub url: String,
    pub description: String,
    pub date: String,
    pub salary: String,
    pub sponsorship: String,
    pub department: String,
    pub hiring_manager: String,
    pub last_updated: String,
}

impl JobRecord {
    /// Minimal constructor used by adapters; optional fields default empty
    /// and are finalized at admission.
    pub fn new(source: Source, title: impl Into<String>, company: impl Into<String>) -> JobRecord {
        JobRecord {
            title: title.into(),
            company: company.into(),
            location: String::new(),
            source,
            url: String::new(),
            description: String::new(),
            date: String::new(),
            salary: String::new(),
            sponsorship: String::new(),
            department: String::new(),
            hiring_manager: String::new(),
            last_updated: String::new(),
        }
    }

    /// `lower(company) + "::" + lower(title)` -- the secondary dedup key.
    pub fn signature(&self) -> String {
        format!(
            "{}::{}",
            self.company.trim().to_lowercase(),
            self.title.to_lowercase()
        )
    }
}

/// Strip the query string and trailing slash so the same posting reached via
/// different tracking parameters dedups to one URL.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_query = trimmed.split('?').next().unwrap_or(trimmed);
    without_query.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalization_strips_query_and_slash() {
        assert_eq!(
            normalize_url("https://example.com/jobs/123/?utm=tracker"),
            "https://example.com/jobs/123"
        );
        assert_eq!(normalize_url("  https://example.com/a  "), "https://example.com/a");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn signature_is_case_insensitive() {
        let a = JobRecord::new(Source::Greenhouse, "SDE 1", "Acme ");
        let b = JobRecord::new(Source::Lever, "sde 1", "ACME");
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn source_names_are_distinct() {
        let names: std::collections::HashSet<&str> =
            Source::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names.len(), Source::ALL.len());
    }
}
