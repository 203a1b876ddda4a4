//! The discovery run: per-run dedup state, the `add` admission choke point,
//! and the three-phase orchestrator that fans the adapters out.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::browser;
use crate::collectors;
use crate::collectors::SourceAdapter;
use crate::db::JobStore;
use crate::error::AppError;
use crate::filters;
use crate::http::HttpClient;
use crate::models::job::{JobRecord, Source, normalize_url};
use crate::profile::UserProfile;

/// Phase 1 in-flight adapter cap.
const API_CONCURRENCY: usize = 50;

/// Workday companies run in Phase 2.
const WORKDAY_LIMIT: usize = 15;

#[derive(Default)]
struct RunState {
    seen_urls: HashSet<String>,
    seen_signatures: HashSet<String>,
    jobs: Vec<JobRecord>,
    stats: BTreeMap<Source, usize>,
}

/// One discovery run. All mutable state lives here, created fresh per run;
/// adapters share it through `add`, which serializes the dedup sets, the
/// record list, and the incremental sink write behind one async mutex.
pub struct Discovery {
    roles: Vec<String>,
    hours_back: f64,
    cutoff: DateTime<Utc>,
    store: Option<JobStore>,
    browser_profile: PathBuf,
    with_jobright: bool,
    state: Mutex<RunState>,
}

impl Discovery {
    /// `hours_back` below 1 is clamped to 1.
    pub fn new(profile: &UserProfile, hours_back: f64) -> Discovery {
        let hours_back = hours_back.max(1.0);
        let cutoff = Utc::now() - chrono::Duration::seconds((hours_back * 3600.0) as i64);
        Discovery {
            roles: profile.role_tokens(),
            hours_back,
            cutoff,
            store: None,
            browser_profile: PathBuf::from("browser_profile"),
            with_jobright: false,
            state: Mutex::new(RunState::default()),
        }
    }

    /// Attach the incremental flush sink. Long-running adapters need this so
    /// partial progress survives an interrupted run.
    pub fn with_store(mut self, store: JobStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_browser_profile(mut self, dir: impl Into<PathBuf>) -> Self {
        self.browser_profile = dir.into();
        self
    }

    pub fn with_jobright(mut self, enabled: bool) -> Self {
        self.with_jobright = enabled;
        self
    }

    /// Lowercased role tokens from the user profile.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The run's freshness boundary: `now − hours_back` at construction.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn hours_back(&self) -> f64 {
        self.hours_back
    }

    pub fn browser_profile(&self) -> &Path {
        &self.browser_profile
    }

    /// Admit one candidate record. This is the single path every adapter
    /// pushes through. Check order is fixed:
    ///
    /// 1. title sanity + seniority rejection (before any dedup accounting,
    ///    so a blocked record never claims a URL another adapter might
    ///    legitimately surface);
    /// 2. URL dedup on the normalized URL;
    /// 3. signature dedup on `company::title`;
    /// 4. defaults + `last_updated` stamp;
    /// 5. append + per-source counter;
    /// 6. immediate sink flush when a store is attached.
    ///
    /// Returns whether the record was admitted.
    pub async fn add(&self, mut job: JobRecord) -> bool {
        if job.title.trim().chars().count() < 3 {
            return false;
        }
        if filters::is_seniority_blocked(&job.title) {
            return false;
        }

        job.date = filters::standardize_date(&job.date);
        job.url = normalize_url(&job.url);

        let mut state = self.state.lock().await;

        if !job.url.is_empty() {
            if state.seen_urls.contains(&job.url) {
                return false;
            }
            state.seen_urls.insert(job.url.clone());
        }

        let signature = job.signature();
        if state.seen_signatures.contains(&signature) {
            return false;
        }
        state.seen_signatures.insert(signature);

        if job.company.trim().is_empty() {
            job.company = "Unknown".to_string();
        }
        job.last_updated = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        *state.stats.entry(job.source).or_insert(0) += 1;

        if let Some(store) = &self.store
            && let Err(e) = store.insert_raw_job(&job).await
        {
            tracing::warn!("[{}] sink write failed: {e}", job.source);
        }

        state.jobs.push(job);
        true
    }

    /// Snapshot of the accepted records so far.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.state.lock().await.jobs.clone()
    }

    /// Per-source admission counts.
    pub async fn stats(&self) -> Vec<(Source, usize)> {
        let state = self.state.lock().await;
        let mut stats: Vec<_> = state.stats.iter().map(|(s, n)| (*s, *n)).collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }

    /// Execute the full three-phase run. Individual adapter failures are
    /// logged and isolated; the run itself only fails on setup errors.
    pub async fn run(&self) -> Result<(), AppError> {
        tracing::info!(
            "Discovery run starting: lookback {}h, {} profile roles",
            self.hours_back,
            self.roles.len()
        );

        // Phase 1: every API adapter against one shared pool, bounded fan-out.
        let http = HttpClient::shared()?;
        let adapters = collectors::phase_one_adapters();
        tracing::info!("Phase 1: launching {} API adapters", adapters.len());
        let http_ref = &http;
        futures::stream::iter(adapters)
            .for_each_concurrent(API_CONCURRENCY, |adapter| async move {
                if let Err(e) = adapter.collect(http_ref, self).await {
                    tracing::warn!("[{}] failed: {e}", adapter.name());
                }
            })
            .await;

        // Phase 2: Workday boards share rate-limit infrastructure; run them
        // one at a time, each on its own short-timeout session.
        tracing::info!("Phase 2: Workday (sequential)");
        for adapter in collectors::workday_adapters(WORKDAY_LIMIT) {
            match HttpClient::with_timeout(Duration::from_secs(15)) {
                Ok(session) => {
                    if let Err(e) = adapter.collect(&session, self).await {
                        tracing::warn!("[{}] failed: {e}", adapter.name());
                    }
                }
                Err(e) => tracing::warn!("[{}] session setup failed: {e}", adapter.name()),
            }
        }

        // Phase 3: browser adapters share one profile directory, so they
        // must not overlap. Jobright is opt-in.
        tracing::info!("Phase 3: browser adapters (sequential)");
        if self.with_jobright {
            if let Err(e) = browser::jobright::run(self).await {
                tracing::warn!("[JobRight AI] failed: {e}");
            }
        }
        if let Err(e) = browser::simplify::run(self).await {
            tracing::warn!("[Simplify] failed: {e}");
        }
        if let Err(e) = browser::linkedin::run(self).await {
            tracing::warn!("[LinkedIn] failed: {e}");
        }

        let stats = self.stats().await;
        let total: usize = stats.iter().map(|(_, n)| n).sum();
        tracing::info!("Discovery complete: {total} unique jobs");
        for (source, count) in stats {
            tracing::info!("  {source:.<30} {count}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(hours: f64) -> Discovery {
        Discovery::new(&UserProfile::default(), hours)
    }

    fn job(source: Source, title: &str, company: &str, url: &str) -> JobRecord {
        let mut j = JobRecord::new(source, title, company);
        j.url = url.to_string();
        j
    }

    #[tokio::test]
    async fn seniority_rejected_before_url_accounting() {
        let run = run_with(24.0);

        // A senior posting must not claim the URL...
        assert!(
            !run.add(job(
                Source::Greenhouse,
                "Senior Software Engineer",
                "Acme",
                "https://acme.test/jobs/1"
            ))
            .await
        );

        // ...so a sibling adapter surfacing the same URL acceptably wins.
        assert!(
            run.add(job(
                Source::Lever,
                "Software Engineer I",
                "Acme",
                "https://acme.test/jobs/1"
            ))
            .await
        );
        assert_eq!(run.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn url_dedup_ignores_title_and_company() {
        let run = run_with(24.0);
        assert!(
            run.add(job(Source::Greenhouse, "Software Engineer I", "Acme", "https://a.test/1"))
                .await
        );
        // Same URL, different company/title: URL is the primary key.
        assert!(
            !run.add(job(Source::Lever, "Platform Engineer", "Other Co", "https://a.test/1?ref=x"))
                .await
        );
    }

    #[tokio::test]
    async fn signature_dedup_across_sources() {
        let run = run_with(24.0);
        assert!(run.add(job(Source::Greenhouse, "SDE 1", "Acme", "https://a.test/1")).await);
        // Different URL, same company::title signature.
        assert!(!run.add(job(Source::Lever, "SDE 1", "acme", "https://b.test/2")).await);
        assert_eq!(run.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn double_add_inserts_once() {
        let run = run_with(24.0);
        let j = job(Source::RemoteOk, "Software Engineer", "Acme", "https://a.test/1");
        assert!(run.add(j.clone()).await);
        assert!(!run.add(j).await);
        assert_eq!(run.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn short_titles_rejected_three_chars_pass() {
        let run = run_with(24.0);
        assert!(!run.add(job(Source::LinkedIn, "QA", "Acme", "https://a.test/1")).await);
        assert!(run.add(job(Source::LinkedIn, "SDE", "Acme", "https://a.test/2")).await);
    }

    #[tokio::test]
    async fn defaults_applied_on_admission() {
        let run = run_with(24.0);
        let mut j = job(Source::GithubLists, "Software Engineer", "", "https://a.test/1");
        j.date = "2d".to_string();
        assert!(run.add(j).await);

        let jobs = run.jobs().await;
        assert_eq!(jobs[0].company, "Unknown");
        assert!(!jobs[0].last_updated.is_empty());
        // Date got standardized to "Mon DD" form.
        assert!(filters::parse_date(&jobs[0].date).is_some());
    }

    #[tokio::test]
    async fn urlless_records_dedup_by_signature_only() {
        let run = run_with(24.0);
        assert!(run.add(job(Source::GithubLists, "Software Engineer", "A", "")).await);
        assert!(run.add(job(Source::GithubLists, "Software Engineer", "B", "")).await);
        assert!(!run.add(job(Source::GithubLists, "Software Engineer", "A", "")).await);
    }

    #[tokio::test]
    async fn per_source_counters_track_admissions() {
        let run = run_with(24.0);
        run.add(job(Source::Greenhouse, "Software Engineer I", "A", "https://a.test/1")).await;
        run.add(job(Source::Greenhouse, "Software Engineer II", "B", "https://a.test/2")).await;
        run.add(job(Source::Lever, "Data Analyst", "C", "https://a.test/3")).await;
        // Rejected records don't count.
        run.add(job(Source::Lever, "Senior Engineer", "D", "https://a.test/4")).await;

        let stats = run.stats().await;
        assert_eq!(stats[0], (Source::Greenhouse, 2));
        assert_eq!(stats[1], (Source::Lever, 1));
    }

    #[test]
    fn zero_hours_clamps_to_one() {
        let run = run_with(0.0);
        assert_eq!(run.hours_back(), 1.0);
        let age = Utc::now() - run.cutoff();
        assert!(age <= chrono::Duration::hours(1) + chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn accepted_records_keep_invariants() {
        let run = run_with(24.0);
        for (i, title) in ["Software Engineer I", "Software Engineer Manager", "Data Analyst"]
            .into_iter()
            .enumerate()
        {
            run.add(job(Source::Workday, title, "Acme", &format!("https://a.test/{i}"))).await;
        }

        let jobs = run.jobs().await;
        // S6: the manager title never made it through.
        assert_eq!(jobs.len(), 2);
        let urls: HashSet<_> = jobs.iter().map(|j| j.url.clone()).collect();
        let sigs: HashSet<_> = jobs.iter().map(|j| j.signature()).collect();
        assert_eq!(urls.len(), jobs.len());
        assert_eq!(sigs.len(), jobs.len());
        for j in &jobs {
            assert!(!filters::is_seniority_blocked(&j.title));
            assert!(j.title.chars().count() >= 3);
        }
    }
}
