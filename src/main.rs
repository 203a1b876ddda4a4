mod browser;
mod collectors;
mod config;
mod db;
mod discovery;
mod error;
mod filters;
mod http;
mod models;
mod profile;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::db::JobStore;
use crate::discovery::Discovery;
use crate::profile::UserProfile;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobscout=info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!(
        "jobscout | lookback: {}h | max tailor: {} | apply: {}",
        config.hours,
        config.max_tailor,
        !config.skip_apply
    );

    // A missing profile gets a default written; an unwritable one is fatal.
    let user_profile = UserProfile::load_or_create(&config.profile)?;

    // The store is the one component whose failure aborts the run.
    let store = JobStore::open(&config.db_path).await?;

    // Single-job mode: surface one job for the tailoring stage and exit.
    if let Some(job_id) = &config.single_job {
        match store.job_by_id(job_id).await? {
            Some(job) => {
                tracing::info!("[single-job] {} -- {} ({})", job.company, job.title, job.url);
            }
            None => tracing::error!("Job {job_id} not found in database"),
        }
        return Ok(());
    }

    if config.skip_discovery {
        tracing::info!("Discovery skipped; processing existing NEW jobs only");
    } else {
        // The store handle doubles as the incremental flush sink: every
        // admitted record is durable the moment `add` returns, so killing
        // the run mid-flight loses nothing.
        let run = Discovery::new(&user_profile, config.hours)
            .with_store(store.clone())
            .with_browser_profile(&config.browser_profile)
            .with_jobright(config.with_jobright);
        run.run().await?;

        if run.jobs().await.is_empty() {
            tracing::info!("No jobs found this run.");
        }
    }

    // Hand off pending work to the (external) tailoring stage.
    let pending = store.pending_applications().await?;
    if pending.is_empty() {
        tracing::info!("No new un-tailored jobs to process. Done.");
        return Ok(());
    }

    let batch = &pending[..pending.len().min(config.max_tailor)];
    tracing::info!(
        "{} jobs queued for tailoring (of {} pending)",
        batch.len(),
        pending.len()
    );
    for job in batch {
        tracing::info!("  {} -- {} [{}]", job.company, job.title, job.source);
    }
    if config.skip_apply {
        tracing::info!("Application step skipped (--skip-apply)");
    }

    tracing::info!("Application status:");
    for (status, count) in store.status_counts().await? {
        tracing::info!("  {status:.<15} {count}");
    }

    Ok(())
}
