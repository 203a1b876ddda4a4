use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobscout", about = "New-grad job discovery and deduplication engine")]
pub struct Config {
    /// Lookback window in hours
    #[arg(long, default_value_t = 168.0)]
    pub hours: f64,

    /// Skip the browser application step
    #[arg(long)]
    pub skip_apply: bool,

    /// Max jobs to hand off for tailoring per run
    #[arg(long, default_value_t = 20)]
    pub max_tailor: usize,

    /// Process a single job by its DB id
    #[arg(long)]
    pub single_job: Option<String>,

    /// Skip discovery and only process existing NEW jobs
    #[arg(long)]
    pub skip_discovery: bool,

    /// Enable the Jobright browser adapter (off by default)
    #[arg(long)]
    pub with_jobright: bool,

    /// SQLite database path
    #[arg(long, env = "JOB_DB_PATH", default_value = "applications.db")]
    pub db_path: String,

    /// User profile JSON path
    #[arg(long, default_value = "user_profile.json")]
    pub profile: String,

    /// Persistent browser profile directory (cookies, sessions)
    #[arg(long, default_value = "browser_profile")]
    pub browser_profile: String,
}
