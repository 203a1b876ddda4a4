use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::application::{Application, PendingJob, Status, UpdateApplication};
use crate::models::job::JobRecord;

/// Local SQLite store with the `jobs` and `applications` tables.
///
/// Every accepted record is flushed here as soon as admission succeeds, so a
/// run interrupted mid-flight keeps everything admitted up to that point.
#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    /// Open (creating if missing) the database and apply migrations.
    /// An unreadable database is the one fatal error in the pipeline.
    pub async fn open(path: &str) -> Result<JobStore, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = JobStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Schema setup. Safe to run on every open: tables are `IF NOT EXISTS`
    /// and the ADD COLUMN statements ignore "duplicate column" failures so
    /// older databases pick up newer columns.
    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS jobs (
                id             TEXT PRIMARY KEY,
                company        TEXT,
                title          TEXT,
                location       TEXT,
                source         TEXT,
                url            TEXT UNIQUE,
                description    TEXT,
                date_posted    TEXT,
                scraped_date   TEXT,
                hiring_manager TEXT,
                salary         TEXT DEFAULT '',
                department     TEXT DEFAULT '',
                sponsorship    TEXT DEFAULT ''
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS applications (
                job_id                TEXT PRIMARY KEY REFERENCES jobs(id),
                status                TEXT DEFAULT 'NEW',
                ats_score             REAL,
                resume_pdf_path       TEXT DEFAULT '',
                cover_letter_pdf_path TEXT DEFAULT '',
                applied_date          TEXT,
                notes                 TEXT DEFAULT ''
            )",
        )
        .execute(&self.pool)
        .await?;

        // Columns added after the first release; failures mean "already there".
        for stmt in [
            "ALTER TABLE jobs ADD COLUMN salary TEXT DEFAULT ''",
            "ALTER TABLE jobs ADD COLUMN department TEXT DEFAULT ''",
            "ALTER TABLE jobs ADD COLUMN sponsorship TEXT DEFAULT ''",
            "ALTER TABLE applications ADD COLUMN cover_letter_pdf_path TEXT DEFAULT ''",
        ] {
            let _ = sqlx::query(stmt).execute(&self.pool).await;
        }

        Ok(())
    }

    /// Insert a discovered job plus its `NEW` application row in one
    /// transaction. Returns `true` for a brand-new insert, `false` when the
    /// URL already existed.
    pub async fn insert_raw_job(&self, job: &JobRecord) -> Result<bool, AppError> {
        let job_id = Uuid::new_v4().to_string();
        let scraped = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO jobs
                (id, company, title, location, source, url, description,
                 date_posted, scraped_date, hiring_manager, salary, department, sponsorship)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&job_id)
        .bind(&job.company)
        .bind(&job.title)
        .bind(&job.location)
        .bind(job.source.as_str())
        .bind(&job.url)
        .bind(&job.description)
        .bind(&job.date)
        .bind(&scraped)
        .bind(&job.hiring_manager)
        .bind(&job.salary)
        .bind(&job.department)
        .bind(&job.sponsorship)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                // URL already tracked -- not a new job.
                return Ok(false);
            }
            return Err(err);
        }

        sqlx::query("INSERT OR IGNORE INTO applications (job_id, status) VALUES ($1, 'NEW')")
            .bind(&job_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Jobs awaiting tailoring: status NEW, no resume generated yet, and a
    /// URL to apply at. Newest scraped first.
    pub async fn pending_applications(&self) -> Result<Vec<PendingJob>, AppError> {
        let jobs = sqlx::query_as::<_, PendingJob>(
            "SELECT
                j.id, j.company, j.title, j.location, j.source, j.url,
                j.description, j.date_posted, j.hiring_manager, j.salary,
                a.status, a.resume_pdf_path, a.cover_letter_pdf_path, a.ats_score
             FROM jobs j
             JOIN applications a ON j.id = a.job_id
             WHERE a.status = 'NEW'
               AND (a.resume_pdf_path IS NULL OR a.resume_pdf_path = '')
               AND j.url != ''
             ORDER BY j.scraped_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// Single job with its application row, used by `--single-job`.
    pub async fn job_by_id(&self, job_id: &str) -> Result<Option<PendingJob>, AppError> {
        let job = sqlx::query_as::<_, PendingJob>(
            "SELECT
                j.id, j.company, j.title, j.location, j.source, j.url,
                j.description, j.date_posted, j.hiring_manager, j.salary,
                a.status, a.resume_pdf_path, a.cover_letter_pdf_path, a.ats_score
             FROM jobs j
             LEFT JOIN applications a ON j.id = a.job_id
             WHERE j.id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    /// Partial update of an application row. A missing row is created with
    /// status NEW first so the update always lands. Setting `APPLIED` also
    /// stamps `applied_date`. Discovery never calls this; it is the write
    /// surface for the tailoring and submission stages.
    #[allow(dead_code)]
    pub async fn update_application(
        &self,
        job_id: &str,
        input: UpdateApplication,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO applications (job_id, status) VALUES ($1, 'NEW')")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        let existing = sqlx::query_as::<_, Application>(
            "SELECT job_id, status, ats_score, resume_pdf_path,
                    cover_letter_pdf_path, applied_date, notes
             FROM applications WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        let status = input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let applied_date = if input.status == Some(Status::Applied) {
            Some(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())
        } else {
            existing.applied_date
        };

        sqlx::query(
            "UPDATE applications
             SET status = $2, resume_pdf_path = $3, cover_letter_pdf_path = $4,
                 ats_score = $5, applied_date = $6, notes = $7
             WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(&status)
        .bind(input.resume_path.or(existing.resume_pdf_path))
        .bind(input.cover_letter_path.or(existing.cover_letter_pdf_path))
        .bind(input.ats_score.or(existing.ats_score))
        .bind(applied_date)
        .bind(input.notes.or(existing.notes))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Per-status application counts for the end-of-run report.
    pub async fn status_counts(&self) -> Result<Vec<(String, i64)>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM applications GROUP BY status ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Truncate both tables. Maintenance only.
    #[allow(dead_code)]
    pub async fn clear_all(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM applications")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM jobs").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Source;

    async fn store() -> (tempfile::TempDir, JobStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = JobStore::open(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    fn record(url: &str) -> JobRecord {
        let mut job = JobRecord::new(Source::Greenhouse, "Software Engineer I", "Acme");
        job.url = url.to_string();
        job.location = "Remote".to_string();
        job
    }

    #[tokio::test]
    async fn insert_is_new_once_per_url() {
        let (_dir, store) = store().await;

        assert!(store.insert_raw_job(&record("https://x.test/1")).await.unwrap());
        assert!(!store.insert_raw_job(&record("https://x.test/1")).await.unwrap());
        assert!(store.insert_raw_job(&record("https://x.test/2")).await.unwrap());

        let counts = store.status_counts().await.unwrap();
        assert_eq!(counts, vec![("NEW".to_string(), 2)]);
    }

    #[tokio::test]
    async fn new_inserts_are_pending_until_tailored() {
        let (_dir, store) = store().await;
        store.insert_raw_job(&record("https://x.test/1")).await.unwrap();

        let pending = store.pending_applications().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Software Engineer I");
        assert_eq!(pending[0].status.as_deref(), Some("NEW"));

        store
            .update_application(
                &pending[0].id,
                UpdateApplication {
                    resume_path: Some("resumes/acme.pdf".to_string()),
                    ats_score: Some(8.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // A tailored job leaves the pending queue even though status is NEW.
        assert!(store.pending_applications().await.unwrap().is_empty());

        let job = store.job_by_id(&pending[0].id).await.unwrap().unwrap();
        assert_eq!(job.resume_pdf_path.as_deref(), Some("resumes/acme.pdf"));
        assert_eq!(job.status.as_deref(), Some("NEW"));
    }

    #[tokio::test]
    async fn applied_status_stamps_date() {
        let (_dir, store) = store().await;
        store.insert_raw_job(&record("https://x.test/1")).await.unwrap();
        let id = store.pending_applications().await.unwrap()[0].id.clone();

        store
            .update_application(
                &id,
                UpdateApplication {
                    status: Some(Status::Applied),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let counts = store.status_counts().await.unwrap();
        assert_eq!(counts, vec![("APPLIED".to_string(), 1)]);
    }

    #[tokio::test]
    async fn reopen_preserves_rows_and_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let store = JobStore::open(path.to_str().unwrap()).await.unwrap();
            store.insert_raw_job(&record("https://x.test/1")).await.unwrap();
        }
        let store = JobStore::open(path.to_str().unwrap()).await.unwrap();
        assert_eq!(store.pending_applications().await.unwrap().len(), 1);
        assert!(!store.insert_raw_job(&record("https://x.test/1")).await.unwrap());
    }
}
