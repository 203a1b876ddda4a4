use serde::{Deserialize, Serialize};

/// Application workflow status. Discovery only ever writes `NEW`; the
/// tailoring and submission stages own every other transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    New,
    Applied,
    Interview,
    Offer,
    Rejected,
    ManualNeeded,
    Skipped,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::Applied => "APPLIED",
            Status::Interview => "INTERVIEW",
            Status::Offer => "OFFER",
            Status::Rejected => "REJECTED",
            Status::ManualNeeded => "MANUAL_NEEDED",
            Status::Skipped => "SKIPPED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Status::New),
            "APPLIED" => Ok(Status::Applied),
            "INTERVIEW" => Ok(Status::Interview),
            "OFFER" => Ok(Status::Offer),
            "REJECTED" => Ok(Status::Rejected),
            "MANUAL_NEEDED" => Ok(Status::ManualNeeded),
            "SKIPPED" => Ok(Status::Skipped),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// One row of `applications`, keyed by job id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Application {
    pub job_id: String,
    pub status: String,
    pub ats_score: Option<f64>,
    pub resume_pdf_path: Option<String>,
    pub cover_letter_pdf_path: Option<String>,
    pub applied_date: Option<String>,
    pub notes: Option<String>,
}

/// A job joined with its application row, as handed to the tailoring stage.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingJob {
    pub id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub source: String,
    pub url: String,
    pub description: String,
    pub date_posted: String,
    pub hiring_manager: String,
    pub salary: String,
    pub status: Option<String>,
    pub resume_pdf_path: Option<String>,
    pub cover_letter_pdf_path: Option<String>,
    pub ats_score: Option<f64>,
}

/// Partial update applied to an application row. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub status: Option<Status>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    pub ats_score: Option<f64>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_text() {
        for s in [
            Status::New,
            Status::Applied,
            Status::Interview,
            Status::Offer,
            Status::Rejected,
            Status::ManualNeeded,
            Status::Skipped,
        ] {
            assert_eq!(Status::from_str(s.as_str()).unwrap(), s);
        }
        assert!(Status::from_str("new").is_err());
    }
}
