//! Title, location, freshness and sponsorship filters shared by every
//! adapter, plus the date-parsing rules for the mess of formats the sources
//! emit.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use regex::Regex;

/// Title substrings that reject a posting outright, regardless of source.
/// Applied once more inside dedup admission, which is the authoritative gate.
pub const SENIORITY_BLOCK: &[&str] = &[
    "senior", " sr ", "sr.", "staff ", "principal", "director", "manager",
    "lead ", "tech lead", "head of", "vp ", "v.p.", "vice president",
    "distinguished", "fellow", "cto", "cpo", "coo", "cfo", "chief",
    "architect", "5+ yr", "7+ yr", "8+ yr", "10+ yr",
];

/// Role tokens that always pass the role filter, independent of the user
/// profile.
pub const ALWAYS_MATCH: &[&str] = &[
    // Engineering
    "software engineer", "swe", "sde", "developer", "backend engineer",
    "full stack", "fullstack", "ai engineer", "ml engineer",
    "machine learning", "data engineer", "cloud engineer", "devops",
    "new grad", "entry level", "early career", "junior", "associate engineer",
    "infrastructure engineer", "platform engineer", "systems engineer",
    "embedded engineer", "firmware engineer", "software development",
    // Analytics / Data
    "data analyst", "business analyst", "business intelligence",
    "bi analyst", "bi developer", "analytics engineer",
    "product analyst", "operations analyst", "data scientist",
    "quantitative analyst", "research analyst", "market analyst",
    "financial analyst", "applied scientist",
];

/// True when the lowercased title contains any seniority token.
pub fn is_seniority_blocked(title: &str) -> bool {
    let tl = title.to_lowercase();
    SENIORITY_BLOCK.iter().any(|blk| tl.contains(blk))
}

/// Role-title acceptance. The user list extends the built-in allowlist; it
/// never restricts it. An empty user list accepts everything (seniority
/// rejection still applies at admission).
pub fn is_role_match(title: &str, user_roles: &[String]) -> bool {
    let tl = title.to_lowercase();
    if user_roles.is_empty() {
        return true;
    }
    if SENIORITY_BLOCK.iter().any(|blk| tl.contains(blk)) {
        return false;
    }
    if ALWAYS_MATCH.iter().any(|tok| tl.contains(tok)) {
        return true;
    }
    user_roles.iter().any(|role| tl.contains(role.as_str()))
}

const NON_US_REMOTE: &[&str] = &[
    "emea", "apac", "uk", "europe", "germany", "india", "canada", "latam",
];

const US_INDICATORS: &[&str] = &[
    "united states", "usa", "us", "america",
    " ca", " ny", " wa", " tx", " fl", " il", " ma", " co", " ga", " va",
    "california", "new york", "washington", "texas", "seattle", "san francisco",
    "san jose", "los angeles", "boston", "chicago", "austin", "denver", "atlanta",
    "remote us", "us-remote", "remote (us",
];

/// US-location acceptance. Empty location is treated as unknown/US-default.
pub fn is_us_location(location: &str) -> bool {
    if location.trim().is_empty() {
        return true;
    }
    let ll = location.to_lowercase();
    if ll.contains("remote") && !NON_US_REMOTE.iter().any(|x| ll.contains(x)) {
        return true;
    }
    US_INDICATORS.iter().any(|ind| ll.contains(ind))
}

const NO_SPONSOR: &[&str] = &[
    "no h1b", "no visa", "does not sponsor", "not sponsor", "unable to sponsor",
    "cannot sponsor", "citizen only", "us citizen", "clearance required",
];

const LIKELY_SPONSOR: &[&str] = &[
    "h1b sponsor", "visa sponsor", "sponsorship available", "will sponsor",
    "open to sponsor", "sponsors h1b",
];

/// H1B sponsorship signal from free text: "No", "Likely", or "".
pub fn extract_sponsorship(text: &str) -> &'static str {
    let t = text.to_lowercase();
    if NO_SPONSOR.iter().any(|x| t.contains(x)) {
        return "No";
    }
    if LIKELY_SPONSOR.iter().any(|x| t.contains(x)) {
        return "Likely";
    }
    ""
}

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*([dh])").unwrap());
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

const MONTHS: &[(&str, u32)] = &[
    ("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4), ("may", 5), ("jun", 6),
    ("jul", 7), ("aug", 8), ("sep", 9), ("oct", 10), ("nov", 11), ("dec", 12),
];

/// Parse a posting date in any of the shapes the sources produce.
/// Returns `None` when nothing matches; callers decide whether an
/// unparseable date is acceptable (GitHub feeds reject, APIs keep).
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    parse_date_at(date_str, Utc::now())
}

/// `parse_date` against an explicit "now", so cutoff decisions are testable.
pub fn parse_date_at(date_str: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let dl = date_str.trim().to_lowercase();
    if dl.is_empty() {
        return None;
    }

    // "today", "new", "just posted"
    if ["today", "new", "just posted"].iter().any(|w| dl.contains(w)) {
        return Some(now);
    }

    // Unix epoch, seconds or milliseconds by magnitude.
    if let Ok(n) = dl.parse::<i64>() {
        return parse_epoch(n);
    }

    // "45d", "3h"; "0d"/"0h" come out as now.
    if let Some(caps) = AGE_RE.captures(&dl) {
        let val: i64 = caps[1].parse().ok()?;
        return match &caps[2] {
            "d" => Some(now - Duration::days(val)),
            _ => Some(now - Duration::hours(val)),
        };
    }

    // Month abbreviation + day: "Feb 22", "jan 5". More than a day in the
    // future means it was posted last year.
    for (abbr, month) in MONTHS {
        if dl.contains(abbr) {
            let day: u32 = DAY_RE
                .captures(&dl)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0);
            if day == 0 {
                break;
            }
            let mut parsed = Utc.with_ymd_and_hms(now.year(), *month, day, 0, 0, 0).single()?;
            if parsed > now + Duration::days(1) {
                parsed = Utc.with_ymd_and_hms(now.year() - 1, *month, day, 0, 0, 0).single()?;
            }
            return Some(parsed);
        }
    }

    // ISO-8601 date prefix: "2026-07-30", "2026-07-30T12:00:00Z"
    let prefix = date_str.trim().split('T').next().unwrap_or("");
    if let Ok(d) = chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }

    None
}

/// Unix timestamp, autodetecting milliseconds by magnitude > 10^10.
pub fn parse_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw <= 0 {
        return None;
    }
    let secs = if raw > 10_000_000_000 { raw / 1000 } else { raw };
    Utc.timestamp_opt(secs, 0).single()
}

/// Normalize a date for display and storage: parseable dates become
/// "Mon DD", everything else is kept as trimmed text.
pub fn standardize_date(date_str: &str) -> String {
    if date_str.trim().is_empty() {
        return String::new();
    }
    match parse_date(date_str) {
        Some(dt) => dt.format("%b %d").to_string(),
        None => date_str.trim().to_string(),
    }
}

/// Effective cutoff for GitHub-sourced feeds: the repos update daily (or
/// slower), so an hourly window would zero them out. `min_days` is 2 for
/// markdown lists and 7 for JSON feeds.
pub fn github_cutoff(cutoff: DateTime<Utc>, min_days: i64) -> DateTime<Utc> {
    cutoff.min(Utc::now() - Duration::days(min_days))
}

/// Flatten an HTML fragment to plain text with collapsed whitespace.
pub fn html_to_text(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    let text: Vec<&str> = fragment.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate on a char boundary; descriptions are capped at 2000 chars.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seniority_block_catches_embedded_tokens() {
        assert!(is_seniority_blocked("Senior Software Engineer"));
        assert!(is_seniority_blocked("Software Engineer Manager"));
        assert!(is_seniority_blocked("Staff Engineer"));
        assert!(is_seniority_blocked("Engineering Lead (Platform)"));
        assert!(is_seniority_blocked("Backend Engineer 10+ yrs"));
        assert!(!is_seniority_blocked("Software Engineer I"));
        assert!(!is_seniority_blocked("Leadership Program Associate Engineer"));
    }

    #[test]
    fn role_match_always_list_and_user_extension() {
        let roles = vec!["embedded".to_string()];
        assert!(is_role_match("Software Engineer I", &roles));
        assert!(is_role_match("Data Analyst", &roles));
        assert!(is_role_match("Embedded Linux Specialist", &roles));
        assert!(!is_role_match("Accountant", &roles));
        assert!(!is_role_match("Senior Software Engineer", &roles));
        // Empty user list is fully permissive at this layer.
        assert!(is_role_match("Underwater Basket Weaver", &[]));
    }

    #[test]
    fn us_location_rules() {
        assert!(is_us_location(""));
        assert!(is_us_location("Remote"));
        assert!(is_us_location("San Francisco, CA"));
        assert!(is_us_location("Remote (US)"));
        assert!(!is_us_location("Remote - EMEA"));
        assert!(!is_us_location("London"));
        assert!(!is_us_location("Berlin, Germany"));
    }

    #[test]
    fn sponsorship_signals() {
        assert_eq!(extract_sponsorship("We are unable to sponsor visas"), "No");
        assert_eq!(extract_sponsorship("US Citizen required"), "No");
        assert_eq!(extract_sponsorship("H1B sponsorship available"), "Likely");
        assert_eq!(extract_sponsorship("Great benefits and snacks"), "");
        // "No" wins when both appear.
        assert_eq!(
            extract_sponsorship("no h1b; we said sponsorship available before"),
            "No"
        );
    }

    #[test]
    fn relative_dates_parse_against_now() {
        let now = Utc.with_ymd_and_hms(2026, 7, 30, 12, 0, 0).unwrap();
        assert_eq!(parse_date_at("today", now), Some(now));
        assert_eq!(parse_date_at("just posted", now), Some(now));
        assert_eq!(parse_date_at("0d", now), Some(now));
        assert_eq!(parse_date_at("3d", now), Some(now - Duration::days(3)));
        assert_eq!(parse_date_at("12h", now), Some(now - Duration::hours(12)));
        assert_eq!(parse_date_at("45d", now), Some(now - Duration::days(45)));
        // "40d" must not be mistaken for the "0d" shortcut.
        assert_eq!(parse_date_at("40d", now), Some(now - Duration::days(40)));
        assert_eq!(parse_date_at("Posted 3 Days Ago", now), Some(now - Duration::days(3)));
    }

    #[test]
    fn month_day_rolls_back_a_year_when_in_future() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let parsed = parse_date_at("Dec 20", now).unwrap();
        assert_eq!(parsed.year(), 2025);
        assert_eq!(parsed.month(), 12);

        let recent = parse_date_at("Jan 5", now).unwrap();
        assert_eq!(recent.year(), 2026);
    }

    #[test]
    fn iso_and_epoch_parse() {
        let d = parse_date("2026-07-28T09:30:00Z").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2026, 7, 28));

        // Seconds vs milliseconds by magnitude.
        let s = parse_epoch(1_730_000_000).unwrap();
        let ms = parse_epoch(1_730_000_000_000).unwrap();
        assert_eq!(s, ms);
        assert_eq!(s.year(), 2024);
        assert!(parse_epoch(0).is_none());
    }

    #[test]
    fn unparseable_dates_return_none() {
        assert_eq!(parse_date("ongoing"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("???"), None);
    }

    #[test]
    fn standardize_keeps_cutoff_decision() {
        // A fresh date stays on the fresh side after format + reparse.
        let cutoff = Utc::now() - Duration::days(7);
        let standardized = standardize_date("2d");
        let reparsed = parse_date(&standardized).unwrap();
        assert!(reparsed >= cutoff);

        // A stale date stays stale.
        let stale = standardize_date("45d");
        // "Jun 16"-style strings reparse via month+day with year rollback.
        let reparsed = parse_date(&stale).unwrap();
        assert!(reparsed < cutoff);

        // Unparseable text passes through untouched.
        assert_eq!(standardize_date("rolling basis"), "rolling basis");
    }

    #[test]
    fn html_strips_to_text() {
        assert_eq!(
            html_to_text("<p>Build <b>things</b></p><ul><li>fast</li></ul>"),
            "Build things fast"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 5), "héllo");
        assert_eq!(truncate("short", 2000), "short");
    }
}
