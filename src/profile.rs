use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// User profile consumed by discovery. `preferences.roles` extends the
/// built-in role allowlist; `preferences.locations` is informational only
/// (the US filter is fixed). `personal_info` belongs to the tailoring stage
/// and is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub personal_info: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            preferences: Preferences {
                roles: [
                    "software engineer",
                    "backend",
                    "frontend",
                    "full stack",
                    "ai engineer",
                    "machine learning",
                    "data engineer",
                    "sde",
                    "swe",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                locations: vec!["United States".to_string(), "Remote".to_string()],
            },
            personal_info: serde_json::Value::Null,
        }
    }
}

impl UserProfile {
    /// Load the profile from disk. A missing file is not an error: a default
    /// profile is written and returned. An unwritable default is fatal.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<UserProfile, AppError> {
        let path = path.as_ref();
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("reading {}: {e}", path.display())))?;
            let profile: UserProfile = serde_json::from_str(&raw)
                .map_err(|e| AppError::Config(format!("parsing {}: {e}", path.display())))?;
            return Ok(profile);
        }

        let profile = UserProfile::default();
        let raw = serde_json::to_string_pretty(&profile)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        std::fs::write(path, raw)
            .map_err(|e| AppError::Config(format!("writing default {}: {e}", path.display())))?;
        tracing::info!("Created default profile at {}", path.display());
        Ok(profile)
    }

    /// Lowercased role tokens from the profile.
    pub fn role_tokens(&self) -> Vec<String> {
        self.preferences
            .roles
            .iter()
            .map(|r| r.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_profile.json");

        let profile = UserProfile::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(profile.role_tokens().contains(&"swe".to_string()));

        // Second load reads the file we just wrote.
        let reloaded = UserProfile::load_or_create(&path).unwrap();
        assert_eq!(reloaded.preferences.roles, profile.preferences.roles);
    }

    #[test]
    fn partial_profile_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_profile.json");
        std::fs::write(&path, r#"{"preferences": {"roles": ["Embedded"]}}"#).unwrap();

        let profile = UserProfile::load_or_create(&path).unwrap();
        assert_eq!(profile.role_tokens(), vec!["embedded"]);
        assert!(profile.preferences.locations.is_empty());
    }
}
