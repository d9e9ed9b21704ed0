use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User configuration from `AutoApply Config.yaml`.
///
/// Contains runner pacing, logging preferences, and the candidate data used
/// to fill application forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "AutoApply_Settings")]
    pub settings: RunnerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Delay between processed jobs, in milliseconds.
    #[serde(rename = "Job Delay MS", default = "default_job_delay_ms")]
    pub job_delay_ms: u64,

    /// Number of listings the simulated discovery yields.
    #[serde(rename = "Listing Count", default = "default_listing_count")]
    pub listing_count: usize,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Full Name", default)]
    pub full_name: String,

    #[serde(rename = "Email", default)]
    pub email: String,

    #[serde(rename = "Phone", default)]
    pub phone: String,

    #[serde(rename = "Resume Path", default)]
    pub resume_path: String,
}

impl RunnerSettings {
    pub fn job_delay(&self) -> Duration {
        Duration::from_millis(self.job_delay_ms)
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            job_delay_ms: default_job_delay_ms(),
            listing_count: default_listing_count(),
            debug_mode: false,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            resume_path: String::new(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            settings: RunnerSettings::default(),
        }
    }
}

fn default_job_delay_ms() -> u64 {
    2000
}

fn default_listing_count() -> usize {
    8
}

/// Candidate data handed to the applicator when filling forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub resume_path: Utf8PathBuf,
}

impl CandidateProfile {
    /// Build a profile from the user settings, falling back to placeholder
    /// data when fields are unset.
    pub fn from_settings(settings: &RunnerSettings) -> Self {
        let or_default = |value: &str, fallback: &str| {
            if value.trim().is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            full_name: or_default(&settings.full_name, "John Doe"),
            email: or_default(&settings.email, "johndoe@example.com"),
            phone: or_default(&settings.phone, "+1234567890"),
            resume_path: Utf8PathBuf::from(or_default(&settings.resume_path, "resume.pdf")),
        }
    }
}
