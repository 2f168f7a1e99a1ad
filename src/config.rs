//! Process-level configuration for collaborators that reach GitHub.
//!
//! Settings are constructed once at startup from CLI arguments (with
//! environment fallbacks) and passed by reference into the fetch and
//! publish collaborators. The parsing and lookup core takes no
//! configuration and never reads ambient state.

use clap::Args;
use masterror::AppError;
use octocrab::Octocrab;

/// Default GitHub API endpoint used when no Enterprise base is configured.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Connection settings for the GitHub-facing collaborators.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Base URL of the GitHub API; point at an Enterprise installation to
    /// work against internal hosting.
    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_BASE",
        value_name = "URL",
        default_value = DEFAULT_GITHUB_API_BASE
    )]
    pub github_api_base: String,

    /// Personal access token used to authenticate API requests.
    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub github_token: Option<String>
}

impl Settings {
    /// Creates settings for the public GitHub API without a token.
    pub fn anonymous() -> Self {
        Self {
            github_api_base: DEFAULT_GITHUB_API_BASE.to_owned(),
            github_token:    None
        }
    }

    /// Builds an authenticated GitHub client from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the base URL is rejected or the client
    /// cannot be constructed.
    pub fn client(&self) -> Result<Octocrab, AppError> {
        let mut builder = Octocrab::builder()
            .base_uri(self.github_api_base.trim_end_matches('/'))
            .map_err(|error| {
                AppError::validation(format!(
                    "invalid GitHub API base '{}': {error}",
                    self.github_api_base
                ))
            })?;

        if let Some(token) = self.github_token.as_ref() {
            builder = builder.personal_token(token.clone());
        }

        builder
            .build()
            .map_err(|error| AppError::service(format!("failed to initialize GitHub client: {error}")))
    }

    /// Returns the configured token or fails with an actionable message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when no token was supplied via flag or
    /// environment.
    pub fn require_token(&self) -> Result<&str, AppError> {
        self.github_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                AppError::unauthorized(
                    "a GitHub token is required; pass --github-token or set GITHUB_TOKEN"
                )
            })
    }
}
