// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Pull-request publishing for rendered metadata manifests.
///
/// Walks the hosting API through the full workflow: resolve the default
/// branch, branch off its head commit, create or update the manifest file,
/// and open the pull request.
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use masterror::AppError;
use octocrab::{models::repos::Object, params::repos::Reference};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::Settings, render::MANIFEST_FILE_NAME};

/// Prefix of generated metadata branches; a timestamp is appended.
const BRANCH_PREFIX: &str = "apix-metadata-";
/// Commit message used when writing the manifest file.
const COMMIT_MESSAGE: &str = "Add APIX metadata file for API audit";
/// Title of the opened pull request.
const PR_TITLE: &str = "Add APIX metadata file";
/// Body of the opened pull request.
const PR_BODY: &str = "This PR adds the APIX metadata file for API repository audit.\n\n\
                       Generated automatically by the APIX automation tool.";

/// Result of a manifest publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResult {
    /// Branch that carries the manifest commit.
    pub branch:    String,
    /// Number of the opened pull request.
    pub pr_number: u64,
    /// Browser URL of the opened pull request, when reported.
    pub pr_url:    Option<String>
}

/// Publishes a rendered manifest to the repository behind `repo_url`.
///
/// # Arguments
///
/// * `settings` - Connection settings built at process start
/// * `repo_url` - Repository URL the manifest belongs to
/// * `manifest` - Rendered `apix.yaml` contents
///
/// # Errors
///
/// Returns [`AppError`] when the repository cannot be resolved from the
/// URL, when no token is configured, or when any hosting API step fails.
///
/// # Example
///
/// ```no_run
/// use apix::{publish_manifest, Settings};
///
/// # async fn example() -> Result<(), masterror::AppError> {
/// let settings = Settings::anonymous();
/// let result =
///     publish_manifest(&settings, "https://github.com/octocat/hello-world", "kind: APIMetadata")
///         .await?;
/// println!("opened PR #{}", result.pr_number);
/// # Ok(())
/// # }
/// ```
pub async fn publish_manifest(
    settings: &Settings,
    repo_url: &str,
    manifest: &str
) -> Result<PublishResult, AppError> {
    settings.require_token()?;
    let (owner, repo) = parse_owner_repo(repo_url)?;
    let octocrab = settings.client()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}")
            .expect("valid template")
    );

    pb.set_message(format!("Resolving default branch of {owner}/{repo}..."));
    debug!(owner, repo, "resolving default branch");
    let repository = octocrab
        .repos(&owner, &repo)
        .get()
        .await
        .map_err(|error| AppError::service(format!("failed to access {owner}/{repo}: {error}")))?;
    let default_branch = repository.default_branch.unwrap_or_else(|| "main".to_owned());

    pb.set_message(format!("Reading head of {default_branch}..."));
    let base_ref = octocrab
        .repos(&owner, &repo)
        .get_ref(&Reference::Branch(default_branch.clone()))
        .await
        .map_err(|error| {
            AppError::service(format!("failed to read branch {default_branch}: {error}"))
        })?;
    let base_sha = match base_ref.object {
        Object::Commit {
            sha, ..
        } => sha,
        Object::Tag {
            sha, ..
        } => sha,
        _ => {
            return Err(AppError::service(format!(
                "branch {default_branch} does not point at a commit"
            )));
        }
    };
    debug!(%base_sha, "resolved base commit");

    let branch = format!("{BRANCH_PREFIX}{}", Utc::now().format("%Y%m%d-%H%M%S"));
    pb.set_message(format!("Creating branch {branch}..."));
    info!(%branch, "creating metadata branch");
    octocrab
        .repos(&owner, &repo)
        .create_ref(&Reference::Branch(branch.clone()), base_sha)
        .await
        .map_err(|error| AppError::service(format!("failed to create branch {branch}: {error}")))?;

    pb.set_message(format!("Writing {MANIFEST_FILE_NAME}..."));
    let existing_sha = manifest_sha(&octocrab, &owner, &repo, &branch).await;
    match existing_sha {
        Some(sha) => {
            debug!("manifest exists, updating");
            octocrab
                .repos(&owner, &repo)
                .update_file(MANIFEST_FILE_NAME, COMMIT_MESSAGE, manifest, &sha)
                .branch(&branch)
                .send()
                .await
                .map_err(|error| {
                    AppError::service(format!("failed to update {MANIFEST_FILE_NAME}: {error}"))
                })?;
        }
        None => {
            debug!("manifest missing, creating");
            octocrab
                .repos(&owner, &repo)
                .create_file(MANIFEST_FILE_NAME, COMMIT_MESSAGE, manifest)
                .branch(&branch)
                .send()
                .await
                .map_err(|error| {
                    AppError::service(format!("failed to create {MANIFEST_FILE_NAME}: {error}"))
                })?;
        }
    }

    pb.set_message(format!("Opening pull request into {default_branch}..."));
    let pull_request = octocrab
        .pulls(&owner, &repo)
        .create(PR_TITLE, &branch, &default_branch)
        .body(PR_BODY)
        .send()
        .await
        .map_err(|error| AppError::service(format!("failed to create pull request: {error}")))?;

    let pr_url = pull_request.html_url.as_ref().map(ToString::to_string);
    pb.finish_with_message(format!("Opened PR #{}", pull_request.number));
    info!(pr = pull_request.number, "published manifest");

    Ok(PublishResult {
        branch,
        pr_number: pull_request.number,
        pr_url
    })
}

async fn manifest_sha(
    octocrab: &octocrab::Octocrab,
    owner: &str,
    repo: &str,
    branch: &str
) -> Option<String> {
    let contents = octocrab
        .repos(owner, repo)
        .get_content()
        .path(MANIFEST_FILE_NAME)
        .r#ref(branch)
        .send()
        .await
        .ok()?;

    contents.items.first().map(|item| item.sha.clone())
}

/// Derives `(owner, repo)` from a repository URL.
///
/// The last two path segments are taken as owner and repository; a
/// trailing slash and a `.git` suffix are tolerated. Works for full HTTPS
/// URLs and for `owner/repo` shorthand.
///
/// # Errors
///
/// Returns [`AppError`] when the URL does not carry both segments.
pub fn parse_owner_repo(repo_url: &str) -> Result<(String, String), AppError> {
    let trimmed = repo_url.trim().trim_end_matches('/');
    let mut segments = trimmed.rsplit('/');

    let repo = segments
        .next()
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .filter(|segment| !segment.is_empty());
    let owner = segments
        .next()
        .filter(|segment| !segment.is_empty() && !segment.ends_with(':'));

    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok((owner.to_owned(), repo.to_owned())),
        _ => Err(AppError::validation(format!(
            "cannot derive owner and repository from '{repo_url}'"
        )))
    }
}
