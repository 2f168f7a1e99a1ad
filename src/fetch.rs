// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Remote retrieval of registry spreadsheets from GitHub repositories.
///
/// Fetches file contents through the repository contents API so the same
/// code path works for github.com and Enterprise installations, then hands
/// the raw bytes to the registry loader.
use base64::{engine::general_purpose::STANDARD, Engine};
use masterror::AppError;
use tracing::{debug, info};

use crate::config::Settings;

/// Fetches a registry file from a GitHub repository.
///
/// # Arguments
///
/// * `settings` - Connection settings built at process start
/// * `owner` - Repository owner or organization
/// * `repo` - Repository name
/// * `path` - Path of the registry file within the repository
/// * `reference` - Branch, tag, or commit to read from
///
/// # Errors
///
/// Returns [`AppError`] when the API request fails, the payload carries no
/// content, or the payload decodes to an HTML page instead of a
/// spreadsheet (typically a misconfigured Enterprise base URL).
///
/// # Example
///
/// ```no_run
/// use apix::{fetch_registry_bytes, Settings};
///
/// # async fn example() -> Result<(), masterror::AppError> {
/// let settings = Settings::anonymous();
/// let bytes =
///     fetch_registry_bytes(&settings, "octocat", "registry", "sample_api_data.xlsx", "main")
///         .await?;
/// println!("fetched {} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_registry_bytes(
    settings: &Settings,
    owner: &str,
    repo: &str,
    path: &str,
    reference: &str
) -> Result<Vec<u8>, AppError> {
    let octocrab = settings.client()?;

    info!(owner, repo, path, reference, "fetching registry file");
    let contents = octocrab
        .repos(owner, repo)
        .get_content()
        .path(path)
        .r#ref(reference)
        .send()
        .await
        .map_err(|error| AppError::service(format!("failed to fetch {path}: {error}")))?;

    let item = contents
        .items
        .into_iter()
        .next()
        .ok_or_else(|| AppError::service(format!("no content returned for {path}")))?;

    let encoded = item
        .content
        .ok_or_else(|| AppError::service(format!("contents API returned no payload for {path}")))?;

    let bytes = decode_content(&encoded)?;
    reject_html_payload(&bytes)?;
    debug!(bytes = bytes.len(), "decoded registry payload");

    Ok(bytes)
}

/// Decodes a base64 payload as returned by the contents API.
///
/// The API wraps base64 output in newlines; whitespace is stripped before
/// decoding.
fn decode_content(encoded: &str) -> Result<Vec<u8>, AppError> {
    let compact: String = encoded.split_whitespace().collect();
    STANDARD
        .decode(compact)
        .map_err(|error| AppError::service(format!("failed to decode file payload: {error}")))
}

/// Rejects payloads that are HTML pages rather than spreadsheet bytes.
///
/// A misconfigured base URL yields a login or error page with a 200 status;
/// catching it here produces an actionable message instead of a workbook
/// decode failure downstream.
fn reject_html_payload(bytes: &[u8]) -> Result<(), AppError> {
    let head = &bytes[..bytes.len().min(100)];
    let lowered = head.to_ascii_lowercase();
    if lowered.windows(9).any(|window| window == b"<!doctype")
        || lowered.windows(5).any(|window| window == b"<html")
    {
        return Err(AppError::service(
            "received HTML instead of a spreadsheet; verify the API base URL and file path"
        ));
    }
    Ok(())
}
