//! Repository URL normalization used for registry grouping and lookups.
//!
//! Every comparison between a query URL and registry contents goes through
//! [`normalize_repo_url`] so that raw spellings of the same repository
//! (case differences, a trailing slash, a `.git` suffix) collapse onto one
//! canonical identity. The function is total: any string input, including
//! the empty string, produces a defined result and never fails.

/// Suffix stripped from clone-style repository URLs.
const GIT_SUFFIX: &str = ".git";

/// Normalizes a repository URL for equality comparison.
///
/// The transformation trims surrounding whitespace, lower-cases the value,
/// removes a single trailing `/`, and removes a trailing `.git` suffix.
/// Schemes and hosts are left untouched: `http` and `https` spellings of the
/// same repository intentionally remain distinct identities, and no
/// percent-decoding is applied.
///
/// Repeated trailing slashes are not fully collapsed; only one removal pass
/// runs. Inputs such as `repo//` therefore normalize to `repo/`.
///
/// # Examples
///
/// ```
/// use apix::normalize_repo_url;
///
/// assert_eq!(
///     normalize_repo_url("HTTPS://Example.com/Repo.GIT/"),
///     "https://example.com/repo"
/// );
/// assert_eq!(normalize_repo_url(""), "");
/// ```
pub fn normalize_repo_url(raw: &str) -> String {
    let mut url = raw.trim().to_lowercase();

    if url.ends_with('/') {
        url.pop();
    }

    if url.ends_with(GIT_SUFFIX) {
        url.truncate(url.len() - GIT_SUFFIX.len());
    }

    url
}

/// Normalizes an optional repository URL, treating absence as empty input.
///
/// Mirrors [`normalize_repo_url`] for call sites holding `Option<&str>`
/// values, such as cells read from a spreadsheet.
pub fn normalize_opt_repo_url(raw: Option<&str>) -> String {
    raw.map(normalize_repo_url).unwrap_or_default()
}
