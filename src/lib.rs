//! Utilities for matching source-control repositories against
//! spreadsheet-backed API metadata registries.
//!
//! The library normalizes repository URLs, ingests registries in both the
//! transposed (field-per-row, record-per-column) and legacy row-per-record
//! layouts, groups canonical records by repository identity, and renders
//! matches into APIX metadata manifests that can be published back into the
//! repository as a pull request. All public APIs are documented with
//! invariants, error semantics, and minimal examples to facilitate
//! integration in automation tooling.

mod config;
mod error;
mod fetch;
mod fields;
mod flat;
mod lookup;
mod normalizer;
mod publish;
mod record;
mod registry;
mod render;
mod sheet;
mod transposed;

pub use config::{Settings, DEFAULT_GITHUB_API_BASE};
pub use error::{io_error, Error};
pub use fetch::fetch_registry_bytes;
pub use fields::{canonical_field, API_TECHNICAL_NAME, EIM_ID, REPOSITORY_URL};
pub use flat::FlatTable;
pub use lookup::{find_in_view, LookupService, RegistrySource};
pub use normalizer::{normalize_opt_repo_url, normalize_repo_url};
pub use publish::{parse_owner_repo, publish_manifest, PublishResult};
pub use record::{ApiRecord, RepositoryGroups};
pub use registry::{load_registry_bytes, load_registry_path, RegistryView, SourceFormat};
pub use render::{render_manifest, MANIFEST_FILE_NAME};
pub use sheet::SheetGrid;
pub use transposed::{parse_transposed_sheet, parse_transposed_sheets};
