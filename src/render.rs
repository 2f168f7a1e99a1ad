// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rendering of canonical records into APIX metadata manifests.
//!
//! The projection is declarative: each manifest field reads one canonical
//! record field, and empty or absent fields are omitted from the document
//! rather than serialized as empty strings. Multiple records for one
//! repository render as a multi-document YAML stream.

use chrono::Utc;
use serde::Serialize;

use crate::{error::Error, record::ApiRecord};

/// Manifest schema version emitted in every document.
const MANIFEST_API_VERSION: &str = "apix.io/v1";
/// Manifest kind emitted in every document.
const MANIFEST_KIND: &str = "APIMetadata";
/// Filename under which manifests are published into repositories.
pub const MANIFEST_FILE_NAME: &str = "apix.yaml";

/// One rendered metadata document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApixManifest {
    api_version: String,
    kind:        String,
    metadata:    ManifestMetadata,
    spec:        ManifestSpec
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestMetadata {
    name:       String,
    version:    String,
    created_at: String,
    updated_at: String
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestSpec {
    technical_name: String,
    version:        String,
    #[serde(skip_serializing_if = "Option::is_none")]
    snow: Option<SnowRefs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lifecycle: Option<Lifecycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_contract_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documentation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway: Option<Gateway>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ownership: Option<Ownership>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnowRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    business_application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_service_id: Option<String>
}

#[derive(Debug, Clone, Serialize)]
struct Lifecycle {
    status: String
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Gateway {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    gateway_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_url: Option<String>
}

#[derive(Debug, Clone, Serialize)]
struct Ownership {
    #[serde(skip_serializing_if = "Option::is_none")]
    team:    Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<String>
}

/// Renders records into an `apix.yaml` document string.
///
/// A single record produces one plain YAML document; multiple records are
/// joined as a stream with `---` separators so one manifest file can carry
/// every API registered for the repository.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when no records are
/// supplied and [`Error::Serialize`](Error::Serialize) when YAML emission
/// fails.
pub fn render_manifest(records: &[ApiRecord]) -> Result<String, Error> {
    if records.is_empty() {
        return Err(Error::validation("no records to render"));
    }

    let timestamp = Utc::now().to_rfc3339();
    let mut documents = Vec::with_capacity(records.len());
    for record in records {
        documents.push(serde_yaml::to_string(&manifest_for(record, &timestamp))?);
    }

    if documents.len() == 1 {
        Ok(documents.remove(0))
    } else {
        Ok(format!("---\n{}", documents.join("\n---\n")))
    }
}

fn manifest_for(record: &ApiRecord, timestamp: &str) -> ApixManifest {
    let technical_name = record.get("api_technical_name").unwrap_or_default().to_owned();
    let version = record.get("version").unwrap_or_default().to_owned();
    let field = |key: &str| record.get_non_empty(key).map(str::to_owned);

    let snow = match (
        field("snow_business_application_id"),
        field("snow_application_service_id")
    ) {
        (None, None) => None,
        (business_application_id, application_service_id) => Some(SnowRefs {
            business_application_id,
            application_service_id
        })
    };

    let gateway = match (
        field("gateway_type"),
        field("gateway_proxy_url"),
        field("gateway_config_url")
    ) {
        (None, None, None) => None,
        (gateway_type, proxy_url, config_url) => Some(Gateway {
            gateway_type,
            proxy_url,
            config_url
        })
    };

    let ownership = match (field("owner_team"), field("contact_email")) {
        (None, None) => None,
        (team, contact) => Some(Ownership {
            team,
            contact
        })
    };

    ApixManifest {
        api_version: MANIFEST_API_VERSION.to_owned(),
        kind: MANIFEST_KIND.to_owned(),
        metadata: ManifestMetadata {
            name:       technical_name.clone(),
            version:    version.clone(),
            created_at: timestamp.to_owned(),
            updated_at: timestamp.to_owned()
        },
        spec: ManifestSpec {
            technical_name,
            version,
            snow,
            platform: field("platform"),
            lifecycle: field("lifecycle_status").map(|status| Lifecycle {
                status
            }),
            classification: field("classification"),
            description: field("description"),
            api_contract_url: field("api_contract_url"),
            documentation_url: field("documentation_url"),
            gateway,
            ownership
        }
    }
}
