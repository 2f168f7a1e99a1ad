//! Mapping of source spreadsheet labels onto the canonical field vocabulary.
//!
//! Registry spreadsheets arrived from several teams and the same semantic
//! field appears under different labels depending on the sheet that carried
//! it. This module owns the fixed translation table; labels outside the
//! table degrade to a lower-cased, underscore-separated spelling so no
//! source data is ever dropped on the floor.

/// Canonical key holding the source-control repository URL of a record.
pub const REPOSITORY_URL: &str = "repository_url";

/// Canonical key holding the technical name of the API.
pub const API_TECHNICAL_NAME: &str = "api_technical_name";

/// Canonical key holding the EIM identifier derived from the sheet name.
pub const EIM_ID: &str = "eim_id";

/// Translates a raw spreadsheet label into its canonical field key.
///
/// Known labels are matched exactly (case-sensitive) after trimming
/// surrounding whitespace. Two distinct labels may map onto the same
/// canonical key; within one record scan the later value simply overwrites
/// the earlier one. Unknown labels fall back to
/// `lowercase(replace(label, " ", "_"))`, which keeps legacy columns
/// addressable without extending the table. The function is total and has
/// no failure mode.
///
/// # Examples
///
/// ```
/// use apix::canonical_field;
///
/// assert_eq!(canonical_field("API Repo"), "repository_url");
/// assert_eq!(canonical_field("apiId"), "repository_url");
/// assert_eq!(canonical_field("Custom Label"), "custom_label");
/// ```
pub fn canonical_field(label: &str) -> String {
    let label = label.trim();
    match label {
        "API Repo" | "apiId" => REPOSITORY_URL.to_owned(),
        "API Object/API Technical Name" => API_TECHNICAL_NAME.to_owned(),
        "version" => "version".to_owned(),
        "apiContractURL" => "api_contract_url".to_owned(),
        "businessApplicationID" => "snow_business_application_id".to_owned(),
        "applicationServiceId" => "snow_application_service_id".to_owned(),
        "classification" => "classification".to_owned(),
        "sourceCode.pathToSource" => "source_code_path".to_owned(),
        "SourceCodeURL" => "source_code_url".to_owned(),
        "SourceCode Reference" => "source_code_reference".to_owned(),
        "Platform.provider" => "platform_provider".to_owned(),
        "Platform.technology" => "platform_technology".to_owned(),
        "Platform.team" => "platform_team".to_owned(),
        "lifecycleStatus" => "lifecycle_status".to_owned(),
        "consumers" => "consumers".to_owned(),
        "consumers[].applicationServiceId" => "consumer_application_service_ids".to_owned(),
        "gatewayType" => "gateway_type".to_owned(),
        "proxyURL" => "gateway_proxy_url".to_owned(),
        "configURL" => "gateway_config_url".to_owned(),
        "apiHostingCountry" => "api_hosting_country".to_owned(),
        "documentationURL" => "documentation_url".to_owned(),
        "consumingCountryGroups" => "consuming_country_groups".to_owned(),
        "countryCode" => "consuming_country_code".to_owned(),
        "groupMemberCode" => "consuming_group_member_code".to_owned(),
        "Application Name" => "application_name".to_owned(),
        other => other.to_lowercase().replace(' ', "_")
    }
}
