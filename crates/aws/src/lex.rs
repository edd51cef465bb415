//! Lex Model Building slot type status probe.
//!
//! [`slot_type_status`] asks `GetSlotTypeVersions` once and maps the answer to
//! one of three states. [`SlotTypeStatus`] wraps it as a [`StateRefresh`] so
//! [`strata_provider::wait_for_state`] can poll until the slot type exists.

use std::future::Future;

use async_trait::async_trait;
use aws_sdk_lexmodelbuilding::operation::get_slot_type_versions::GetSlotTypeVersionsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strata_provider::schema::{Attribute, AttributeType, Schema};
use strata_provider::{ProviderError, Refresh, ResourceLookup, StateRefresh};
use tracing::{debug, error, info, instrument, warn};

use crate::auth::build_sdk_config;
use crate::config::AwsBaseConfig;
use crate::error::{AwsProviderError, classify_sdk_error};

/// Resource type served by [`LexProvider`]'s [`ResourceLookup`] implementation.
pub const SLOT_TYPE_STATUS: &str = "slot_type_status";

/// State reported by the slot type probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LexStatus {
    Created,
    NotFound,
    Unknown,
}

impl LexStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::NotFound => "NotFound",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for LexStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published version of a slot type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTypeVersion {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_updated_date: Option<DateTime<Utc>>,
}

impl From<&aws_sdk_lexmodelbuilding::types::SlotTypeMetadata> for SlotTypeVersion {
    fn from(m: &aws_sdk_lexmodelbuilding::types::SlotTypeMetadata) -> Self {
        Self {
            name: m.name().map(str::to_owned),
            description: m.description().map(str::to_owned),
            version: m.version().map(str::to_owned),
            created_date: m.created_date().and_then(to_chrono),
            last_updated_date: m.last_updated_date().and_then(to_chrono),
        }
    }
}

fn to_chrono(dt: &aws_sdk_lexmodelbuilding::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

/// The `GetSlotTypeVersions` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTypeVersions {
    pub slot_types: Vec<SlotTypeVersion>,
    pub next_token: Option<String>,
}

/// The remote query interface the probe depends on.
pub trait SlotTypeVersionsApi: Send + Sync {
    /// List the versions of slot type `name`.
    ///
    /// A slot type the service does not know must be reported as
    /// [`AwsProviderError::NotFound`].
    fn slot_type_versions(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<SlotTypeVersions, AwsProviderError>> + Send;
}

impl SlotTypeVersionsApi for aws_sdk_lexmodelbuilding::Client {
    async fn slot_type_versions(&self, name: &str) -> Result<SlotTypeVersions, AwsProviderError> {
        let output = self
            .get_slot_type_versions()
            .name(name)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(GetSlotTypeVersionsError::is_not_found_exception)
                {
                    return AwsProviderError::NotFound(format!("Lex slot type '{name}'"));
                }
                let err = classify_sdk_error(
                    &e,
                    &format!("error getting Lex slot type versions ({name})"),
                );
                error!(error = %err, "Lex get_slot_type_versions failed");
                err
            })?;

        Ok(SlotTypeVersions {
            slot_types: output
                .slot_types()
                .iter()
                .map(SlotTypeVersion::from)
                .collect(),
            next_token: output.next_token().map(str::to_owned),
        })
    }
}

/// Probe the status of slot type `name` once.
///
/// | outcome                          | value   | state      | error |
/// |----------------------------------|---------|------------|-------|
/// | not-found exception              | `None`  | `NotFound` | none  |
/// | any other failure                | `None`  | `Unknown`  | set   |
/// | response without slot types      | `None`  | `NotFound` | none  |
/// | response with slot types         | `Some`  | `Created`  | none  |
#[instrument(skip(client), fields(provider = "aws-lex"))]
pub async fn slot_type_status<C: SlotTypeVersionsApi>(
    client: &C,
    name: &str,
) -> Refresh<SlotTypeVersions> {
    match client.slot_type_versions(name).await {
        Ok(versions) if versions.slot_types.is_empty() => {
            debug!("slot type has no versions");
            Refresh::new(None, LexStatus::NotFound.as_str())
        }
        Ok(versions) => {
            debug!(versions = versions.slot_types.len(), "slot type exists");
            Refresh::new(Some(versions), LexStatus::Created.as_str())
        }
        Err(AwsProviderError::NotFound(_)) => {
            debug!("slot type not found");
            Refresh::new(None, LexStatus::NotFound.as_str())
        }
        Err(e) => {
            warn!(error = %e, "slot type status unknown");
            Refresh::failed(LexStatus::Unknown.as_str(), e.into())
        }
    }
}

/// [`StateRefresh`] over [`slot_type_status`] for one slot type.
pub struct SlotTypeStatus<'a, C> {
    client: &'a C,
    name: String,
}

impl<'a, C: SlotTypeVersionsApi> SlotTypeStatus<'a, C> {
    pub fn new(client: &'a C, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }
}

impl<C: SlotTypeVersionsApi> StateRefresh for SlotTypeStatus<'_, C> {
    type Value = SlotTypeVersions;

    async fn refresh(&self) -> Refresh<SlotTypeVersions> {
        slot_type_status(self.client, &self.name).await
    }
}

/// Configuration for the Lex lookup provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexConfig {
    #[serde(flatten)]
    pub aws: AwsBaseConfig,
}

impl LexConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            aws: AwsBaseConfig::new(region),
        }
    }

    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws.endpoint_url = Some(endpoint_url.into());
        self
    }

    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.aws.role_arn = Some(role_arn.into());
        self
    }
}

/// AWS Lex Model Building lookup provider.
pub struct LexProvider<C = aws_sdk_lexmodelbuilding::Client> {
    config: LexConfig,
    client: C,
}

impl<C> std::fmt::Debug for LexProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexProvider")
            .field("config", &self.config)
            .field("client", &"<LexModelBuildingClient>")
            .finish()
    }
}

impl LexProvider {
    /// Create a new `LexProvider` by building an AWS SDK client.
    pub async fn new(config: LexConfig) -> Self {
        let sdk_config = build_sdk_config(&config.aws).await;
        let client = aws_sdk_lexmodelbuilding::Client::new(&sdk_config);
        Self { config, client }
    }
}

impl<C: SlotTypeVersionsApi> LexProvider<C> {
    /// Create a `LexProvider` with a pre-built client.
    pub fn with_client(config: LexConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &LexConfig {
        &self.config
    }

    /// Probe slot type `name` once.
    pub async fn slot_type_status(&self, name: &str) -> Refresh<SlotTypeVersions> {
        slot_type_status(&self.client, name).await
    }

    /// A refresher for `name`, for use with [`strata_provider::wait_for_state`].
    pub fn status_refresher(&self, name: impl Into<String>) -> SlotTypeStatus<'_, C> {
        SlotTypeStatus::new(&self.client, name)
    }
}

#[derive(Deserialize)]
struct SlotTypeParams {
    name: String,
}

#[async_trait]
impl<C: SlotTypeVersionsApi + 'static> ResourceLookup for LexProvider<C> {
    async fn lookup(
        &self,
        resource_type: &str,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        match resource_type {
            SLOT_TYPE_STATUS => {
                slot_type_status_schema().validate(params)?;
                let SlotTypeParams { name } = serde_json::from_value(params.clone())
                    .map_err(|e| ProviderError::Serialization(e.to_string()))?;

                let (value, state, error) = self.slot_type_status(&name).await.into_parts();
                if let Some(e) = error {
                    return Err(e);
                }
                info!(slot_type = %name, state = %state, "resolved Lex slot type status");

                Ok(serde_json::json!({
                    "name": name,
                    "state": state,
                    "slot_types": value.map(|v| v.slot_types).unwrap_or_default(),
                }))
            }
            other => Err(ProviderError::Configuration(format!(
                "unsupported resource type '{other}' for Lex provider \
                 (supported: '{SLOT_TYPE_STATUS}')"
            ))),
        }
    }

    fn supported_resource_types(&self) -> Vec<String> {
        vec![SLOT_TYPE_STATUS.to_owned()]
    }

    fn schema(&self, resource_type: &str) -> Option<Schema> {
        (resource_type == SLOT_TYPE_STATUS).then(slot_type_status_schema)
    }
}

/// Attribute schema of the `slot_type_status` lookup.
pub fn slot_type_status_schema() -> Schema {
    Schema::new()
        .with_attribute(
            "name",
            Attribute::required(AttributeType::String).with_description("Slot type name."),
        )
        .with_attribute(
            "state",
            Attribute::computed(AttributeType::String)
                .with_description("`Created`, `NotFound` or `Unknown`."),
        )
}
