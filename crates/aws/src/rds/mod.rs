//! RDS orderable DB instance lookup.
//!
//! Queries `DescribeOrderableDBInstanceOptions` with the caller's criteria,
//! follows the pagination marker to the end, applies the storage-type filter
//! client-side and resolves the remaining options to a single instance class.

mod criteria;
mod option;
mod pages;
mod select;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strata_provider::schema::Schema;
use strata_provider::{ProviderError, ResourceLookup};
use tracing::{debug, info, instrument};

use crate::auth::build_sdk_config;
use crate::config::AwsBaseConfig;
use crate::error::AwsProviderError;

pub use criteria::{OrderableDbInstanceCriteria, OrderableOptionQuery};
pub use option::{OrderableDbInstance, OrderableOption, orderable_db_instance_schema};
pub use pages::{OrderableOptionPage, OrderableOptionsApi, collect_options, option_pages};
pub use select::{retain_storage_type, select_option};

/// Resource type served by [`RdsProvider`]'s [`ResourceLookup`] implementation.
pub const ORDERABLE_DB_INSTANCE: &str = "orderable_db_instance";

/// Configuration for the RDS lookup provider.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RdsConfig {
    /// Shared AWS configuration (region, role ARN, endpoint URL).
    #[serde(flatten)]
    pub aws: AwsBaseConfig,

    /// Page size for `DescribeOrderableDBInstanceOptions` (20 to 100). The
    /// service default applies when unset.
    #[serde(default)]
    pub max_records: Option<i32>,
}

impl std::fmt::Debug for RdsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsConfig")
            .field("aws", &self.aws)
            .field("max_records", &self.max_records)
            .finish()
    }
}

impl RdsConfig {
    /// Create a new `RdsConfig` with the given AWS region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            aws: AwsBaseConfig::new(region),
            max_records: None,
        }
    }

    /// Set the page size used while paging through options.
    #[must_use]
    pub fn with_max_records(mut self, max_records: i32) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Set the endpoint URL override (for `LocalStack`).
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the IAM role ARN to assume.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.aws.role_arn = Some(role_arn.into());
        self
    }

    /// Set the STS session name for assume-role.
    #[must_use]
    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.aws.session_name = Some(session_name.into());
        self
    }

    /// Set the external ID for cross-account trust policies.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.aws.external_id = Some(external_id.into());
        self
    }

    fn validate(&self) -> Result<(), AwsProviderError> {
        match self.max_records {
            Some(n) if !(20..=100).contains(&n) => Err(AwsProviderError::Configuration(format!(
                "max_records must be between 20 and 100, got {n}"
            ))),
            _ => Ok(()),
        }
    }
}

/// AWS RDS lookup provider.
pub struct RdsProvider<C = aws_sdk_rds::Client> {
    config: RdsConfig,
    client: C,
}

impl<C> std::fmt::Debug for RdsProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsProvider")
            .field("config", &self.config)
            .field("client", &"<RdsClient>")
            .finish()
    }
}

impl RdsProvider {
    /// Create a new `RdsProvider` by building an AWS SDK client.
    pub async fn new(config: RdsConfig) -> Result<Self, AwsProviderError> {
        config.validate()?;
        let sdk_config = build_sdk_config(&config.aws).await;
        let client = aws_sdk_rds::Client::new(&sdk_config);
        Ok(Self { config, client })
    }
}

impl<C: OrderableOptionsApi> RdsProvider<C> {
    /// Create an `RdsProvider` with a pre-built client.
    pub fn with_client(config: RdsConfig, client: C) -> Result<Self, AwsProviderError> {
        config.validate()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RdsConfig {
        &self.config
    }

    /// Resolve `criteria` to exactly one orderable DB instance option.
    ///
    /// Fails with [`AwsProviderError::NoMatchingOptions`] when nothing
    /// matches and [`AwsProviderError::AmbiguousOptions`] when several
    /// classes match and no preferred class is among them.
    #[instrument(skip(self, criteria), fields(provider = "aws-rds", engine = %criteria.engine))]
    pub async fn orderable_db_instance(
        &self,
        criteria: &OrderableDbInstanceCriteria,
    ) -> Result<OrderableDbInstance, AwsProviderError> {
        let query = criteria.query()?;
        debug!(?query, "reading RDS orderable DB instance options");

        let options = collect_options(&self.client, &query, self.config.max_records).await?;
        let fetched = options.len();

        let storage_type = criteria.storage_type_filter();
        let candidates = retain_storage_type(options, storage_type);
        debug!(
            fetched,
            retained = candidates.len(),
            storage_type = ?storage_type,
            "filtered RDS orderable options"
        );

        let selected = select_option(candidates, &criteria.preferred_db_instance_classes)?;
        info!(
            db_instance_class = %selected.db_instance_class,
            storage_type = ?selected.storage_type,
            "resolved RDS orderable DB instance option"
        );

        Ok(selected.into())
    }

    /// Verify the RDS API is reachable by reading one page of MySQL options.
    #[instrument(skip(self), fields(provider = "aws-rds"))]
    pub async fn health_check(&self) -> Result<(), AwsProviderError> {
        debug!("performing RDS health check via describe_orderable_db_instance_options");
        let query = OrderableDbInstanceCriteria::new("mysql").query()?;
        self.client
            .describe_orderable_options(&query, Some(20), None)
            .await?;
        info!("RDS health check passed");
        Ok(())
    }
}

#[async_trait]
impl<C: OrderableOptionsApi + 'static> ResourceLookup for RdsProvider<C> {
    async fn lookup(
        &self,
        resource_type: &str,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        match resource_type {
            ORDERABLE_DB_INSTANCE => {
                orderable_db_instance_schema().validate(params)?;
                let criteria: OrderableDbInstanceCriteria =
                    serde_json::from_value(params.clone())
                        .map_err(|e| ProviderError::Serialization(e.to_string()))?;

                let instance = self.orderable_db_instance(&criteria).await?;
                serde_json::to_value(&instance)
                    .map_err(|e| ProviderError::Serialization(e.to_string()))
            }
            other => Err(ProviderError::Configuration(format!(
                "unsupported resource type '{other}' for RDS provider \
                 (supported: '{ORDERABLE_DB_INSTANCE}')"
            ))),
        }
    }

    fn supported_resource_types(&self) -> Vec<String> {
        vec![ORDERABLE_DB_INSTANCE.to_owned()]
    }

    fn schema(&self, resource_type: &str) -> Option<Schema> {
        (resource_type == ORDERABLE_DB_INSTANCE).then(orderable_db_instance_schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::{FakeRds, option};

    fn provider(pages: Vec<Vec<OrderableOption>>) -> RdsProvider<FakeRds> {
        RdsProvider::with_client(RdsConfig::new("us-west-2"), FakeRds::new(pages)).unwrap()
    }

    #[test]
    fn config_builder_chain() {
        let config = RdsConfig::new("eu-west-1")
            .with_max_records(50)
            .with_endpoint_url("http://localhost:4566")
            .with_role_arn("arn:aws:iam::123:role/rds-read")
            .with_session_name("test-session")
            .with_external_id("ext-456");

        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.max_records, Some(50));
        assert_eq!(
            config.aws.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
        assert!(config.aws.role_arn.is_some());
        assert_eq!(config.aws.session_name.as_deref(), Some("test-session"));
        assert_eq!(config.aws.external_id.as_deref(), Some("ext-456"));
    }

    #[test]
    fn config_debug_format() {
        let config = RdsConfig::new("us-east-1").with_role_arn("arn:aws:iam::123:role/test");
        let debug = format!("{config:?}");
        assert!(debug.contains("RdsConfig"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_serde_flattens_aws() {
        let json = serde_json::json!({
            "region": "ap-southeast-1",
            "endpoint_url": "http://localhost:4566",
            "max_records": 100
        });
        let config: RdsConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.aws.region, "ap-southeast-1");
        assert_eq!(config.max_records, Some(100));
    }

    #[test]
    fn out_of_range_max_records_is_rejected() {
        let result = RdsProvider::with_client(
            RdsConfig::new("us-west-2").with_max_records(5),
            FakeRds::new(Vec::new()),
        );
        assert!(matches!(result, Err(AwsProviderError::Configuration(_))));
    }

    #[tokio::test]
    async fn single_option_is_returned_unchanged() {
        let only = option("db.t2.small", "standard");
        let provider = provider(vec![vec![only.clone()]]);

        let criteria = OrderableDbInstanceCriteria::new("mysql")
            .with_db_instance_class("db.t2.small")
            .with_engine_version("5.7.22")
            .with_license_model("general-public-license")
            .with_storage_type("standard");
        let instance = provider.orderable_db_instance(&criteria).await.unwrap();

        assert_eq!(instance.id, "db.t2.small");
        assert_eq!(instance.option, only);
    }

    #[tokio::test]
    async fn query_sent_matches_criteria() {
        let provider = provider(vec![vec![option("db.t2.small", "standard")]]);
        let criteria = OrderableDbInstanceCriteria::new("mysql")
            .with_engine_version("5.7.22")
            .with_storage_type("standard");
        provider.orderable_db_instance(&criteria).await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query.engine, "mysql");
        assert_eq!(requests[0].query.engine_version.as_deref(), Some("5.7.22"));
        assert!(requests[0].query.license_model.is_none());
        assert!(requests[0].query.vpc.is_none());
    }

    #[tokio::test]
    async fn preferred_class_across_pages() {
        let provider = provider(vec![
            vec![option("db.t3.small", "standard")],
            vec![option("db.t2.small", "standard")],
        ]);
        let criteria = OrderableDbInstanceCriteria::new("mysql")
            .with_engine_version("5.7.22")
            .with_storage_type("standard")
            .with_preferred_db_instance_classes(["db.xyz.xlarge", "db.t2.small", "db.t3.small"]);

        let instance = provider.orderable_db_instance(&criteria).await.unwrap();
        assert_eq!(instance.id, "db.t2.small");
        assert_eq!(instance.option.db_instance_class, "db.t2.small");
    }

    #[tokio::test]
    async fn storage_filter_excludes_other_types() {
        let provider = provider(vec![vec![
            option("db.t2.small", "gp2"),
            option("db.t3.small", "gp2"),
        ]]);
        let criteria = OrderableDbInstanceCriteria::new("mysql").with_storage_type("standard");

        let err = provider.orderable_db_instance(&criteria).await.unwrap_err();
        assert!(matches!(err, AwsProviderError::NoMatchingOptions));
    }

    #[tokio::test]
    async fn ambiguous_result_names_every_candidate() {
        let provider = provider(vec![
            vec![option("db.t2.small", "gp2")],
            vec![option("db.t3.small", "gp2"), option("db.m5.large", "gp2")],
        ]);
        let criteria = OrderableDbInstanceCriteria::new("mysql");

        let err = provider.orderable_db_instance(&criteria).await.unwrap_err();
        match err {
            AwsProviderError::AmbiguousOptions(classes) => {
                assert_eq!(classes, vec!["db.t2.small", "db.t3.small", "db.m5.large"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn remote_failure_is_surfaced() {
        let provider = RdsProvider::with_client(
            RdsConfig::new("us-west-2"),
            FakeRds::failing(AwsProviderError::ServiceError(
                "error reading RDS orderable DB instance options: InvalidParameterValue".into(),
            )),
        )
        .unwrap();

        let err = provider
            .orderable_db_instance(&OrderableDbInstanceCriteria::new("mysqll"))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsProviderError::ServiceError(ref msg) if msg.contains("InvalidParameterValue")));
    }

    #[tokio::test]
    async fn throttling_keeps_request_context() {
        let provider = RdsProvider::with_client(
            RdsConfig::new("us-west-2"),
            FakeRds::failing(AwsProviderError::Throttled(
                "error reading RDS orderable DB instance options: ThrottlingException: Rate exceeded"
                    .into(),
            )),
        )
        .unwrap();

        let err = provider
            .lookup(ORDERABLE_DB_INSTANCE, &serde_json::json!({ "engine": "mysql" }))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(
            err.to_string()
                .contains("error reading RDS orderable DB instance options: ThrottlingException")
        );
    }

    #[tokio::test]
    async fn blank_engine_is_user_correctable() {
        let provider = provider(vec![vec![option("db.t2.small", "standard")]]);
        let err = provider
            .lookup(ORDERABLE_DB_INSTANCE, &serde_json::json!({ "engine": "  " }))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.is_user_correctable());
        assert!(provider.client.requests().is_empty());
    }

    #[tokio::test]
    async fn health_check_reads_one_page() {
        let provider = provider(vec![
            vec![option("db.t2.small", "standard")],
            vec![option("db.t3.small", "gp2")],
        ]);
        provider.health_check().await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query.engine, "mysql");
        assert_eq!(requests[0].max_records, Some(20));
    }

    #[tokio::test]
    async fn lookup_returns_flat_json() {
        let provider = provider(vec![vec![option("db.t2.small", "standard")]]);
        let params = serde_json::json!({
            "engine": "mysql",
            "engine_version": "5.7.22",
            "storage_type": "standard"
        });

        let value = provider.lookup(ORDERABLE_DB_INSTANCE, &params).await.unwrap();
        assert_eq!(value["id"], "db.t2.small");
        assert_eq!(value["db_instance_class"], "db.t2.small");
        assert_eq!(value["engine_version"], "5.7.22");
        assert_eq!(value["availability_zones"][0], "us-west-2a");
    }

    #[tokio::test]
    async fn lookup_rejects_computed_attributes() {
        let provider = provider(vec![vec![option("db.t2.small", "standard")]]);
        let params = serde_json::json!({ "engine": "mysql", "max_storage_size": 100 });

        let err = provider.lookup(ORDERABLE_DB_INSTANCE, &params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(provider.client.requests().is_empty());
    }

    #[tokio::test]
    async fn lookup_maps_no_match() {
        let provider = provider(vec![vec![]]);
        let params = serde_json::json!({ "engine": "mysql" });

        let err = provider.lookup(ORDERABLE_DB_INSTANCE, &params).await.unwrap_err();
        assert!(matches!(err, ProviderError::NoMatch(_)));
    }

    #[tokio::test]
    async fn lookup_unsupported_resource_type() {
        let provider = provider(Vec::new());
        let err = provider
            .lookup("db_cluster", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(ref msg) if msg.contains("db_cluster")));
    }

    #[test]
    fn supported_types_and_schema() {
        let provider = provider(Vec::new());
        assert_eq!(
            provider.supported_resource_types(),
            vec![ORDERABLE_DB_INSTANCE.to_owned()]
        );
        assert!(provider.schema(ORDERABLE_DB_INSTANCE).is_some());
        assert!(provider.schema("db_cluster").is_none());
    }
}
