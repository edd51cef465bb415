use serde::{Deserialize, Serialize};
use strata_provider::schema::{Attribute, AttributeType, Schema};

/// One engine / version / instance class / storage type combination offered
/// by RDS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderableOption {
    pub availability_zone_group: Option<String>,
    pub availability_zones: Vec<String>,
    pub db_instance_class: String,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub license_model: Option<String>,
    pub max_iops_per_db_instance: Option<i32>,
    pub max_iops_per_gib: Option<f64>,
    pub max_storage_size: Option<i32>,
    pub min_iops_per_db_instance: Option<i32>,
    pub min_iops_per_gib: Option<f64>,
    pub min_storage_size: Option<i32>,
    pub multi_az_capable: Option<bool>,
    pub outpost_capable: Option<bool>,
    pub read_replica_capable: Option<bool>,
    pub storage_type: Option<String>,
    pub supported_engine_modes: Vec<String>,
    pub supports_enhanced_monitoring: Option<bool>,
    pub supports_global_databases: Option<bool>,
    pub supports_iam_database_authentication: Option<bool>,
    pub supports_iops: Option<bool>,
    pub supports_kerberos_authentication: Option<bool>,
    pub supports_performance_insights: Option<bool>,
    pub supports_storage_autoscaling: Option<bool>,
    pub supports_storage_encryption: Option<bool>,
    pub vpc: Option<bool>,
}

impl From<&aws_sdk_rds::types::OrderableDbInstanceOption> for OrderableOption {
    fn from(o: &aws_sdk_rds::types::OrderableDbInstanceOption) -> Self {
        Self {
            availability_zone_group: o.availability_zone_group().map(str::to_owned),
            availability_zones: o
                .availability_zones()
                .iter()
                .filter_map(|az| az.name().map(str::to_owned))
                .collect(),
            db_instance_class: o.db_instance_class().unwrap_or_default().to_owned(),
            engine: o.engine().map(str::to_owned),
            engine_version: o.engine_version().map(str::to_owned),
            license_model: o.license_model().map(str::to_owned),
            max_iops_per_db_instance: o.max_iops_per_db_instance(),
            max_iops_per_gib: o.max_iops_per_gib(),
            max_storage_size: o.max_storage_size(),
            min_iops_per_db_instance: o.min_iops_per_db_instance(),
            min_iops_per_gib: o.min_iops_per_gib(),
            min_storage_size: o.min_storage_size(),
            multi_az_capable: o.multi_az_capable(),
            outpost_capable: o.outpost_capable(),
            read_replica_capable: o.read_replica_capable(),
            storage_type: o.storage_type().map(str::to_owned),
            supported_engine_modes: o.supported_engine_modes().to_vec(),
            supports_enhanced_monitoring: o.supports_enhanced_monitoring(),
            supports_global_databases: o.supports_global_databases(),
            supports_iam_database_authentication: o.supports_iam_database_authentication(),
            supports_iops: o.supports_iops(),
            supports_kerberos_authentication: o.supports_kerberos_authentication(),
            supports_performance_insights: o.supports_performance_insights(),
            supports_storage_autoscaling: o.supports_storage_autoscaling(),
            supports_storage_encryption: o.supports_storage_encryption(),
            vpc: o.vpc(),
        }
    }
}

/// The resolved lookup result: the selected option plus its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderableDbInstance {
    /// Always the selected instance class.
    pub id: String,
    #[serde(flatten)]
    pub option: OrderableOption,
}

impl From<OrderableOption> for OrderableDbInstance {
    fn from(option: OrderableOption) -> Self {
        Self {
            id: option.db_instance_class.clone(),
            option,
        }
    }
}

/// Attribute schema of the `orderable_db_instance` lookup.
pub fn orderable_db_instance_schema() -> Schema {
    use AttributeType::{Bool, Float, Int, String, StringList};

    Schema::new()
        .with_attribute("id", Attribute::computed(String))
        .with_attribute(
            "availability_zone_group",
            Attribute::optional_computed(String),
        )
        .with_attribute("availability_zones", Attribute::computed(StringList))
        .with_attribute(
            "db_instance_class",
            Attribute::optional_computed(String).with_description("DB instance class, e.g. `db.t3.small`."),
        )
        .with_attribute(
            "engine",
            Attribute::required(String).with_description("Database engine, e.g. `mysql`."),
        )
        .with_attribute("engine_version", Attribute::optional_computed(String))
        .with_attribute("license_model", Attribute::optional_computed(String))
        .with_attribute("max_iops_per_db_instance", Attribute::computed(Int))
        .with_attribute("max_iops_per_gib", Attribute::computed(Float))
        .with_attribute("max_storage_size", Attribute::computed(Int))
        .with_attribute("min_iops_per_db_instance", Attribute::computed(Int))
        .with_attribute("min_iops_per_gib", Attribute::computed(Float))
        .with_attribute("min_storage_size", Attribute::computed(Int))
        .with_attribute("multi_az_capable", Attribute::computed(Bool))
        .with_attribute("outpost_capable", Attribute::computed(Bool))
        .with_attribute(
            "preferred_db_instance_classes",
            Attribute::optional(StringList)
                .with_description("Ordered instance classes; the first one offered is selected."),
        )
        .with_attribute("read_replica_capable", Attribute::computed(Bool))
        .with_attribute(
            "storage_type",
            Attribute::optional_computed(String)
                .with_description("Exact storage type, matched after retrieval."),
        )
        .with_attribute("supported_engine_modes", Attribute::computed(StringList))
        .with_attribute("supports_enhanced_monitoring", Attribute::computed(Bool))
        .with_attribute("supports_global_databases", Attribute::computed(Bool))
        .with_attribute(
            "supports_iam_database_authentication",
            Attribute::computed(Bool),
        )
        .with_attribute("supports_iops", Attribute::computed(Bool))
        .with_attribute("supports_kerberos_authentication", Attribute::computed(Bool))
        .with_attribute("supports_performance_insights", Attribute::computed(Bool))
        .with_attribute("supports_storage_autoscaling", Attribute::computed(Bool))
        .with_attribute("supports_storage_encryption", Attribute::computed(Bool))
        .with_attribute("vpc", Attribute::optional_computed(Bool))
}
