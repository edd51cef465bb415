use serde::{Deserialize, Serialize};

use crate::error::AwsProviderError;

/// Caller criteria for an orderable DB instance lookup.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderableDbInstanceCriteria {
    pub availability_zone_group: Option<String>,
    pub db_instance_class: Option<String>,
    pub engine: String,
    pub engine_version: Option<String>,
    pub license_model: Option<String>,
    /// Client-side filter; RDS has no server-side storage type filter.
    pub storage_type: Option<String>,
    /// Tie-break among matching options; earlier entries win.
    #[serde(default)]
    pub preferred_db_instance_classes: Vec<String>,
    pub vpc: Option<bool>,
}

/// The server-side filters actually sent to `DescribeOrderableDBInstanceOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderableOptionQuery {
    pub engine: String,
    pub availability_zone_group: Option<String>,
    pub db_instance_class: Option<String>,
    pub engine_version: Option<String>,
    pub license_model: Option<String>,
    pub vpc: Option<bool>,
}

fn supplied(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl OrderableDbInstanceCriteria {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_availability_zone_group(mut self, group: impl Into<String>) -> Self {
        self.availability_zone_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_db_instance_class(mut self, class: impl Into<String>) -> Self {
        self.db_instance_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_license_model(mut self, license_model: impl Into<String>) -> Self {
        self.license_model = Some(license_model.into());
        self
    }

    #[must_use]
    pub fn with_storage_type(mut self, storage_type: impl Into<String>) -> Self {
        self.storage_type = Some(storage_type.into());
        self
    }

    #[must_use]
    pub fn with_preferred_db_instance_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_db_instance_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_vpc(mut self, vpc: bool) -> Self {
        self.vpc = Some(vpc);
        self
    }

    /// The storage type to filter on, if one was supplied.
    pub fn storage_type_filter(&self) -> Option<&str> {
        self.storage_type.as_deref().filter(|s| !s.is_empty())
    }

    /// Build the remote query from the supplied criteria.
    pub fn query(&self) -> Result<OrderableOptionQuery, AwsProviderError> {
        if self.engine.trim().is_empty() {
            return Err(AwsProviderError::InvalidPayload(
                "engine must not be empty".to_owned(),
            ));
        }

        Ok(OrderableOptionQuery {
            engine: self.engine.clone(),
            availability_zone_group: supplied(self.availability_zone_group.as_ref()),
            db_instance_class: supplied(self.db_instance_class.as_ref()),
            engine_version: supplied(self.engine_version.as_ref()),
            license_model: supplied(self.license_model.as_ref()),
            vpc: self.vpc,
        })
    }
}
