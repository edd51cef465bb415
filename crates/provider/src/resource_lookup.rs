use async_trait::async_trait;

use crate::ProviderError;
use crate::schema::Schema;

/// Trait for providers that can look up external resource state.
///
/// A lookup is read-only: it translates caller parameters into a remote
/// query and returns the resolved resource as JSON.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Look up a resource by type and parameters.
    ///
    /// Returns a JSON object containing the resolved resource attributes.
    async fn lookup(
        &self,
        resource_type: &str,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Returns the list of resource types this provider supports.
    fn supported_resource_types(&self) -> Vec<String>;

    /// Returns the attribute schema of `resource_type`, if it is supported
    /// and described.
    fn schema(&self, _resource_type: &str) -> Option<Schema> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::{Attribute, AttributeType};

    /// Echoes its parameters back for the single `echo` resource type.
    struct EchoLookup;

    #[async_trait]
    impl ResourceLookup for EchoLookup {
        async fn lookup(
            &self,
            resource_type: &str,
            params: &serde_json::Value,
        ) -> Result<serde_json::Value, ProviderError> {
            match resource_type {
                "echo" => Ok(params.clone()),
                other => Err(ProviderError::NotFound(format!(
                    "unsupported resource type '{other}'"
                ))),
            }
        }

        fn supported_resource_types(&self) -> Vec<String> {
            vec!["echo".to_owned()]
        }

        fn schema(&self, resource_type: &str) -> Option<Schema> {
            (resource_type == "echo").then(|| {
                Schema::new().with_attribute("value", Attribute::required(AttributeType::String))
            })
        }
    }

    /// Relies on the default `schema` implementation.
    struct BareLookup;

    #[async_trait]
    impl ResourceLookup for BareLookup {
        async fn lookup(
            &self,
            _resource_type: &str,
            _params: &serde_json::Value,
        ) -> Result<serde_json::Value, ProviderError> {
            Ok(serde_json::Value::Null)
        }

        fn supported_resource_types(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn dyn_lookup_dispatch() {
        let lookup: Arc<dyn ResourceLookup> = Arc::new(EchoLookup);
        let params = serde_json::json!({ "value": "hello" });
        let resp = lookup.lookup("echo", &params).await.unwrap();
        assert_eq!(resp, params);

        let err = lookup.lookup("other", &params).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn schema_lookup() {
        assert!(EchoLookup.schema("echo").is_some());
        assert!(EchoLookup.schema("other").is_none());
        assert!(BareLookup.schema("anything").is_none());
    }
}
