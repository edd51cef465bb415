use std::sync::Mutex;

use super::criteria::OrderableOptionQuery;
use super::option::OrderableOption;
use super::pages::{OrderableOptionPage, OrderableOptionsApi};
use crate::error::AwsProviderError;

/// A request the fake received.
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub query: OrderableOptionQuery,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

/// In-memory RDS double. Markers are page indexes.
pub(crate) struct FakeRds {
    pages: Vec<Vec<OrderableOption>>,
    failure: Option<AwsProviderError>,
    requests: Mutex<Vec<Request>>,
}

impl FakeRds {
    pub(crate) fn new(pages: Vec<Vec<OrderableOption>>) -> Self {
        Self {
            pages,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: AwsProviderError) -> Self {
        Self {
            pages: Vec::new(),
            failure: Some(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl OrderableOptionsApi for FakeRds {
    async fn describe_orderable_options(
        &self,
        query: &OrderableOptionQuery,
        max_records: Option<i32>,
        marker: Option<String>,
    ) -> Result<OrderableOptionPage, AwsProviderError> {
        self.requests.lock().unwrap().push(Request {
            query: query.clone(),
            max_records,
            marker: marker.clone(),
        });

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let index = marker.map_or(0, |m| m.parse::<usize>().unwrap());
        let options = self.pages.get(index).cloned().unwrap_or_default();
        let marker = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(OrderableOptionPage { options, marker })
    }
}

/// A MySQL 5.7 option of `class` with `storage_type`.
pub(crate) fn option(class: &str, storage_type: &str) -> OrderableOption {
    OrderableOption {
        db_instance_class: class.to_owned(),
        engine: Some("mysql".to_owned()),
        engine_version: Some("5.7.22".to_owned()),
        license_model: Some("general-public-license".to_owned()),
        storage_type: Some(storage_type.to_owned()),
        availability_zones: vec!["us-west-2a".to_owned(), "us-west-2b".to_owned()],
        multi_az_capable: Some(true),
        read_replica_capable: Some(true),
        vpc: Some(true),
        ..OrderableOption::default()
    }
}
