use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, error};

use super::criteria::OrderableOptionQuery;
use super::option::OrderableOption;
use crate::error::{AwsProviderError, classify_sdk_error};

/// One page of `DescribeOrderableDBInstanceOptions` results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderableOptionPage {
    pub options: Vec<OrderableOption>,
    /// Cursor for the next page; `None` on the last page.
    pub marker: Option<String>,
}

/// The remote query interface the resolver depends on.
///
/// Implemented for [`aws_sdk_rds::Client`]; tests substitute their own.
pub trait OrderableOptionsApi: Send + Sync {
    /// Fetch the page of options starting at `marker` (`None` for the first).
    fn describe_orderable_options(
        &self,
        query: &OrderableOptionQuery,
        max_records: Option<i32>,
        marker: Option<String>,
    ) -> impl Future<Output = Result<OrderableOptionPage, AwsProviderError>> + Send;
}

impl OrderableOptionsApi for aws_sdk_rds::Client {
    async fn describe_orderable_options(
        &self,
        query: &OrderableOptionQuery,
        max_records: Option<i32>,
        marker: Option<String>,
    ) -> Result<OrderableOptionPage, AwsProviderError> {
        let output = self
            .describe_orderable_db_instance_options()
            .engine(&query.engine)
            .set_availability_zone_group(query.availability_zone_group.clone())
            .set_db_instance_class(query.db_instance_class.clone())
            .set_engine_version(query.engine_version.clone())
            .set_license_model(query.license_model.clone())
            .set_vpc(query.vpc)
            .set_max_records(max_records)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| {
                let err = classify_sdk_error(&e, "error reading RDS orderable DB instance options");
                error!(error = %err, "RDS describe_orderable_db_instance_options failed");
                err
            })?;

        Ok(OrderableOptionPage {
            options: output
                .orderable_db_instance_options()
                .iter()
                .map(OrderableOption::from)
                .collect(),
            marker: output.marker().map(str::to_owned),
        })
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily page through every option matching `query`, in arrival order.
pub fn option_pages<'a, C: OrderableOptionsApi>(
    client: &'a C,
    query: &'a OrderableOptionQuery,
    max_records: Option<i32>,
) -> impl Stream<Item = Result<Vec<OrderableOption>, AwsProviderError>> + Send + 'a {
    stream::try_unfold(Cursor::Start, move |cursor| async move {
        let marker = match cursor {
            Cursor::Start => None,
            Cursor::Next(marker) => Some(marker),
            Cursor::Done => return Ok::<_, AwsProviderError>(None),
        };

        let page = client
            .describe_orderable_options(query, max_records, marker)
            .await?;
        debug!(
            options = page.options.len(),
            has_more = page.marker.is_some(),
            "fetched RDS orderable options page"
        );

        let next = match page.marker {
            Some(marker) if !marker.is_empty() => Cursor::Next(marker),
            _ => Cursor::Done,
        };
        Ok::<_, AwsProviderError>(Some((page.options, next)))
    })
}

/// Drain [`option_pages`] into a single list.
pub async fn collect_options<C: OrderableOptionsApi>(
    client: &C,
    query: &OrderableOptionQuery,
    max_records: Option<i32>,
) -> Result<Vec<OrderableOption>, AwsProviderError> {
    option_pages(client, query, max_records)
        .try_fold(Vec::new(), |mut all, page| async move {
            all.extend(page);
            Ok::<_, AwsProviderError>(all)
        })
        .await
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::rds::testing::{FakeRds, option};

    fn query() -> OrderableOptionQuery {
        OrderableOptionQuery {
            engine: "mysql".to_owned(),
            ..OrderableOptionQuery::default()
        }
    }

    #[tokio::test]
    async fn follows_markers_in_order() {
        let fake = FakeRds::new(vec![
            vec![option("db.t2.small", "standard")],
            vec![option("db.t3.small", "gp2"), option("db.m5.large", "gp2")],
            vec![option("db.r5.large", "io1")],
        ]);

        let options = collect_options(&fake, &query(), Some(100)).await.unwrap();
        let classes: Vec<_> = options.iter().map(|o| o.db_instance_class.as_str()).collect();
        assert_eq!(
            classes,
            vec!["db.t2.small", "db.t3.small", "db.m5.large", "db.r5.large"]
        );

        let markers: Vec<_> = fake.requests().into_iter().map(|r| r.marker).collect();
        assert_eq!(
            markers,
            vec![None, Some("1".to_owned()), Some("2".to_owned())]
        );
        assert!(fake.requests().iter().all(|r| r.max_records == Some(100)));
    }

    #[tokio::test]
    async fn pages_are_lazy() {
        let fake = FakeRds::new(vec![
            vec![option("db.t2.small", "standard")],
            vec![option("db.t3.small", "gp2")],
        ]);

        let query = query();
        let mut pages = Box::pin(option_pages(&fake, &query, None));
        let first = pages.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(fake.requests().len(), 1);

        let second = pages.next().await.unwrap().unwrap();
        assert_eq!(second[0].db_instance_class, "db.t3.small");
        assert!(pages.next().await.is_none());
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn empty_result_is_one_empty_page() {
        let fake = FakeRds::new(vec![]);
        let options = collect_options(&fake, &query(), None).await.unwrap();
        assert!(options.is_empty());
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn remote_failure_stops_paging() {
        let fake = FakeRds::failing(AwsProviderError::Throttled(
            "error reading RDS orderable DB instance options: ThrottlingException".into(),
        ));
        let err = collect_options(&fake, &query(), None).await.unwrap_err();
        assert!(matches!(err, AwsProviderError::Throttled(_)));
        assert_eq!(fake.requests().len(), 1);
    }
}
