//! Cluster view models and the fleet health aggregator
//!
//! Listing the fleet is a two step flow: one call for the inventory, then one
//! health request per cluster. The health requests run concurrently and each
//! outcome is captured independently; a cluster whose health endpoint is
//! unreachable is shown as not connected instead of failing the listing.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use farwatch_common::{CapabilityRef, ClusterRecord, HealthResponse};

use crate::client::{ApiClient, Result};

/// The two management calls the aggregator needs.
#[async_trait]
pub trait ClusterSource {
    async fn list_clusters(&self) -> Result<Vec<ClusterRecord>>;
    async fn cluster_health(&self, id: &str) -> Result<HealthResponse>;
}

#[async_trait]
impl ClusterSource for ApiClient {
    async fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        ApiClient::list_clusters(self).await
    }

    async fn cluster_health(&self, id: &str) -> Result<HealthResponse> {
        ApiClient::cluster_health(self, id).await
    }
}

/// A cluster with its identity and best-effort health, as rendered by the
/// fleet listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    record: ClusterRecord,
    health: HealthResponse,
}

impl Cluster {
    pub fn new(record: ClusterRecord, health: HealthResponse) -> Self {
        Self { record, health }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Display name from the reserved name label, falling back to the id.
    pub fn name(&self) -> &str {
        self.record.display_name()
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        &self.record.metadata.labels
    }

    pub fn capabilities(&self) -> &[CapabilityRef] {
        &self.record.metadata.capabilities
    }

    pub fn record(&self) -> &ClusterRecord {
        &self.record
    }

    pub fn connected(&self) -> bool {
        self.health.status.connected
    }

    pub fn ready(&self) -> bool {
        self.health.health.ready
    }

    pub fn conditions(&self) -> &[String] {
        &self.health.health.conditions
    }
}

/// Fetch the full cluster list with per-cluster health attached.
///
/// The inventory call propagates failures. The per-cluster health calls do
/// not: all of them are issued concurrently and awaited to completion, and a
/// failed one is replaced by [`HealthResponse::not_connected`]. The result
/// preserves the inventory's order and cardinality.
pub async fn fetch_clusters<S: ClusterSource + Sync>(source: &S) -> Result<Vec<Cluster>> {
    let records = source.list_clusters().await?;
    let healths = join_all(records.iter().map(|record| source.cluster_health(&record.id))).await;
    Ok(merge_health(records, healths))
}

/// Pair each cluster record with its health outcome, substituting the
/// fallback value for failed health checks.
pub fn merge_health(
    records: Vec<ClusterRecord>,
    healths: Vec<Result<HealthResponse>>,
) -> Vec<Cluster> {
    records
        .into_iter()
        .zip(healths)
        .map(|(record, health)| {
            let health = match health {
                Ok(health) => health,
                Err(err) => {
                    warn!(cluster = %record.id, %err, "health check failed, showing as not connected");
                    HealthResponse::not_connected()
                }
            };
            Cluster::new(record, health)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use farwatch_common::{ClusterMetadata, ConnectionStatus, HealthInfo, NAME_LABEL};
    use mockall::mock;
    use mockall::predicate::eq;

    use crate::client::Error;

    mock! {
        pub Source {}
        #[async_trait]
        impl ClusterSource for Source {
            async fn list_clusters(&self) -> Result<Vec<ClusterRecord>>;
            async fn cluster_health(&self, id: &str) -> Result<HealthResponse>;
        }
    }

    pub(crate) fn record(id: &str) -> ClusterRecord {
        ClusterRecord {
            id: id.to_string(),
            metadata: ClusterMetadata::default(),
        }
    }

    fn healthy() -> HealthResponse {
        HealthResponse {
            status: ConnectionStatus { connected: true },
            health: HealthInfo {
                ready: true,
                conditions: vec![],
            },
        }
    }

    fn unreachable() -> Error {
        Error::Api {
            status: 503,
            message: "agent unreachable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_are_independent() {
        let mut source = MockSource::new();
        source
            .expect_list_clusters()
            .returning(|| Ok(vec![record("a"), record("b")]));
        source
            .expect_cluster_health()
            .with(eq("a"))
            .times(1)
            .returning(|_| Ok(healthy()));
        source
            .expect_cluster_health()
            .with(eq("b"))
            .times(1)
            .returning(|_| Err(unreachable()));

        let clusters = fetch_clusters(&source).await.unwrap();
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].id(), "a");
        assert!(clusters[0].connected());
        assert!(clusters[0].ready());

        assert_eq!(clusters[1].id(), "b");
        assert!(!clusters[1].connected());
        assert!(!clusters[1].ready());
        assert!(clusters[1].conditions().is_empty());
    }

    #[tokio::test]
    async fn test_all_failures_yield_exact_fallback() {
        let mut source = MockSource::new();
        source
            .expect_list_clusters()
            .returning(|| Ok(vec![record("a"), record("b"), record("c")]));
        source
            .expect_cluster_health()
            .times(3)
            .returning(|_| Err(unreachable()));

        let clusters = fetch_clusters(&source).await.unwrap();
        assert_eq!(clusters.len(), 3);
        for cluster in &clusters {
            assert_eq!(cluster.health, HealthResponse::not_connected());
        }
    }

    #[tokio::test]
    async fn test_empty_list_issues_no_health_requests() {
        let mut source = MockSource::new();
        source.expect_list_clusters().returning(|| Ok(vec![]));
        source.expect_cluster_health().times(0);

        let clusters = fetch_clusters(&source).await.unwrap();
        assert!(clusters.is_empty());
    }

    #[tokio::test]
    async fn test_order_and_cardinality_preserved() {
        let ids = ["e", "a", "d", "b", "c"];
        let mut source = MockSource::new();
        source
            .expect_list_clusters()
            .returning(move || Ok(ids.iter().map(|id| record(id)).collect()));
        source
            .expect_cluster_health()
            .times(5)
            .returning(|id| {
                if id == "d" {
                    Err(unreachable())
                } else {
                    Ok(healthy())
                }
            });

        let clusters = fetch_clusters(&source).await.unwrap();
        let got: Vec<&str> = clusters.iter().map(Cluster::id).collect();
        assert_eq!(got, ids);
        assert!(!clusters[2].connected());
        assert!(clusters[3].connected());
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let mut source = MockSource::new();
        source
            .expect_list_clusters()
            .returning(|| Err(unreachable()));
        source.expect_cluster_health().times(0);

        assert!(fetch_clusters(&source).await.is_err());
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_structurally_equal() {
        fn source() -> MockSource {
            let mut source = MockSource::new();
            source
                .expect_list_clusters()
                .returning(|| Ok(vec![record("a"), record("b")]));
            source.expect_cluster_health().returning(|id| {
                if id == "b" {
                    Err(unreachable())
                } else {
                    Ok(healthy())
                }
            });
            source
        }

        let first = fetch_clusters(&source()).await.unwrap();
        let second = fetch_clusters(&source()).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cluster_name_prefers_label() {
        let mut named = record("c-1");
        named
            .metadata
            .labels
            .insert(NAME_LABEL.to_string(), "edge-east".to_string());
        let cluster = Cluster::new(named, HealthResponse::not_connected());
        assert_eq!(cluster.name(), "edge-east");

        let cluster = Cluster::new(record("c-2"), HealthResponse::not_connected());
        assert_eq!(cluster.name(), "c-2");
    }
}
