//! Per-cluster capability status derivation
//!
//! A capability's install state is not served directly; it is derived from
//! the capability entries carried by each cluster record, optionally refined
//! by the uninstall task status.

use farwatch_common::{CapabilityKind, TaskState, UninstallStatus};

use crate::client::Result;
use crate::cluster::{fetch_clusters, Cluster, ClusterSource};

/// Install state of one capability on one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
    NotInstalled,
    Installed,
    Uninstalling,
    UninstallFailed,
}

impl std::fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not installed"),
            Self::Installed => write!(f, "installed"),
            Self::Uninstalling => write!(f, "uninstalling"),
            Self::UninstallFailed => write!(f, "uninstall failed"),
        }
    }
}

/// One capability's status on one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    pub kind: CapabilityKind,
    pub cluster_id: String,
    pub cluster_name: String,
    pub state: CapabilityState,
}

impl Capability {
    /// Derive the capability state from a cluster's capability entries. A
    /// missing entry means the capability is not installed; an entry with a
    /// deletion timestamp is being torn down.
    pub fn derive(kind: CapabilityKind, cluster: &Cluster) -> Self {
        let state = match cluster.record().capability(kind.as_str()) {
            None => CapabilityState::NotInstalled,
            Some(entry) if entry.deletion_timestamp.is_some() => CapabilityState::Uninstalling,
            Some(_) => CapabilityState::Installed,
        };
        Self {
            kind,
            cluster_id: cluster.id().to_string(),
            cluster_name: cluster.name().to_string(),
            state,
        }
    }

    /// Refine an `Uninstalling` state with the uninstall task's progress.
    /// Other states are left untouched.
    pub fn refine(mut self, status: &UninstallStatus) -> Self {
        if self.state == CapabilityState::Uninstalling {
            self.state = match status.state {
                TaskState::Failed => CapabilityState::UninstallFailed,
                TaskState::Completed => CapabilityState::NotInstalled,
                TaskState::Canceled => CapabilityState::Installed,
                TaskState::Pending | TaskState::Running | TaskState::Unknown => {
                    CapabilityState::Uninstalling
                }
            };
        }
        self
    }
}

/// One status object per cluster for the requested capability type, in
/// cluster-list order. A failure of the underlying cluster fetch propagates;
/// there is no partial capability list.
pub async fn capabilities_for<S: ClusterSource + Sync>(
    kind: CapabilityKind,
    source: &S,
) -> Result<Vec<Capability>> {
    let clusters = fetch_clusters(source).await?;
    Ok(clusters
        .iter()
        .map(|cluster| Capability::derive(kind, cluster))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use farwatch_common::{CapabilityRef, ClusterMetadata, ClusterRecord, HealthResponse};

    use crate::client::Error;
    use crate::cluster::tests::MockSource;

    fn cluster_with(id: &str, capabilities: Vec<CapabilityRef>) -> Cluster {
        Cluster::new(
            ClusterRecord {
                id: id.to_string(),
                metadata: ClusterMetadata {
                    labels: HashMap::new(),
                    capabilities,
                },
            },
            HealthResponse::not_connected(),
        )
    }

    fn entry(name: &str, deletion_timestamp: Option<&str>) -> CapabilityRef {
        CapabilityRef {
            name: name.to_string(),
            deletion_timestamp: deletion_timestamp.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_entry_defaults_to_not_installed() {
        let cluster = cluster_with("a", vec![entry("logging", None)]);
        let cap = Capability::derive(CapabilityKind::Monitoring, &cluster);
        assert_eq!(cap.state, CapabilityState::NotInstalled);
        assert_eq!(cap.cluster_id, "a");
    }

    #[test]
    fn test_entry_states() {
        let cluster = cluster_with(
            "a",
            vec![
                entry("logging", None),
                entry("monitoring", Some("2026-01-01T00:00:00Z")),
            ],
        );
        assert_eq!(
            Capability::derive(CapabilityKind::Logging, &cluster).state,
            CapabilityState::Installed
        );
        assert_eq!(
            Capability::derive(CapabilityKind::Monitoring, &cluster).state,
            CapabilityState::Uninstalling
        );
    }

    #[test]
    fn test_refine_maps_task_outcomes() {
        let cluster = cluster_with("a", vec![entry("logging", Some("2026-01-01T00:00:00Z"))]);
        let uninstalling = Capability::derive(CapabilityKind::Logging, &cluster);

        let status = |state| UninstallStatus {
            state,
            metadata: HashMap::new(),
        };

        assert_eq!(
            uninstalling.clone().refine(&status(TaskState::Failed)).state,
            CapabilityState::UninstallFailed
        );
        assert_eq!(
            uninstalling.clone().refine(&status(TaskState::Canceled)).state,
            CapabilityState::Installed
        );
        assert_eq!(
            uninstalling.clone().refine(&status(TaskState::Completed)).state,
            CapabilityState::NotInstalled
        );
        assert_eq!(
            uninstalling.clone().refine(&status(TaskState::Running)).state,
            CapabilityState::Uninstalling
        );

        // Refinement never touches a capability that is not uninstalling.
        let installed = Capability::derive(
            CapabilityKind::Logging,
            &cluster_with("a", vec![entry("logging", None)]),
        );
        assert_eq!(
            installed.refine(&status(TaskState::Failed)).state,
            CapabilityState::Installed
        );
    }

    #[tokio::test]
    async fn test_one_capability_per_cluster_in_order() {
        let mut source = MockSource::new();
        source.expect_list_clusters().returning(|| {
            Ok(vec![
                ClusterRecord {
                    id: "a".to_string(),
                    metadata: ClusterMetadata {
                        labels: HashMap::new(),
                        capabilities: vec![CapabilityRef {
                            name: "logging".to_string(),
                            deletion_timestamp: None,
                        }],
                    },
                },
                ClusterRecord {
                    id: "b".to_string(),
                    metadata: ClusterMetadata::default(),
                },
            ])
        });
        source
            .expect_cluster_health()
            .returning(|_| Ok(HealthResponse::not_connected()));

        let caps = capabilities_for(CapabilityKind::Logging, &source)
            .await
            .unwrap();
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[0].cluster_id, "a");
        assert_eq!(caps[0].state, CapabilityState::Installed);
        assert_eq!(caps[1].cluster_id, "b");
        assert_eq!(caps[1].state, CapabilityState::NotInstalled);
    }

    #[tokio::test]
    async fn test_cluster_fetch_failure_propagates() {
        let mut source = MockSource::new();
        source.expect_list_clusters().returning(|| {
            Err(Error::Api {
                status: 500,
                message: "gateway down".to_string(),
            })
        });

        assert!(capabilities_for(CapabilityKind::Alerting, &source)
            .await
            .is_err());
    }
}
