//! Wire types shared between the farwatch management client and CLI
//!
//! Everything here mirrors the management gateway's REST payloads one to one.
//! These types carry no behavior beyond construction helpers; view models
//! built on top of them live in `farwatch-client`.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reserved label key holding a cluster's display name.
pub const NAME_LABEL: &str = "farwatch.io/name";

/// Generic `{ items: [...] }` envelope used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// A cluster as returned by `GET /management/clusters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub id: String,
    #[serde(default)]
    pub metadata: ClusterMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityRef>,
}

impl ClusterRecord {
    /// Display name from the reserved name label, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.metadata
            .labels
            .get(NAME_LABEL)
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    /// The capability entry for `name`, if the cluster carries one.
    pub fn capability(&self, name: &str) -> Option<&CapabilityRef> {
        self.metadata.capabilities.iter().find(|c| c.name == name)
    }
}

/// A capability entry attached to a cluster record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub name: String,
    /// Set while the capability is being torn down.
    #[serde(rename = "deletionTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<String>,
}

/// Response of `GET /management/clusters/{id}/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ConnectionStatus,
    pub health: HealthInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub ready: bool,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl HealthResponse {
    /// The substitute used when a cluster's health endpoint cannot be
    /// reached: not connected, not ready, no conditions.
    pub fn not_connected() -> Self {
        Self {
            status: ConnectionStatus { connected: false },
            health: HealthInfo {
                ready: false,
                conditions: Vec::new(),
            },
        }
    }
}

/// The installable capability types the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Logging,
    Monitoring,
    Alerting,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Logging,
        CapabilityKind::Monitoring,
        CapabilityKind::Alerting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Logging => "logging",
            CapabilityKind::Monitoring => "monitoring",
            CapabilityKind::Alerting => "alerting",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown capability '{0}', expected one of: logging, monitoring, alerting")]
pub struct UnknownCapability(String);

impl FromStr for CapabilityKind {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logging" => Ok(CapabilityKind::Logging),
            "monitoring" => Ok(CapabilityKind::Monitoring),
            "alerting" => Ok(CapabilityKind::Alerting),
            _ => Err(UnknownCapability(s.to_string())),
        }
    }
}

/// Progress of a capability uninstall task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UninstallStatus {
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Canceled => write!(f, "canceled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A bootstrap token as returned by `GET /management/tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "tokenID")]
    pub token_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub ttl: String,
    #[serde(rename = "usageCount", default)]
    pub usage_count: u64,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl TokenRecord {
    pub fn display_name(&self) -> &str {
        self.labels
            .get(NAME_LABEL)
            .map(String::as_str)
            .unwrap_or(&self.token_id)
    }
}

/// A capability granted to a bootstrap token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCapability {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ClusterIdRef>,
}

/// `{ id }` reference to a cluster, used in several request bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterIdRef {
    pub id: String,
}

/// An RBAC role scoping access to a set of clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(rename = "clusterIDs", default)]
    pub cluster_ids: Vec<String>,
    #[serde(rename = "matchLabels", default)]
    pub match_labels: MatchLabels,
}

/// Label selector carried by a role. The wire nests the map under a
/// `matchLabels` key of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchLabels {
    #[serde(rename = "matchLabels", default)]
    pub match_labels: HashMap<String, String>,
}

/// Binding of subjects to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub id: String,
    #[serde(rename = "roleId")]
    pub role_id: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// One certificate of the gateway's serving chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertInfo {
    pub issuer: String,
    pub subject: String,
    #[serde(rename = "isCA")]
    pub is_ca: bool,
    #[serde(rename = "notBefore")]
    pub not_before: String,
    #[serde(rename = "notAfter")]
    pub not_after: String,
    pub fingerprint: String,
}

/// Response of `GET /management/certs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertChain {
    #[serde(default)]
    pub chain: Vec<CertInfo>,
}

/// Gateway configuration, a sequence of base64-encoded JSON documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub documents: Vec<ConfigDocumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocumentRecord {
    /// Base64-encoded JSON document.
    pub json: String,
}

/// Dashboard settings stored by the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<DashboardGlobalSettings>,
    #[serde(default)]
    pub user: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardGlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image_repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_token_ttl: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub default_token_labels: HashMap<String, String>,
}

/// Merge a display name into a label map for a cluster update.
///
/// An empty name removes the name label entirely, it is never stored as an
/// empty string.
pub fn merge_name_label(name: &str, mut labels: HashMap<String, String>) -> HashMap<String, String> {
    if name.is_empty() {
        labels.remove(NAME_LABEL);
    } else {
        labels.insert(NAME_LABEL.to_string(), name.to_string());
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let record = ClusterRecord {
            id: "c-1234".to_string(),
            metadata: ClusterMetadata::default(),
        };
        assert_eq!(record.display_name(), "c-1234");

        let mut labels = HashMap::new();
        labels.insert(NAME_LABEL.to_string(), "edge-east".to_string());
        let record = ClusterRecord {
            id: "c-1234".to_string(),
            metadata: ClusterMetadata {
                labels,
                capabilities: vec![],
            },
        };
        assert_eq!(record.display_name(), "edge-east");
    }

    #[test]
    fn test_merge_name_label_sets_and_removes() {
        let labels = merge_name_label("edge-east", HashMap::new());
        assert_eq!(labels.get(NAME_LABEL).map(String::as_str), Some("edge-east"));

        // Renaming to the empty string drops the key rather than keeping "".
        let labels = merge_name_label("", labels);
        assert!(!labels.contains_key(NAME_LABEL));
    }

    #[test]
    fn test_merge_name_label_keeps_other_labels() {
        let mut labels = HashMap::new();
        labels.insert("env".to_string(), "prod".to_string());
        let merged = merge_name_label("", labels);
        assert_eq!(merged.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_fallback_health_value() {
        let fallback = HealthResponse::not_connected();
        assert!(!fallback.status.connected);
        assert!(!fallback.health.ready);
        assert!(fallback.health.conditions.is_empty());
    }

    #[test]
    fn test_cluster_record_wire_shape() {
        let json = r#"{
            "id": "c-1",
            "metadata": {
                "labels": { "farwatch.io/name": "edge" },
                "capabilities": [
                    { "name": "logging" },
                    { "name": "monitoring", "deletionTimestamp": "2026-01-01T00:00:00Z" }
                ]
            }
        }"#;
        let record: ClusterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name(), "edge");
        assert!(record.capability("logging").unwrap().deletion_timestamp.is_none());
        assert!(record.capability("monitoring").unwrap().deletion_timestamp.is_some());
        assert!(record.capability("alerting").is_none());
    }

    #[test]
    fn test_capability_kind_parsing() {
        assert_eq!("Logging".parse::<CapabilityKind>().unwrap(), CapabilityKind::Logging);
        assert!("metrics".parse::<CapabilityKind>().is_err());
    }

    #[test]
    fn test_task_state_tolerates_unknown_values() {
        let status: UninstallStatus = serde_json::from_str(r#"{ "state": "Exploded" }"#).unwrap();
        assert_eq!(status.state, TaskState::Unknown);
        let status: UninstallStatus = serde_json::from_str(r#"{ "state": "Running" }"#).unwrap();
        assert_eq!(status.state, TaskState::Running);
    }
}
