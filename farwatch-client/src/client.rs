//! HTTP client for the management gateway REST API
//!
//! Thin typed wrappers over the `/management` endpoints. Every call issues
//! one request and maps the response body one to one; failures propagate to
//! the caller unchanged. The only place an error is swallowed is the health
//! fan-out in [`crate::cluster`].

use std::collections::HashMap;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use farwatch_common::{
    merge_name_label, CapabilityKind, CertChain, CertInfo, ClusterIdRef, ClusterRecord,
    DashboardSettings, GatewayConfig, HealthResponse, ItemList, MatchLabels, Role, RoleBinding,
    TokenCapability, TokenRecord, UninstallStatus,
};

/// Client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("config document decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Management gateway API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against `base_url` (e.g. `http://gateway:9090`).
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/management{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(path, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.handle_response(path, response).await
    }

    async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.check_status(path, response).await
    }

    /// POST with no request body, discarding the response body.
    async fn post_bare(&self, path: &str) -> Result<()> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).send().await?;
        self.check_status(path, response).await
    }

    async fn put_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        debug!(path, "PUT");
        let response = self.client.put(self.url(path)).json(body).send().await?;
        self.check_status(path, response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        debug!(path, "DELETE");
        let response = self.client.delete(self.url(path)).send().await?;
        self.check_status(path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else if status.as_u16() == 404 {
            Err(Error::NotFound(path.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn check_status(&self, path: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 404 {
            Err(Error::NotFound(path.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Serialize)]
struct UpdateClusterRequest {
    cluster: ClusterIdRef,
    labels: HashMap<String, String>,
}

#[derive(Serialize)]
struct UninstallRequest {
    options: UninstallOptions,
}

#[derive(Serialize)]
struct UninstallOptions {
    #[serde(rename = "initialDelay", skip_serializing_if = "Option::is_none")]
    initial_delay: Option<String>,
    #[serde(rename = "deleteStoredData")]
    delete_stored_data: bool,
}

#[derive(Serialize)]
struct CancelUninstallRequest {
    name: String,
    cluster: ClusterIdRef,
}

#[derive(Serialize)]
struct InstallerRequest<'a> {
    token: &'a str,
    pin: &'a str,
}

#[derive(Deserialize)]
struct InstallerResponse {
    command: String,
}

#[derive(Serialize)]
struct CreateTokenRequest {
    ttl: String,
    labels: HashMap<String, String>,
    capabilities: Vec<TokenCapability>,
}

/// An entry of the capability catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCatalogEntry {
    pub name: String,
}

// ============================================================================
// API methods
// ============================================================================

impl ApiClient {
    // Cluster operations
    pub async fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        Ok(self
            .get::<ItemList<ClusterRecord>>("/clusters")
            .await?
            .items)
    }

    pub async fn get_cluster(&self, id: &str) -> Result<ClusterRecord> {
        self.get(&format!("/clusters/{}", id)).await
    }

    pub async fn cluster_health(&self, id: &str) -> Result<HealthResponse> {
        self.get(&format!("/clusters/{}/health", id)).await
    }

    /// Update a cluster's labels. The display name is merged into the label
    /// map under the reserved name key; an empty name removes the key.
    pub async fn update_cluster(
        &self,
        id: &str,
        name: &str,
        labels: HashMap<String, String>,
    ) -> Result<()> {
        let request = UpdateClusterRequest {
            cluster: ClusterIdRef { id: id.to_string() },
            labels: merge_name_label(name, labels),
        };
        self.put_empty(&format!("/clusters/{}", id), &request).await
    }

    pub async fn delete_cluster(&self, id: &str) -> Result<()> {
        self.delete(&format!("/clusters/{}", id)).await
    }

    // Capability operations
    pub async fn capabilities(&self) -> Result<Vec<CapabilityCatalogEntry>> {
        Ok(self
            .get::<ItemList<CapabilityCatalogEntry>>("/capabilities")
            .await?
            .items)
    }

    pub async fn install_capability(&self, cluster_id: &str, kind: CapabilityKind) -> Result<()> {
        self.post_bare(&format!(
            "/clusters/{}/capabilities/{}/install",
            cluster_id, kind
        ))
        .await
    }

    /// Request a capability uninstall. Deleting stored data schedules the
    /// teardown with a one minute initial delay so it can still be canceled.
    pub async fn uninstall_capability(
        &self,
        cluster_id: &str,
        kind: CapabilityKind,
        delete_stored_data: bool,
    ) -> Result<()> {
        let request = UninstallRequest {
            options: UninstallOptions {
                initial_delay: delete_stored_data.then(|| "1m".to_string()),
                delete_stored_data,
            },
        };
        self.post_empty(
            &format!("/clusters/{}/capabilities/{}/uninstall", cluster_id, kind),
            &request,
        )
        .await
    }

    pub async fn uninstall_status(
        &self,
        cluster_id: &str,
        kind: CapabilityKind,
    ) -> Result<UninstallStatus> {
        self.get(&format!(
            "/clusters/{}/capabilities/{}/uninstall/status",
            cluster_id, kind
        ))
        .await
    }

    pub async fn cancel_uninstall(&self, cluster_id: &str, kind: CapabilityKind) -> Result<()> {
        let request = CancelUninstallRequest {
            name: kind.to_string(),
            cluster: ClusterIdRef {
                id: cluster_id.to_string(),
            },
        };
        self.post_empty(
            &format!(
                "/clusters/{}/capabilities/{}/uninstall/cancel",
                cluster_id, kind
            ),
            &request,
        )
        .await
    }

    /// Render the one-shot install command for registering a new agent.
    pub async fn capability_installer(
        &self,
        kind: CapabilityKind,
        token: &str,
        pin: &str,
    ) -> Result<String> {
        let response: InstallerResponse = self
            .post(
                &format!("/capabilities/{}/installer", kind),
                &InstallerRequest { token, pin },
            )
            .await?;
        Ok(response.command)
    }

    // Token operations
    pub async fn tokens(&self) -> Result<Vec<TokenRecord>> {
        Ok(self.get::<ItemList<TokenRecord>>("/tokens").await?.items)
    }

    pub async fn create_token(
        &self,
        ttl: &str,
        name: Option<&str>,
        capabilities: Vec<TokenCapability>,
    ) -> Result<TokenRecord> {
        let request = CreateTokenRequest {
            ttl: ttl.to_string(),
            labels: merge_name_label(name.unwrap_or_default(), HashMap::new()),
            capabilities,
        };
        self.post("/tokens", &request).await
    }

    pub async fn delete_token(&self, id: &str) -> Result<()> {
        self.delete(&format!("/tokens/{}", id)).await
    }

    // RBAC operations
    pub async fn roles(&self) -> Result<Vec<Role>> {
        Ok(self.get::<ItemList<Role>>("/roles").await?.items)
    }

    pub async fn create_role(
        &self,
        id: &str,
        cluster_ids: Vec<String>,
        match_labels: HashMap<String, String>,
    ) -> Result<()> {
        let request = Role {
            id: id.to_string(),
            cluster_ids,
            match_labels: MatchLabels { match_labels },
        };
        self.post_empty("/roles", &request).await
    }

    pub async fn delete_role(&self, id: &str) -> Result<()> {
        self.delete(&format!("/roles/{}", id)).await
    }

    pub async fn role_bindings(&self) -> Result<Vec<RoleBinding>> {
        Ok(self
            .get::<ItemList<RoleBinding>>("/rolebindings")
            .await?
            .items)
    }

    pub async fn create_role_binding(
        &self,
        id: &str,
        role_id: &str,
        subjects: Vec<String>,
    ) -> Result<()> {
        let request = RoleBinding {
            id: id.to_string(),
            role_id: role_id.to_string(),
            subjects,
        };
        self.post_empty("/rolebindings", &request).await
    }

    pub async fn delete_role_binding(&self, id: &str) -> Result<()> {
        self.delete(&format!("/rolebindings/{}", id)).await
    }

    // Certificate operations
    pub async fn certs(&self) -> Result<Vec<CertInfo>> {
        Ok(self.get::<CertChain>("/certs").await?.chain)
    }

    /// Fingerprint of the last certificate in the serving chain, or `None`
    /// when the gateway has no certificates.
    pub async fn cluster_fingerprint(&self) -> Result<Option<String>> {
        let certs = self.certs().await?;
        Ok(certs.last().map(|cert| cert.fingerprint.clone()))
    }

    // Gateway configuration
    pub async fn gateway_config(&self) -> Result<Vec<crate::config::ConfigDocument>> {
        let config: GatewayConfig = self.get("/config").await?;
        crate::config::decode_documents(&config)
    }

    pub async fn update_gateway_config(&self, documents: &[String]) -> Result<()> {
        let config = crate::config::encode_documents(documents);
        self.put_empty("/config", &config).await
    }

    // Dashboard settings
    pub async fn dashboard_settings(&self) -> Result<DashboardSettings> {
        self.get("/dashboard/settings").await
    }

    pub async fn default_image_repository(&self) -> Result<Option<String>> {
        let settings = self.dashboard_settings().await?;
        Ok(settings
            .global
            .and_then(|global| global.default_image_repository))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:9090/");
        assert_eq!(client.url("/clusters"), "http://localhost:9090/management/clusters");
    }

    #[test]
    fn test_uninstall_options_wire_shape() {
        let with_data = UninstallRequest {
            options: UninstallOptions {
                initial_delay: Some("1m".to_string()),
                delete_stored_data: true,
            },
        };
        let json = serde_json::to_value(&with_data).unwrap();
        assert_eq!(json["options"]["initialDelay"], "1m");
        assert_eq!(json["options"]["deleteStoredData"], true);

        let without_data = UninstallRequest {
            options: UninstallOptions {
                initial_delay: None,
                delete_stored_data: false,
            },
        };
        let json = serde_json::to_value(&without_data).unwrap();
        assert!(json["options"].get("initialDelay").is_none());
    }
}
