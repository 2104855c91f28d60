//! In-cluster Kubernetes API access
//!
//! Reads the pod the process runs in from the API server, authenticating
//! with the projected service account token and trusting the cluster CA.
//! See <https://kubernetes.io/docs/tasks/run-application/access-api-from-pod/>

mod types;

use std::io::ErrorKind;

use reqwest::{Client, ClientBuilder};

use crate::env::EnvSource;
use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::{
    DEFAULT_MAX_RETRIES, build_http_client, http_client_builder, read_token_file,
};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

pub use types::PodContainer;
use types::{Pod, Status};

/// Set by the kubelet in every container; its presence means "in a cluster".
const ENV_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
const ENV_SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";
/// Downward API variables naming the pod.
const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";
const ENV_POD_NAME: &str = "POD_NAME";
/// Defaults to the pod name.
const ENV_HOSTNAME: &str = "HOSTNAME";

const DEFAULT_SERVICE_PORT: &str = "443";

/// Where the kubelet projects the service account token, CA and namespace.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

#[derive(Debug, Clone)]
struct ClusterAmbient {
    api_server: String,
    namespace: Option<String>,
    pod_name: Option<String>,
}

impl ClusterAmbient {
    /// `None` when `KUBERNETES_SERVICE_HOST` is absent: not in a cluster.
    fn from_env(env: &dyn EnvSource) -> Option<Self> {
        let host = env.non_empty(ENV_SERVICE_HOST)?;
        let port = env
            .non_empty(ENV_SERVICE_PORT)
            .unwrap_or_else(|| DEFAULT_SERVICE_PORT.to_string());
        let host = if host.contains(':') {
            format!("[{host}]")
        } else {
            host
        };
        Some(Self {
            api_server: format!("https://{host}:{port}"),
            namespace: env.non_empty(ENV_POD_NAMESPACE),
            pod_name: env
                .non_empty(ENV_POD_NAME)
                .or_else(|| env.non_empty(ENV_HOSTNAME)),
        })
    }
}

/// Lists the containers of the current pod.
///
/// Outside a cluster [`pod_containers`](Self::pod_containers) returns an
/// empty list without touching the network or the filesystem.
///
/// ```rust,no_run
/// use kubernetes_hello_provider::{KubernetesClient, ProcessEnv};
///
/// # async fn run() -> kubernetes_hello_provider::Result<()> {
/// let client = KubernetesClient::from_env(&ProcessEnv);
/// for container in client.pod_containers().await? {
///     println!("{} {}", container.name, container.image);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KubernetesClient {
    ambient: Option<ClusterAmbient>,
    service_account_dir: String,
    max_retries: u32,
}

/// Builder for [`KubernetesClient`].
pub struct KubernetesClientBuilder {
    ambient: Option<ClusterAmbient>,
    service_account_dir: String,
    max_retries: u32,
}

impl KubernetesClientBuilder {
    fn new(env: &dyn EnvSource) -> Self {
        Self {
            ambient: ClusterAmbient::from_env(env),
            service_account_dir: SERVICE_ACCOUNT_DIR.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the API server URL derived from `KUBERNETES_SERVICE_HOST`.
    /// Has no effect outside a cluster.
    #[must_use]
    pub fn api_server(mut self, url: impl Into<String>) -> Self {
        if let Some(ambient) = self.ambient.as_mut() {
            ambient.api_server = url.into();
        }
        self
    }

    /// Directory holding `token`, `ca.crt` and `namespace`.
    #[must_use]
    pub fn service_account_dir(mut self, dir: impl Into<String>) -> Self {
        self.service_account_dir = dir.into();
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn build(self) -> KubernetesClient {
        KubernetesClient {
            ambient: self.ambient,
            service_account_dir: self.service_account_dir,
            max_retries: self.max_retries,
        }
    }
}

impl KubernetesClient {
    /// Create a client from the given environment with default settings.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self::builder(env).build()
    }

    /// Create a builder reading the cluster markers from `env`.
    pub fn builder(env: &dyn EnvSource) -> KubernetesClientBuilder {
        KubernetesClientBuilder::new(env)
    }

    /// Whether `KUBERNETES_SERVICE_HOST` was set.
    pub fn is_applicable(&self) -> bool {
        self.ambient.is_some()
    }

    /// Containers of the current pod, in spec order.
    pub async fn pod_containers(&self) -> Result<Vec<PodContainer>> {
        let Some(ambient) = &self.ambient else {
            log::debug!("[{}] {ENV_SERVICE_HOST} not set, skipping", self.provider_name());
            return Ok(Vec::new());
        };

        let pod_name = ambient.pod_name.as_deref().ok_or_else(|| {
            self.credential_source_error(format!("{ENV_POD_NAME} is not set"))
        })?;
        let namespace = self.namespace(ambient).await?;
        let token = read_token_file(&self.account_file("token"), self.provider_name()).await?;
        let client = self.http_client().await?;

        let url = format!(
            "{}/api/v1/namespaces/{namespace}/pods/{pod_name}",
            ambient.api_server.trim_end_matches('/')
        );
        let request = client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/json");

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            &url,
            self.max_retries,
        )
        .await?;

        if !response.is_success() {
            return Err(self.status_error(response.status, &response.body));
        }

        let pod: Pod = HttpUtils::parse_json(&response.body, self.provider_name())?;
        log::debug!(
            "[{}] Pod {namespace}/{pod_name} has {} containers",
            self.provider_name(),
            pod.spec.containers.len()
        );
        Ok(pod.spec.containers)
    }

    fn account_file(&self, name: &str) -> String {
        format!("{}/{name}", self.service_account_dir.trim_end_matches('/'))
    }

    /// `POD_NAMESPACE`, or the namespace the service account lives in.
    async fn namespace(&self, ambient: &ClusterAmbient) -> Result<String> {
        if let Some(namespace) = &ambient.namespace {
            return Ok(namespace.clone());
        }
        let path = self.account_file("namespace");
        let namespace = tokio::fs::read_to_string(&path).await.map_err(|e| {
            self.credential_source_error(format!(
                "{ENV_POD_NAMESPACE} is not set and {path} is unreadable: {e}"
            ))
        })?;
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Err(self.credential_source_error(format!(
                "{ENV_POD_NAMESPACE} is not set and {path} is empty"
            )));
        }
        Ok(namespace.to_string())
    }

    /// Client trusting the cluster CA; system roots when `ca.crt` is missing.
    async fn http_client(&self) -> Result<Client> {
        let ca_file = self.account_file("ca.crt");
        let builder = match tokio::fs::read(&ca_file).await {
            Ok(pem) => add_cluster_ca(http_client_builder(), &pem).map_err(|e| {
                self.credential_source_error(format!("invalid cluster CA {ca_file}: {e}"))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "[{}] {ca_file} not found, using system roots",
                    self.provider_name()
                );
                http_client_builder()
            }
            Err(e) => {
                return Err(self.credential_source_error(format!("failed to read {ca_file}: {e}")));
            }
        };
        build_http_client(builder, self.provider_name())
    }

    /// Map a non-2xx response carrying a `v1.Status` body.
    fn status_error(&self, status: u16, body: &str) -> ProviderError {
        match serde_json::from_str::<Status>(body) {
            Ok(Status {
                reason: Some(reason),
                message,
            }) => self.map_error(RawApiError::with_code(reason, message), ErrorContext::default()),
            _ => self.unknown_error(RawApiError::new(format!(
                "API server returned HTTP {status}: {}",
                truncate_for_log(body.trim())
            ))),
        }
    }
}

impl ProviderErrorMapper for KubernetesClient {
    fn provider_name(&self) -> &'static str {
        "kubernetes"
    }

    fn map_error(&self, raw: RawApiError, _context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("Unauthorized") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("Forbidden") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("TooManyRequests") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },
            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(any(feature = "rustls", feature = "native-tls"))]
fn add_cluster_ca(builder: ClientBuilder, pem: &[u8]) -> std::result::Result<ClientBuilder, String> {
    let certificates = reqwest::Certificate::from_pem_bundle(pem).map_err(|e| e.to_string())?;
    if certificates.is_empty() {
        return Err("no certificate found".to_string());
    }
    Ok(certificates
        .into_iter()
        .fold(builder, ClientBuilder::add_root_certificate))
}

#[cfg(not(any(feature = "rustls", feature = "native-tls")))]
fn add_cluster_ca(_builder: ClientBuilder, _pem: &[u8]) -> std::result::Result<ClientBuilder, String> {
    Err("no TLS backend enabled".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticEnv;

    fn client() -> KubernetesClient {
        KubernetesClient::from_env(&StaticEnv::new().with(ENV_SERVICE_HOST, "10.96.0.1"))
    }

    #[test]
    fn ambient_absent_without_service_host() {
        let env = StaticEnv::new()
            .with(ENV_POD_NAMESPACE, "default")
            .with(ENV_POD_NAME, "hello-7d9c");
        assert!(ClusterAmbient::from_env(&env).is_none());
        assert!(!KubernetesClient::from_env(&env).is_applicable());
    }

    #[test]
    fn api_server_from_service_variables() {
        let env = StaticEnv::new()
            .with(ENV_SERVICE_HOST, "10.96.0.1")
            .with(ENV_SERVICE_PORT, "6443");
        let ambient = ClusterAmbient::from_env(&env).unwrap();
        assert_eq!(ambient.api_server, "https://10.96.0.1:6443");

        let default_port = ClusterAmbient::from_env(&StaticEnv::new().with(ENV_SERVICE_HOST, "10.0.0.1")).unwrap();
        assert_eq!(default_port.api_server, "https://10.0.0.1:443");
    }

    #[test]
    fn ipv6_service_host_is_bracketed() {
        let env = StaticEnv::new().with(ENV_SERVICE_HOST, "fd00:10:96::1");
        let ambient = ClusterAmbient::from_env(&env).unwrap();
        assert_eq!(ambient.api_server, "https://[fd00:10:96::1]:443");
    }

    #[test]
    fn pod_name_falls_back_to_hostname() {
        let env = StaticEnv::new()
            .with(ENV_SERVICE_HOST, "10.96.0.1")
            .with(ENV_HOSTNAME, "hello-7d9c");
        let ambient = ClusterAmbient::from_env(&env).unwrap();
        assert_eq!(ambient.pod_name.as_deref(), Some("hello-7d9c"));
        assert!(ambient.namespace.is_none());

        let explicit = ClusterAmbient::from_env(&env.with(ENV_POD_NAME, "hello-abc")).unwrap();
        assert_eq!(explicit.pod_name.as_deref(), Some("hello-abc"));
    }

    #[test]
    fn status_reasons_map_to_provider_errors() {
        let client = client();
        let forbidden = client.status_error(
            403,
            r#"{"kind":"Status","status":"Failure","message":"pods \"hello\" is forbidden","reason":"Forbidden","code":403}"#,
        );
        assert!(matches!(forbidden, ProviderError::PermissionDenied { .. }));
        assert_eq!(
            forbidden.to_string(),
            "[kubernetes] Permission denied: pods \"hello\" is forbidden"
        );

        let unauthorized = client.status_error(401, r#"{"reason":"Unauthorized","message":"Unauthorized"}"#);
        assert!(matches!(unauthorized, ProviderError::InvalidCredentials { .. }));

        let not_found = client.status_error(404, r#"{"reason":"NotFound","message":"pods \"x\" not found"}"#);
        assert!(matches!(
            not_found,
            ProviderError::Unknown { raw_code: Some(ref code), .. } if code == "NotFound"
        ));
    }

    #[test]
    fn non_status_body_is_unknown() {
        let err = client().status_error(500, "upstream exploded\n");
        assert!(
            matches!(&err, ProviderError::Unknown { raw_code: None, raw_message, .. }
                if raw_message == "API server returned HTTP 500: upstream exploded"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn outside_cluster_lists_nothing() {
        let client = KubernetesClient::builder(&StaticEnv::new())
            .service_account_dir("/nonexistent/serviceaccount")
            .build();
        assert!(client.pod_containers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_pod_name_is_credential_source_error() {
        let result = client().pod_containers().await;
        assert!(
            matches!(&result, Err(ProviderError::CredentialSource { detail, .. }) if detail == "POD_NAME is not set"),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn garbage_ca_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ca.crt"), "not a certificate").unwrap();
        let client = KubernetesClient::builder(&StaticEnv::new().with(ENV_SERVICE_HOST, "10.96.0.1"))
            .service_account_dir(dir.path().to_string_lossy())
            .build();

        let result = client.http_client().await;
        assert!(
            matches!(&result, Err(ProviderError::CredentialSource { detail, .. }) if detail.starts_with("invalid cluster CA")),
            "unexpected result: {result:?}"
        );
    }
}
