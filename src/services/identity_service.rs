//! Resolución de identidad
//!
//! Valida el token del usuario contra el proveedor de identidad externo
//! (compatible con GoTrue) y expone las operaciones de administración de
//! usuarios que el backend necesita. La verificación se intenta primero con
//! la clave pública (anon) y, si falla, con la clave de servicio.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::models::auth::{AuthenticatedUser, IdentityUser, Role};
use crate::utils::errors::{AppError, AppResult};

/// Cabecera preferida para el token de acceso
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Contexto de credencial con el que se consulta al proveedor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialContext {
    Anonymous,
    ServiceRole,
}

/// Datos para crear una identidad nueva (alta self-service)
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Operaciones del proveedor de identidad externo
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str, context: CredentialContext) -> AppResult<AuthenticatedUser>;
    async fn list_users(&self) -> AppResult<Vec<IdentityUser>>;
    async fn get_user(&self, id: &str) -> AppResult<Option<IdentityUser>>;
    async fn create_user(&self, identity: &NewIdentity) -> AppResult<IdentityUser>;
    async fn update_user_role(&self, id: &str, role: Role) -> AppResult<IdentityUser>;
    async fn delete_user(&self, id: &str) -> AppResult<()>;
}

/// Extrae el token: primero `X-Access-Token`, luego `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_access_header = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let from_bearer = || {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    from_access_header.or_else(from_bearer).map(str::to_string)
}

/// Resolución en dos etapas con cierre en fallo
#[derive(Clone)]
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    pub async fn resolve(&self, token: Option<&str>) -> AppResult<AuthenticatedUser> {
        let token = token.ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        match self.provider.verify_token(token, CredentialContext::Anonymous).await {
            Ok(user) => return Ok(user),
            Err(e) => debug!("🔑 Verificación anónima fallida, reintentando con clave de servicio: {}", e),
        }

        match self.provider.verify_token(token, CredentialContext::ServiceRole).await {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!("🔒 Token rechazado en ambas etapas: {}", e);
                Err(AppError::Unauthorized("Invalid or expired token".to_string()))
            }
        }
    }
}

/// Usuario tal como lo devuelve la API del proveedor
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<ProviderMetadata>,
    /// Sólo la clave de servicio puede escribirla; de aquí sale el rol
    #[serde(default)]
    app_metadata: Option<ProviderAppMetadata>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderMetadata {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderAppMetadata {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderUserList {
    #[serde(default)]
    users: Vec<ProviderUser>,
}

impl ProviderUser {
    fn display_name(&self, email: &str) -> String {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string())
    }

    fn role(&self) -> Role {
        Role::from_metadata(self.app_metadata.as_ref().and_then(|m| m.role.as_deref()))
    }

    fn into_authenticated(self) -> AuthenticatedUser {
        let email = self.email.clone().unwrap_or_default();
        AuthenticatedUser {
            name: self.display_name(&email),
            role: self.role(),
            id: self.id,
            email,
        }
    }

    fn into_identity(self) -> IdentityUser {
        let email = self.email.clone().unwrap_or_default();
        IdentityUser {
            name: self.display_name(&email),
            role: self.role(),
            id: self.id,
            email,
            created_at: self.created_at,
        }
    }
}

/// Cliente HTTP para el proveedor de identidad
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl HttpIdentityProvider {
    pub fn new(client: Client, base_url: &str, anon_key: &str, service_role_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn admin_url(&self, id: &str) -> String {
        self.url(&format!("/admin/users/{}", urlencoding::encode(id)))
    }

    /// Cabeceras de administración con la clave de servicio
    fn as_service(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> AppResult<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("{}: {}", operation, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::Unauthorized(format!("{}: {}", operation, status))
            }
            StatusCode::NOT_FOUND => AppError::NotFound(format!("{}: usuario no encontrado", operation)),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
                AppError::Conflict(format!("{}: {}", operation, body))
            }
            StatusCode::BAD_REQUEST => AppError::BadRequest(format!("{}: {}", operation, body)),
            _ => AppError::ExternalApi(format!("{}: {} {}", operation, status, body)),
        })
    }

    async fn decode_user(response: reqwest::Response, operation: &str) -> AppResult<ProviderUser> {
        response
            .json::<ProviderUser>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("{}: respuesta inválida: {}", operation, e)))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str, context: CredentialContext) -> AppResult<AuthenticatedUser> {
        let apikey = match context {
            CredentialContext::Anonymous => &self.anon_key,
            CredentialContext::ServiceRole => &self.service_role_key,
        };

        let request = self
            .client
            .get(self.url("/user"))
            .header("apikey", apikey)
            .bearer_auth(token);

        let response = self.send(request, "verify_token").await?;
        let user = Self::decode_user(response, "verify_token").await?;
        Ok(user.into_authenticated())
    }

    async fn list_users(&self) -> AppResult<Vec<IdentityUser>> {
        let request = self
            .as_service(self.client.get(self.url("/admin/users")))
            .query(&[("page", "1"), ("per_page", "1000")]);

        let response = self.send(request, "list_users").await?;
        let list = response
            .json::<ProviderUserList>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("list_users: respuesta inválida: {}", e)))?;

        Ok(list.users.into_iter().map(ProviderUser::into_identity).collect())
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<IdentityUser>> {
        let request = self.as_service(self.client.get(self.admin_url(id)));
        match self.send(request, "get_user").await {
            Ok(response) => Ok(Some(Self::decode_user(response, "get_user").await?.into_identity())),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_user(&self, identity: &NewIdentity) -> AppResult<IdentityUser> {
        let body = json!({
            "email": identity.email,
            "password": identity.password,
            "email_confirm": true,
            "user_metadata": { "name": identity.name },
            "app_metadata": { "role": identity.role.as_str() },
        });

        let request = self.as_service(self.client.post(self.url("/admin/users"))).json(&body);
        let response = self.send(request, "create_user").await?;
        let user = Self::decode_user(response, "create_user").await?;

        info!("✅ Identidad creada: {} ({})", identity.email, identity.role.as_str());
        Ok(user.into_identity())
    }

    async fn update_user_role(&self, id: &str, role: Role) -> AppResult<IdentityUser> {
        let body = json!({ "app_metadata": { "role": role.as_str() } });
        let request = self.as_service(self.client.put(self.admin_url(id))).json(&body);
        let response = self.send(request, "update_user_role").await?;
        Ok(Self::decode_user(response, "update_user_role").await?.into_identity())
    }

    async fn delete_user(&self, id: &str) -> AppResult<()> {
        let request = self.as_service(self.client.delete(self.admin_url(id)));
        self.send(request, "delete_user").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Proveedor que sólo acepta el token en el contexto indicado
    struct StagedProvider {
        accepts_in: Option<CredentialContext>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for StagedProvider {
        async fn verify_token(&self, token: &str, context: CredentialContext) -> AppResult<AuthenticatedUser> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(context) == self.accepts_in && token == "good" {
                Ok(AuthenticatedUser {
                    id: "u1".into(),
                    email: "ana@flota.test".into(),
                    role: Role::Driver,
                    name: "Ana".into(),
                })
            } else {
                Err(AppError::Unauthorized("rejected".into()))
            }
        }
        async fn list_users(&self) -> AppResult<Vec<IdentityUser>> {
            Ok(vec![])
        }
        async fn get_user(&self, _id: &str) -> AppResult<Option<IdentityUser>> {
            Ok(None)
        }
        async fn create_user(&self, _identity: &NewIdentity) -> AppResult<IdentityUser> {
            Err(AppError::Internal("unused".into()))
        }
        async fn update_user_role(&self, _id: &str, _role: Role) -> AppResult<IdentityUser> {
            Err(AppError::Internal("unused".into()))
        }
        async fn delete_user(&self, _id: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn resolver(accepts_in: Option<CredentialContext>) -> (Arc<StagedProvider>, IdentityResolver) {
        let provider = Arc::new(StagedProvider {
            accepts_in,
            calls: AtomicUsize::new(0),
        });
        (provider.clone(), IdentityResolver::new(provider))
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_calling_provider() {
        let (provider, resolver) = resolver(Some(CredentialContext::Anonymous));
        let err = resolver.resolve(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "No token provided"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_anonymous_success_skips_fallback() {
        let (provider, resolver) = resolver(Some(CredentialContext::Anonymous));
        let user = resolver.resolve(Some("good")).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_service_role() {
        let (provider, resolver) = resolver(Some(CredentialContext::ServiceRole));
        assert!(resolver.resolve(Some("good")).await.is_ok());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_both_stages_failing_is_generic_unauthorized() {
        let (_, resolver) = resolver(None);
        let err = resolver.resolve(Some("good")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid or expired token"));
    }

    #[test]
    fn test_extract_token_prefers_access_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer anon-key"));
        assert_eq!(extract_token(&headers).as_deref(), Some("anon-key"));

        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("user-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("user-token"));

        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_provider_user_defaults() {
        let raw = r#"{"id":"u9","email":"luis@flota.test","app_metadata":{"role":"admin"}}"#;
        let user: ProviderUser = serde_json::from_str(raw).unwrap();
        let auth = user.into_authenticated();
        assert_eq!(auth.name, "luis");
        assert_eq!(auth.role, Role::Admin);
    }

    #[test]
    fn test_self_editable_metadata_cannot_grant_role() {
        let raw = r#"{"id":"u1","email":"ana@flota.test","user_metadata":{"name":"Ana","role":"super_admin"}}"#;
        let user: ProviderUser = serde_json::from_str(raw).unwrap();
        let identity = user.into_identity();
        assert_eq!(identity.name, "Ana");
        assert_eq!(identity.role, Role::Driver);
    }
}
