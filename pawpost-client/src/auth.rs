use crate::{
    client::{ApiClient, Result},
    wire::AuthEnvelope,
};
use pawpost_common::model::auth::{AuthUser, LoginRequest, RegisterRequest, TokenVerification};
use reqwest::Method;
use tracing::info;

impl ApiClient {
    /// Logs in and persists the issued token for every later request.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthUser> {
        let request = self.request(Method::POST, "/auth/login")?.json(credentials);
        let envelope: AuthEnvelope = Self::fetch_json(request).await?;
        self.tokens().save(&envelope.token)?;

        info!(user = %envelope.user.id, "Logged in");
        Ok(envelope.user)
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthUser> {
        let request = self.request(Method::POST, "/auth/register")?.json(registration);
        let envelope: AuthEnvelope = Self::fetch_json(request).await?;
        self.tokens().save(&envelope.token)?;

        info!(user = %envelope.user.id, "Registered");
        Ok(envelope.user)
    }

    pub async fn verify_token(&self) -> Result<TokenVerification> {
        Self::fetch_json(self.request(Method::GET, "/auth/verify")?).await
    }

    /// Forgets the persisted token. The backend keeps no session to end.
    pub fn logout(&self) -> Result<()> {
        self.tokens().clear()?;
        info!("Logged out");
        Ok(())
    }
}
