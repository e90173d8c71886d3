use crate::client::{ApiClient, Result};
use pawpost_common::model::{
    auth::{LoginRequest, RegisterRequest},
    user::User,
};
use tracing::{debug, info, warn};

/// The signed-in (or anonymous) viewer, passed explicitly to whatever needs it.
///
/// Created by [`Session::restore`] when the application starts and torn down
/// by [`Session::logout`].
#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn anonymous(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    /// Validates a persisted token by loading the current user. A token the
    /// backend rejects is discarded and the session starts anonymous.
    pub async fn restore(client: ApiClient) -> Self {
        let mut session = Self::anonymous(client);

        match session.client.has_token() {
            Ok(true) => {}
            Ok(false) => {
                debug!("No persisted token, starting anonymous session");
                return session;
            }
            Err(err) => {
                warn!(error = %err, "Persisted token could not be read");
                return session;
            }
        }

        if let Err(err) = session.refresh_user().await {
            warn!(error = %err, "Persisted token was not accepted");
        }

        session
    }

    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<&User> {
        self.client.login(credentials).await?;
        self.refresh_user().await
    }

    pub async fn register(&mut self, registration: &RegisterRequest) -> Result<&User> {
        self.client.register(registration).await?;
        self.refresh_user().await
    }

    /// Reloads the current user. Failure ends the session.
    pub async fn refresh_user(&mut self) -> Result<&User> {
        match self.client.current_user().await {
            Ok(user) => {
                info!(user = %user.id, username = %user.username, "Session active");
                Ok(self.user.insert(user))
            }
            Err(err) => {
                self.user = None;
                if let Err(clear_err) = self.client.logout() {
                    warn!(error = %clear_err, "Rejected token could not be cleared");
                }
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        self.client.logout()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
