//! Session lifecycle: hydrate on start, login, logout, profile edits.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use melonmart_core::{
    HydrationOutcome, LogoutEffect, MartError, ProfileUpdate, Result, User,
};

use crate::context::AppContext;

/// Maintains the single source of truth for "who is logged in" and keeps it
/// consistent with the persisted bearer token.
pub struct SessionService {
    ctx: Arc<AppContext>,
}

impl SessionService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Reconstructs the session from the persisted token at startup.
    ///
    /// Never returns an error: routine session expiry must degrade to
    /// anonymous browsing, not block app start. The outcome keeps the
    /// distinct cases apart:
    ///
    /// - no token stored: no network call is made at all
    /// - token rejected by the server: token purged, stays logged out
    /// - server unreachable: token purged, stays logged out
    /// - session replaced while the fetch was in flight: result discarded
    pub async fn hydrate(&self) -> HydrationOutcome {
        let token = match self.ctx.tokens.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return HydrationOutcome::NoToken,
            Err(err) => {
                warn!(error = %err, "token slot unreadable, starting anonymous");
                return HydrationOutcome::NoToken;
            }
        };

        // The generation is re-read under the session write lock, the same
        // lock `logout` bumps it under. A completion that lost the race can
        // therefore never apply after the logout has finished.
        let generation = self.ctx.session_generation.load(Ordering::SeqCst);
        match self.ctx.gateway.fetch_profile(&token).await {
            Ok(user) => {
                let mut session = self.ctx.session.write().await;
                if self.ctx.session_generation.load(Ordering::SeqCst) != generation {
                    debug!("session changed during hydration, discarding result");
                    return HydrationOutcome::Superseded;
                }
                session.set_user(user);
                debug!("session restored from stored token");
                HydrationOutcome::Restored
            }
            Err(err) => {
                let mut session = self.ctx.session.write().await;
                if self.ctx.session_generation.load(Ordering::SeqCst) != generation {
                    debug!("session changed during hydration, discarding failure");
                    return HydrationOutcome::Superseded;
                }
                if let Err(purge_err) = self.ctx.tokens.purge().await {
                    warn!(error = %purge_err, "failed to purge rejected token");
                }
                session.clear();
                if err.is_network() {
                    warn!(error = %err, "profile fetch unreachable during hydration");
                    HydrationOutcome::Unreachable
                } else {
                    info!(error = %err, "stored token rejected, session expired");
                    HydrationOutcome::InvalidToken
                }
            }
        }
    }

    /// Persists `token` and populates the session from the profile endpoint.
    ///
    /// If the profile fetch fails after the token was stored, the token is
    /// left in place and the error is surfaced; the next hydration settles
    /// whether the token is actually good.
    pub async fn login(&self, token: &str) -> Result<User> {
        self.ctx.tokens.save(token).await?;
        let generation = self.ctx.session_generation.fetch_add(1, Ordering::SeqCst) + 1;
        match self.ctx.gateway.fetch_profile(token).await {
            Ok(user) => {
                let mut session = self.ctx.session.write().await;
                if self.ctx.session_generation.load(Ordering::SeqCst) == generation {
                    session.set_user(user.clone());
                }
                info!(username = %user.username, "logged in");
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed after login, token retained");
                Err(err)
            }
        }
    }

    /// Exchanges username/password credentials, then logs in.
    pub async fn login_with_password(&self, username: &str, password: &str) -> Result<User> {
        let auth = self.ctx.gateway.login(username, password).await?;
        self.login(&auth.token).await
    }

    /// Exchanges a federated (Google) credential, then logs in.
    pub async fn login_with_google(&self, credential: &str) -> Result<User> {
        let auth = self.ctx.gateway.login_with_google(credential).await?;
        self.login(&auth.token).await
    }

    /// Registers a new account. The response shape is backend-defined.
    pub async fn register(&self, username: &str, password: &str) -> Result<serde_json::Value> {
        self.ctx.gateway.register(username, password).await
    }

    /// Purges the token, clears the user, and tells the caller to reset to
    /// the home screen so nothing keeps referencing the old user.
    pub async fn logout(&self) -> LogoutEffect {
        // Bumped while holding the session lock so in-flight completions
        // either see the bump or have already applied and get cleared here.
        let mut session = self.ctx.session.write().await;
        self.ctx.session_generation.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.ctx.tokens.purge().await {
            warn!(error = %err, "failed to purge token on logout");
        }
        session.clear();
        info!("logged out");
        LogoutEffect::NavigateHome
    }

    /// Updates the editable profile fields and refreshes the cached user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let token = self
            .ctx
            .tokens
            .load()
            .await?
            .ok_or(MartError::Unauthenticated)?;
        let user = self.ctx.gateway.update_profile(&token, update).await?;
        self.ctx.session.write().await.set_user(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user, Gate, MemoryTokenStore, MockGateway};
    use melonmart_core::MartError;
    use std::sync::atomic::Ordering;

    fn setup(gateway: MockGateway, token: Option<&str>) -> (Arc<AppContext>, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let tokens = Arc::new(MemoryTokenStore::new(token));
        let ctx = AppContext::new(gateway.clone(), tokens);
        (ctx, gateway)
    }

    #[tokio::test]
    async fn test_hydrate_without_token_skips_network() {
        let (ctx, gateway) = setup(MockGateway::default(), None);
        let service = SessionService::new(ctx.clone());

        assert_eq!(service.hydrate().await, HydrationOutcome::NoToken);
        assert_eq!(gateway.profile_calls.load(Ordering::SeqCst), 0);
        assert!(!ctx.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_hydrate_restores_user_from_valid_token() {
        let (ctx, _) = setup(MockGateway::default(), Some("jwt-good"));
        let service = SessionService::new(ctx.clone());

        assert_eq!(service.hydrate().await, HydrationOutcome::Restored);
        assert_eq!(ctx.current_user().await, Some(sample_user()));
    }

    #[tokio::test]
    async fn test_hydrate_purges_rejected_token() {
        let gateway = MockGateway::default();
        gateway.set_profile_result(Err(MartError::api(401, "Gagal mengambil profil")));
        let (ctx, _) = setup(gateway, Some("jwt-expired"));
        let service = SessionService::new(ctx.clone());

        assert_eq!(service.hydrate().await, HydrationOutcome::InvalidToken);
        assert!(!ctx.is_authenticated().await);
        assert_eq!(ctx.tokens.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hydrate_distinguishes_unreachable_server() {
        let gateway = MockGateway::default();
        gateway.set_profile_result(Err(MartError::network("connection refused")));
        let (ctx, _) = setup(gateway, Some("jwt-unknown"));
        let service = SessionService::new(ctx.clone());

        assert_eq!(service.hydrate().await, HydrationOutcome::Unreachable);
        assert!(!ctx.is_authenticated().await);
        assert_eq!(ctx.tokens.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_during_hydration_discards_stale_profile() {
        let gateway = MockGateway::default();
        let gate = Gate::arm(&gateway);
        let (ctx, _) = setup(gateway, Some("jwt-good"));
        let service = Arc::new(SessionService::new(ctx.clone()));

        let hydrating = {
            let service = service.clone();
            tokio::spawn(async move { service.hydrate().await })
        };
        gate.entered.notified().await;
        assert_eq!(service.logout().await, LogoutEffect::NavigateHome);
        gate.release.notify_one();

        assert_eq!(hydrating.await.unwrap(), HydrationOutcome::Superseded);
        assert!(!ctx.is_authenticated().await);
        assert_eq!(ctx.tokens.load().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_hydrate_racing_logout_never_revives_the_session() {
        for _ in 0..200 {
            let (ctx, _) = setup(MockGateway::default(), Some("jwt-good"));
            let service = Arc::new(SessionService::new(ctx.clone()));

            let hydrating = {
                let service = service.clone();
                tokio::spawn(async move { service.hydrate().await })
            };
            let logging_out = {
                let service = service.clone();
                tokio::spawn(async move { service.logout().await })
            };
            hydrating.await.unwrap();
            logging_out.await.unwrap();

            // Whichever side wins the interleaving, an explicit logout must
            // leave the session anonymous with no stored token.
            assert!(!ctx.is_authenticated().await);
            assert_eq!(ctx.tokens.load().await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_login_populates_session_and_persists_token() {
        let (ctx, _) = setup(MockGateway::default(), None);
        let service = SessionService::new(ctx.clone());

        let user = service.login("jwt-fresh").await.unwrap();
        assert_eq!(user, sample_user());
        assert_eq!(ctx.current_user().await, Some(sample_user()));
        assert_eq!(
            ctx.tokens.load().await.unwrap(),
            Some("jwt-fresh".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_keeps_token_when_profile_fetch_fails() {
        let gateway = MockGateway::default();
        gateway.set_profile_result(Err(MartError::network("connection reset")));
        let (ctx, _) = setup(gateway, None);
        let service = SessionService::new(ctx.clone());

        assert!(service.login("jwt-fresh").await.is_err());
        assert!(!ctx.is_authenticated().await);
        // No rollback: the token stays and the next hydration settles it.
        assert_eq!(
            ctx.tokens.load().await.unwrap(),
            Some("jwt-fresh".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_with_password_exchanges_credentials() {
        let (ctx, gateway) = setup(MockGateway::default(), None);
        let service = SessionService::new(ctx.clone());

        service.login_with_password("budi", "rahasia").await.unwrap();
        assert_eq!(gateway.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            ctx.tokens.load().await.unwrap(),
            Some("jwt-login".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (ctx, _) = setup(MockGateway::default(), Some("jwt-good"));
        let service = SessionService::new(ctx.clone());
        service.hydrate().await;
        assert!(ctx.is_authenticated().await);

        assert_eq!(service.logout().await, LogoutEffect::NavigateHome);
        assert!(!ctx.is_authenticated().await);
        assert_eq!(ctx.tokens.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile_requires_token() {
        let (ctx, gateway) = setup(MockGateway::default(), None);
        let service = SessionService::new(ctx);

        let err = service
            .update_profile(&ProfileUpdate {
                username: "budi-baru".to_string(),
                picture: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MartError::Unauthenticated));
        assert_eq!(gateway.update_profile_calls.load(Ordering::SeqCst), 0);
    }
}
