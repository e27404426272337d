//! Shared application state.
//!
//! The cart and session are exclusively owned here and exposed to the UI
//! layer only through the services in this crate; nothing outside gets a
//! handle to the inner containers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

use tokio::sync::RwLock;

use melonmart_core::{
    Cart, CartLine, CheckoutTotals, Session, StorefrontGateway, TokenStore, User,
};

/// Process-wide application state plus the external collaborators.
///
/// Lifecycle matches the running application: the cart starts empty and is
/// never persisted; the session is hydrated once at startup from the token
/// store.
pub struct AppContext {
    pub(crate) cart: RwLock<Cart>,
    pub(crate) session: RwLock<Session>,
    pub(crate) tokens: Arc<dyn TokenStore>,
    pub(crate) gateway: Arc<dyn StorefrontGateway>,
    /// Guards against concurrent checkout attempts (double submit).
    pub(crate) checkout_in_flight: AtomicBool,
    /// Bumped whenever the session identity changes; in-flight profile
    /// fetches compare against their snapshot and discard stale results.
    pub(crate) session_generation: AtomicU64,
}

impl AppContext {
    pub fn new(gateway: Arc<dyn StorefrontGateway>, tokens: Arc<dyn TokenStore>) -> Arc<Self> {
        Arc::new(Self {
            cart: RwLock::new(Cart::new()),
            session: RwLock::new(Session::new()),
            tokens,
            gateway,
            checkout_in_flight: AtomicBool::new(false),
            session_generation: AtomicU64::new(0),
        })
    }

    /// The remote storefront API, for read-only browsing from the UI layer.
    pub fn gateway(&self) -> &Arc<dyn StorefrontGateway> {
        &self.gateway
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user().cloned()
    }

    /// Snapshot of the cart lines in insertion order.
    pub async fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.read().await.lines().to_vec()
    }

    /// Totals derived from the cart as it is right now.
    pub async fn totals(&self) -> CheckoutTotals {
        CheckoutTotals::for_cart(&*self.cart.read().await)
    }
}
