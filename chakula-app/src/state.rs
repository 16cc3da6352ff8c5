use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use chakula_cart::CartStore;
use chakula_catalog::CatalogApi;
use chakula_client::{Config, JsonFileStore, RestClient};
use chakula_core::{KeyValueStore, PaymentGateway, SessionStore, SimulatedGateway};
use chakula_order::{CheckoutOrchestrator, OrderApi, OrderTracker};
use chakula_reservation::{DiscountResolver, ReservationApi};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Explicit dependency-injected state container for the client application.
/// Everything that was ambient in the original UI — cart, session, API
/// access — is wired here once and handed to the flows.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub cart: Mutex<CartStore>,
    pub tracker: Mutex<OrderTracker>,
    pub catalog: Arc<dyn CatalogApi>,
    pub reservations: Arc<dyn ReservationApi>,
    pub orders: Arc<dyn OrderApi>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub checkout: CheckoutOrchestrator,
    pollers: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl AppContext {
    /// Wire the real backends: file-backed local storage, the REST client
    /// and the simulated payment gateway.
    pub fn init(config: Config) -> anyhow::Result<Self> {
        let backend: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.storage.path));
        let session = Arc::new(SessionStore::new(backend.clone()));
        let rest = Arc::new(
            RestClient::new(&config.api, session.clone()).context("building REST client")?,
        );
        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new(
            Duration::from_secs(config.payment.processing_delay_seconds),
        ));
        Ok(Self::with_backends(
            config,
            backend,
            session,
            rest.clone(),
            rest.clone(),
            rest,
            gateway,
        ))
    }

    /// Assemble from explicit collaborators; tests inject fakes here.
    pub fn with_backends(
        config: Config,
        backend: Arc<dyn KeyValueStore>,
        session: Arc<SessionStore>,
        catalog: Arc<dyn CatalogApi>,
        reservations: Arc<dyn ReservationApi>,
        orders: Arc<dyn OrderApi>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let resolver = DiscountResolver::new(config.business_rules.reservation_deposit);
        let checkout = CheckoutOrchestrator::new(
            orders.clone(),
            reservations.clone(),
            session.clone(),
            resolver,
        );
        Self {
            cart: Mutex::new(CartStore::load(backend)),
            tracker: Mutex::new(OrderTracker::new()),
            config,
            session,
            catalog,
            reservations,
            orders,
            gateway,
            checkout,
            pollers: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.polling.interval_seconds)
    }

    pub fn register_poller(&self, handle: JoinHandle<()>) {
        self.pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(handle);
    }

    /// Explicit teardown: stop the background refresh loops.
    pub fn shutdown(&self) {
        let mut pollers = self.pollers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in pollers.drain(..) {
            handle.abort();
        }
    }
}
