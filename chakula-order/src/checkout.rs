use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chakula_cart::{CartItem, CartStore};
use chakula_core::{AuthUser, PaymentMethod, SessionStore};
use chakula_reservation::{DiscountResolver, DiscountSummary, Reservation, ReservationApi};
use chrono::Utc;
use futures_util::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Order, OrderApi, OrderDraft, OrderItem, OrderStatus, OrderType};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("a table number is required")]
    MissingTableNumber,

    #[error("sign in to place an order")]
    NotAuthenticated,

    #[error("payment authorization failed: {0}")]
    Payment(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("order submission failed: {0}")]
    Submission(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// What the customer chose in the payment step. The payment info must
/// already be authorized and masked by the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub order_type: OrderType,
    pub table_number: String,
    pub payment: PaymentMethod,
}

/// Signal for the caller to close the payment UI and navigate to tracking.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub orders: Vec<Order>,
    pub discount: DiscountSummary,
}

/// Fans the cart out into one order per outlet and submits them behind an
/// all-or-nothing barrier. A cart spanning N outlets always becomes N
/// independent orders, never a single multi-outlet one.
pub struct CheckoutOrchestrator {
    orders: Arc<dyn OrderApi>,
    reservations: Arc<dyn ReservationApi>,
    session: Arc<SessionStore>,
    resolver: DiscountResolver,
    attempt: Mutex<Option<Uuid>>,
}

impl CheckoutOrchestrator {
    pub fn new(
        orders: Arc<dyn OrderApi>,
        reservations: Arc<dyn ReservationApi>,
        session: Arc<SessionStore>,
        resolver: DiscountResolver,
    ) -> Self {
        Self { orders, reservations, session, resolver, attempt: Mutex::new(None) }
    }

    /// Validation runs before any gateway or network call: non-empty cart,
    /// a non-blank table number, an authenticated customer.
    pub fn preconditions(
        &self,
        cart: &CartStore,
        table_number: &str,
    ) -> Result<AuthUser, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if table_number.trim().is_empty() {
            return Err(CheckoutError::MissingTableNumber);
        }
        self.session.current_user().ok_or(CheckoutError::NotAuthenticated)
    }

    /// The amounts the payment step shows and charges.
    pub fn quote(&self, cart: &CartStore, reservations: &[Reservation]) -> DiscountSummary {
        self.resolver.resolve(cart.items(), reservations)
    }

    /// Fetches the caller's reservations, then submits.
    pub async fn checkout(
        &self,
        cart: &mut CartStore,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.preconditions(cart, &request.table_number)?;
        let reservations =
            self.reservations.my_reservations().await.map_err(CheckoutError::Submission)?;
        self.checkout_with_reservations(cart, &reservations, request).await
    }

    /// Submits against an already-fetched reservation list. On full success
    /// the cart is cleared; on any failure it is left untouched and this
    /// attempt's idempotency key is kept so a retry resubmits the same key.
    pub async fn checkout_with_reservations(
        &self,
        cart: &mut CartStore,
        reservations: &[Reservation],
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let customer = self.preconditions(cart, &request.table_number)?;
        let discount = self.quote(cart, reservations);
        let applicable = self.resolver.applicable(cart.items(), reservations);
        let attempt = self.begin_attempt();
        let created_at = Utc::now();
        let table_number = request.table_number.trim().to_string();

        let mut consumed: HashSet<i64> = HashSet::new();
        let drafts: Vec<OrderDraft> = partition_by_outlet(cart.items())
            .into_iter()
            .map(|(outlet_id, lines)| {
                // At most one reservation offsets each outlet's order.
                let reservation_id = applicable
                    .iter()
                    .find(|r| r.outlet_id == outlet_id && !consumed.contains(&r.id))
                    .map(|r| {
                        consumed.insert(r.id);
                        r.id
                    });
                OrderDraft {
                    customer_id: customer.id,
                    outlet_id,
                    total_amount: lines.iter().map(CartItem::line_total).sum(),
                    status: OrderStatus::Pending,
                    created_at,
                    order_type: request.order_type,
                    table_number: table_number.clone(),
                    reservation_id,
                    order_items: lines
                        .iter()
                        .map(|line| OrderItem {
                            menu_item_id: line.menu_item_id,
                            quantity: line.quantity,
                            price: line.price,
                        })
                        .collect(),
                    payment_info: request.payment.clone(),
                    idempotency_key: format!("{attempt}:{outlet_id}"),
                }
            })
            .collect();

        info!(groups = drafts.len(), "submitting checkout fan-out");

        // Every submission runs to completion; siblings are not aborted when
        // one fails. Success is all-or-nothing, with no compensating
        // rollback of orders that did get created.
        let results = join_all(drafts.iter().map(|draft| self.orders.create_order(draft))).await;

        let mut orders = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(order) => orders.push(order),
                Err(err) => failure = failure.or(Some(err)),
            }
        }

        if let Some(err) = failure {
            warn!("checkout failed, cart preserved for retry: {err}");
            return Err(CheckoutError::Submission(err));
        }

        cart.clear();
        self.finish_attempt();
        info!(orders = orders.len(), "checkout complete");
        Ok(CheckoutOutcome { orders, discount })
    }

    /// Reuses the key of a failed attempt so a retry stays deduplicable
    /// server-side instead of minting duplicate orders.
    fn begin_attempt(&self) -> Uuid {
        let mut slot = self.attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot.get_or_insert_with(Uuid::new_v4)
    }

    fn finish_attempt(&self) {
        let mut slot = self.attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}

/// Groups cart lines by outlet, preserving first-seen outlet order.
fn partition_by_outlet(items: &[CartItem]) -> Vec<(i64, Vec<CartItem>)> {
    let mut groups: Vec<(i64, Vec<CartItem>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(outlet_id, _)| *outlet_id == item.outlet_id) {
            Some((_, lines)) => lines.push(item.clone()),
            None => groups.push((item.outlet_id, vec![item.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chakula_core::{AuthUser, MemoryStore, UserRole};
    use chakula_reservation::{NewReservation, ReservationCreated, ReservationStatus};
    use std::sync::atomic::{AtomicI64, Ordering};

    struct FakeOrderApi {
        created: Mutex<Vec<OrderDraft>>,
        fail_outlets: Mutex<HashSet<i64>>,
        next_id: AtomicI64,
    }

    impl FakeOrderApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                created: Mutex::new(Vec::new()),
                fail_outlets: Mutex::new(HashSet::new()),
                next_id: AtomicI64::new(1),
            })
        }

        fn fail_outlet(&self, outlet_id: i64) {
            self.fail_outlets.lock().unwrap().insert(outlet_id);
        }

        fn heal(&self) {
            self.fail_outlets.lock().unwrap().clear();
        }

        fn drafts(&self) -> Vec<OrderDraft> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl OrderApi for FakeOrderApi {
        async fn create_order(
            &self,
            draft: &OrderDraft,
        ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
            self.created.lock().unwrap().push(draft.clone());
            if self.fail_outlets.lock().unwrap().contains(&draft.outlet_id) {
                return Err("outlet unavailable".into());
            }
            Ok(Order {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                customer_id: draft.customer_id,
                outlet_id: draft.outlet_id,
                total_amount: draft.total_amount,
                status: draft.status,
                created_at: draft.created_at,
                order_type: draft.order_type,
                table_number: draft.table_number.clone(),
                reservation_id: draft.reservation_id,
                order_items: draft.order_items.clone(),
                payment_info: Some(draft.payment_info.clone()),
            })
        }

        async fn list_orders(&self) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Vec::new())
        }

        async fn update_status(
            &self,
            _order_id: i64,
            _status: OrderStatus,
        ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
            Err("not used".into())
        }
    }

    struct FakeReservationApi {
        reservations: Vec<Reservation>,
        calls: AtomicI64,
    }

    impl FakeReservationApi {
        fn new(reservations: Vec<Reservation>) -> Arc<Self> {
            Arc::new(Self { reservations, calls: AtomicI64::new(0) })
        }
    }

    #[async_trait::async_trait]
    impl ReservationApi for FakeReservationApi {
        async fn create_reservation(
            &self,
            _req: &NewReservation,
        ) -> Result<ReservationCreated, Box<dyn std::error::Error + Send + Sync>> {
            Ok(ReservationCreated { reservation_id: 1 })
        }

        async fn my_reservations(
            &self,
        ) -> Result<Vec<Reservation>, Box<dyn std::error::Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reservations.clone())
        }

        async fn update_status(
            &self,
            _id: i64,
            _status: ReservationStatus,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        async fn confirm(&self, _id: i64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }

        async fn reassign_table(
            &self,
            _id: i64,
            _table_id: i64,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    fn signed_in_session() -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        let user = AuthUser {
            id: 7,
            email: "amina@example.com".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            role: UserRole::Customer,
            outlet_id: None,
            phone_number: None,
        };
        session.store_session("tok-123", &user).unwrap();
        session
    }

    fn line(menu_item_id: i64, outlet_id: i64, price: i64, quantity: u32) -> CartItem {
        CartItem {
            menu_item_id,
            name: format!("item-{menu_item_id}"),
            price,
            quantity,
            outlet_id,
            outlet_name: format!("outlet-{outlet_id}"),
        }
    }

    fn two_outlet_cart() -> CartStore {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()));
        cart.add_item(line(1, 10, 450_00, 2));
        cart.add_item(line(2, 10, 150_00, 1));
        cart.add_item(line(3, 20, 600_00, 1));
        cart
    }

    fn confirmed_reservation(id: i64, outlet_id: i64) -> Reservation {
        Reservation {
            id,
            customer_id: 7,
            outlet_id,
            table_id: 1,
            status: ReservationStatus::Confirmed,
            is_fee_deducted: false,
            number_of_guests: 2,
            time_reserved_for: Utc::now(),
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            order_type: OrderType::DineIn,
            table_number: "12".to_string(),
            payment: PaymentMethod::Cash,
        }
    }

    fn orchestrator(
        orders: Arc<FakeOrderApi>,
        reservations: Arc<FakeReservationApi>,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(orders, reservations, signed_in_session(), DiscountResolver::default())
    }

    #[tokio::test]
    async fn test_checkout_fans_out_one_order_per_outlet() {
        let api = FakeOrderApi::new();
        let orchestrator = orchestrator(api.clone(), FakeReservationApi::new(Vec::new()));
        let mut cart = two_outlet_cart();

        let outcome = orchestrator.checkout(&mut cart, request()).await.unwrap();
        assert_eq!(outcome.orders.len(), 2);

        let drafts = api.drafts();
        assert_eq!(drafts.len(), 2);

        let first = drafts.iter().find(|d| d.outlet_id == 10).unwrap();
        assert_eq!(first.total_amount, 450_00 * 2 + 150_00);
        assert!(first.order_items.iter().all(|i| [1, 2].contains(&i.menu_item_id)));

        let second = drafts.iter().find(|d| d.outlet_id == 20).unwrap();
        assert_eq!(second.total_amount, 600_00);
        assert_eq!(second.order_items.len(), 1);

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_reservation_consumed_by_matching_outlet_only() {
        let api = FakeOrderApi::new();
        let reservations = FakeReservationApi::new(vec![confirmed_reservation(41, 10)]);
        let orchestrator = orchestrator(api.clone(), reservations);
        let mut cart = two_outlet_cart();

        let outcome = orchestrator.checkout(&mut cart, request()).await.unwrap();
        assert_eq!(outcome.discount.discount_amount, chakula_reservation::RESERVATION_DEPOSIT);

        let drafts = api.drafts();
        assert_eq!(drafts.iter().find(|d| d.outlet_id == 10).unwrap().reservation_id, Some(41));
        assert_eq!(drafts.iter().find(|d| d.outlet_id == 20).unwrap().reservation_id, None);
    }

    #[tokio::test]
    async fn test_second_reservation_for_same_outlet_is_not_consumed() {
        let api = FakeOrderApi::new();
        let reservations =
            FakeReservationApi::new(vec![confirmed_reservation(41, 10), confirmed_reservation(42, 10)]);
        let orchestrator = orchestrator(api.clone(), reservations);
        let mut cart = two_outlet_cart();

        orchestrator.checkout(&mut cart, request()).await.unwrap();

        let drafts = api.drafts();
        assert_eq!(drafts.iter().find(|d| d.outlet_id == 10).unwrap().reservation_id, Some(41));
        assert_eq!(drafts.iter().find(|d| d.outlet_id == 20).unwrap().reservation_id, None);
    }

    #[tokio::test]
    async fn test_blank_table_number_rejected_before_any_network_call() {
        let api = FakeOrderApi::new();
        let reservations = FakeReservationApi::new(Vec::new());
        let orchestrator = orchestrator(api.clone(), reservations.clone());
        let mut cart = two_outlet_cart();

        let mut req = request();
        req.table_number = "   ".to_string();

        let err = orchestrator.checkout(&mut cart, req).await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingTableNumber));
        assert!(api.drafts().is_empty());
        assert_eq!(reservations.calls.load(Ordering::SeqCst), 0);
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let orchestrator = orchestrator(FakeOrderApi::new(), FakeReservationApi::new(Vec::new()));
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()));

        let err = orchestrator.checkout(&mut cart, request()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_signed_out_customer_rejected() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        let orchestrator = CheckoutOrchestrator::new(
            FakeOrderApi::new(),
            FakeReservationApi::new(Vec::new()),
            session,
            DiscountResolver::default(),
        );
        let mut cart = two_outlet_cart();

        let err = orchestrator.checkout(&mut cart, request()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_partial_failure_fails_whole_checkout_and_preserves_cart() {
        let api = FakeOrderApi::new();
        api.fail_outlet(20);
        let orchestrator = orchestrator(api.clone(), FakeReservationApi::new(Vec::new()));
        let mut cart = two_outlet_cart();
        let before = cart.items().to_vec();

        let err = orchestrator.checkout(&mut cart, request()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));

        // Both submissions were dispatched; the failure of one sank the lot.
        assert_eq!(api.drafts().len(), 2);
        assert_eq!(cart.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_retry_after_failure_reuses_idempotency_key() {
        let api = FakeOrderApi::new();
        api.fail_outlet(20);
        let orchestrator = orchestrator(api.clone(), FakeReservationApi::new(Vec::new()));
        let mut cart = two_outlet_cart();

        orchestrator.checkout(&mut cart, request()).await.unwrap_err();
        let first_keys: Vec<String> =
            api.drafts().iter().map(|d| d.idempotency_key.clone()).collect();

        api.heal();
        orchestrator.checkout(&mut cart, request()).await.unwrap();
        let retry_keys: Vec<String> =
            api.drafts().iter().skip(2).map(|d| d.idempotency_key.clone()).collect();

        assert_eq!(first_keys, retry_keys);
        assert!(cart.is_empty());

        // A fresh checkout after success gets a fresh attempt key.
        cart.add_item(line(9, 10, 100_00, 1));
        orchestrator.checkout(&mut cart, request()).await.unwrap();
        let fresh_drafts = api.drafts();
        let fresh_key = &fresh_drafts.last().unwrap().idempotency_key;
        assert!(!first_keys.contains(fresh_key));
    }
}
