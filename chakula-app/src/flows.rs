use std::sync::Arc;

use chakula_catalog::{FoodCourtTable, MenuFilter, MenuItem, NewMenuItem, Outlet};
use chakula_core::PaymentMethod;
use chakula_order::{
    CheckoutError, CheckoutOutcome, CheckoutRequest, Order, OrderStatus, OrderType,
};
use chakula_reservation::{
    NewReservation, Reservation, ReservationCreated, ReservationStatus, ReservationTransitionError,
};
use chrono::Utc;
use tracing::{error, info};

use crate::AppContext;

/// The payment step followed by checkout: validate first, authorize through
/// the gateway (fixed processing delay), then fan the cart out into
/// per-outlet orders.
pub async fn pay_and_checkout(
    ctx: &AppContext,
    method: PaymentMethod,
    order_type: OrderType,
    table_number: &str,
) -> Result<CheckoutOutcome, CheckoutError> {
    let mut cart = ctx.cart.lock().await;
    ctx.checkout.preconditions(&cart, table_number)?;

    let reservations =
        ctx.reservations.my_reservations().await.map_err(CheckoutError::Submission)?;
    let quote = ctx.checkout.quote(&cart, &reservations);

    let payment = ctx
        .gateway
        .authorize(&method, quote.payable_total)
        .await
        .map_err(CheckoutError::Payment)?;

    let request = CheckoutRequest {
        order_type,
        table_number: table_number.to_string(),
        payment,
    };
    ctx.checkout.checkout_with_reservations(&mut cart, &reservations, request).await
}

/// Menu browse load. Fetch failures are logged and degrade to an empty
/// list; the view renders its empty state instead of crashing.
pub async fn load_menu(ctx: &AppContext, filter: &MenuFilter) -> Vec<MenuItem> {
    match ctx.catalog.list_menu_items().await {
        Ok(items) => items.into_iter().filter(|item| filter.matches(item)).collect(),
        Err(err) => {
            error!("menu load failed: {err}");
            Vec::new()
        }
    }
}

pub async fn load_outlets(ctx: &AppContext) -> Vec<Outlet> {
    match ctx.catalog.list_outlets().await {
        Ok(outlets) => outlets,
        Err(err) => {
            error!("outlet load failed: {err}");
            Vec::new()
        }
    }
}

pub async fn load_tables(ctx: &AppContext) -> Vec<FoodCourtTable> {
    match ctx.catalog.list_tables().await {
        Ok(tables) => tables,
        Err(err) => {
            error!("table load failed: {err}");
            Vec::new()
        }
    }
}

/// Owner dashboard: publish a new dish.
pub async fn save_menu_item(
    ctx: &AppContext,
    item: NewMenuItem,
) -> Result<MenuItem, Box<dyn std::error::Error + Send + Sync>> {
    let saved = ctx.catalog.create_menu_item(&item).await?;
    info!(menu_item_id = saved.id, "menu item saved");
    Ok(saved)
}

/// Booking form submit: validate locally, then create the reservation.
pub async fn create_booking(
    ctx: &AppContext,
    request: NewReservation,
) -> Result<ReservationCreated, Box<dyn std::error::Error + Send + Sync>> {
    request.validate(Utc::now(), ctx.config.business_rules.max_guests_per_booking)?;
    let created = ctx.reservations.create_reservation(&request).await?;
    info!(reservation_id = created.reservation_id, "reservation created");
    Ok(created)
}

/// Deposit payment acknowledged; the service moves the booking to confirmed.
pub async fn confirm_reservation(
    ctx: &AppContext,
    reservation_id: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    ctx.reservations.confirm(reservation_id).await?;
    info!(reservation_id, "reservation confirmed");
    Ok(())
}

/// Owner/customer reservation action, gated by the forward-only rule.
pub async fn update_reservation_status(
    ctx: &AppContext,
    reservation: &Reservation,
    next: ReservationStatus,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !reservation.status.can_transition_to(next) {
        return Err(Box::new(ReservationTransitionError { from: reservation.status, to: next }));
    }
    ctx.reservations.update_status(reservation.id, next).await
}

/// One dashboard/history poll tick: fetch orders and reconcile the
/// optimistic tracker against server truth.
pub async fn refresh_orders(ctx: &AppContext) -> Vec<Order> {
    match ctx.orders.list_orders().await {
        Ok(orders) => {
            let rolled_back = ctx.tracker.lock().await.reconcile(&orders);
            if !rolled_back.is_empty() {
                info!(?rolled_back, "rolled back unconfirmed order statuses");
            }
            orders
        }
        Err(err) => {
            error!("order refresh failed: {err}");
            Vec::new()
        }
    }
}

/// Owner action: drive an order one step forward. Applied optimistically,
/// confirmed by the server response; the next poll reconciles on failure.
pub async fn advance_order(
    ctx: &AppContext,
    order_id: i64,
    current: OrderStatus,
    next: OrderStatus,
) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
    ctx.tracker.lock().await.apply_local(order_id, current, next)?;
    match ctx.orders.update_status(order_id, next).await {
        Ok(order) => {
            ctx.tracker.lock().await.confirm(order.id, order.status);
            Ok(order)
        }
        Err(err) => {
            error!("status update failed: {err}");
            Err(err)
        }
    }
}

/// Start the fixed-interval order refresh loop for dashboard/history views.
pub fn start_order_polling(ctx: &Arc<AppContext>) {
    let poll_ctx = ctx.clone();
    let handle = chakula_client::spawn_poller(ctx.poll_interval(), move || {
        let ctx = poll_ctx.clone();
        async move {
            let _ = refresh_orders(&ctx).await;
        }
    });
    ctx.register_poller(handle);
}
