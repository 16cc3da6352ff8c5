use std::collections::HashSet;

use chakula_cart::CartItem;

use crate::Reservation;

/// Deposit charged per confirmed booking, in cents (500 currency units).
pub const RESERVATION_DEPOSIT: i64 = 500_00;

/// Matches the caller's reservations against the outlets present in the
/// cart. Pure computation; consuming a reservation happens at order
/// submission, not here.
#[derive(Debug, Clone)]
pub struct DiscountResolver {
    deposit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountSummary {
    pub subtotal: i64,
    pub discount_amount: i64,
    /// Subtotal minus discount, floored at zero.
    pub payable_total: i64,
}

impl Default for DiscountResolver {
    fn default() -> Self {
        Self::new(RESERVATION_DEPOSIT)
    }
}

impl DiscountResolver {
    pub fn new(deposit: i64) -> Self {
        Self { deposit }
    }

    /// A reservation applies iff it is confirmed, its fee has not already
    /// been deducted, and its outlet is represented among the cart lines.
    pub fn applicable<'a>(
        &self,
        items: &[CartItem],
        reservations: &'a [Reservation],
    ) -> Vec<&'a Reservation> {
        let outlets: HashSet<i64> = items.iter().map(|line| line.outlet_id).collect();
        reservations
            .iter()
            .filter(|r| r.is_discount_eligible() && outlets.contains(&r.outlet_id))
            .collect()
    }

    pub fn resolve(&self, items: &[CartItem], reservations: &[Reservation]) -> DiscountSummary {
        let subtotal: i64 = items.iter().map(CartItem::line_total).sum();
        let discount_amount = self.applicable(items, reservations).len() as i64 * self.deposit;
        DiscountSummary {
            subtotal,
            discount_amount,
            payable_total: (subtotal - discount_amount).max(0),
        }
    }
}
