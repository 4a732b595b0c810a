//! # Order Logic
//!
//! Totals recomputation and the order status state machine.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line total = quantity × (unit price + Σ modifier deltas)              │
//! │  subtotal   = Σ line totals                                            │
//! │  tax        = round_half_up(subtotal × rate)                           │
//! │  total      = subtotal + tax                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Totals are recomputed from scratch on every line mutation. Nothing is
//! updated incrementally.
//!
//! ## Status Machine
//! ```text
//!   OPEN ◄──► IN_PROGRESS ◄──► DONE
//!     │            │             │
//!     ├────────────┼─────────────┼────► PAID       (terminal)
//!     └────────────┴─────────────┴────► CANCELLED  (terminal)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Order, OrderItem, OrderStatus, SelectedModifier, TaxRate};

// =============================================================================
// Line Totals
// =============================================================================

/// Computes the total of one order line.
///
/// Fails with [`CoreError::NegativeLine`] when discounts push the unit
/// price below zero and [`CoreError::AmountOverflow`] when the result
/// does not fit.
///
/// ## Example
/// ```rust
/// use mesa_core::order::line_total;
/// use mesa_core::{Money, SelectedModifier};
///
/// let cheese = SelectedModifier {
///     modifier_id: "m1".into(),
///     name: "Extra cheese".into(),
///     price_delta_cents: 120,
/// };
/// let total = line_total(Money::from_cents(1000), 2, &[cheese]).unwrap();
/// assert_eq!(total.cents(), 2240);
/// ```
pub fn line_total(
    unit_price: Money,
    quantity: i64,
    modifiers: &[SelectedModifier],
) -> CoreResult<Money> {
    let unit_price = modifiers
        .iter()
        .try_fold(unit_price, |acc, m| {
            acc.checked_add(Money::from_cents(m.price_delta_cents))
        })
        .ok_or(CoreError::AmountOverflow)?;

    if unit_price.is_negative() {
        return Err(CoreError::NegativeLine { unit_price });
    }

    unit_price.checked_mul(quantity).ok_or(CoreError::AmountOverflow)
}

impl OrderItem {
    /// Recomputes this line's total from its own fields.
    pub fn computed_line_total(&self) -> CoreResult<Money> {
        line_total(
            Money::from_cents(self.unit_price_cents),
            self.quantity,
            &self.modifiers,
        )
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Derived money figures of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Computes totals from a subtotal.
    pub fn from_subtotal(subtotal: Money, rate: TaxRate) -> CoreResult<Self> {
        let tax = subtotal.calculate_tax(rate);
        let total = subtotal.checked_add(tax).ok_or(CoreError::AmountOverflow)?;
        Ok(OrderTotals { subtotal, tax, total })
    }

    /// Computes totals over a set of line totals.
    pub fn from_line_totals<I>(line_totals: I, rate: TaxRate) -> CoreResult<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = line_totals
            .into_iter()
            .try_fold(Money::zero(), Money::checked_add)
            .ok_or(CoreError::AmountOverflow)?;
        Self::from_subtotal(subtotal, rate)
    }

    /// Computes totals over order items.
    ///
    /// Line totals are recalculated rather than trusted from storage.
    pub fn compute(items: &[OrderItem], rate: TaxRate) -> CoreResult<Self> {
        let line_totals = items
            .iter()
            .map(OrderItem::computed_line_total)
            .collect::<CoreResult<Vec<_>>>()?;
        Self::from_line_totals(line_totals, rate)
    }
}

// =============================================================================
// Status Transitions
// =============================================================================

/// What an accepted status request does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested status equals the current one.
    Unchanged,
    /// Move to a non-terminal status.
    Move(OrderStatus),
    /// Move to PAID or CANCELLED. The table is released.
    Close(OrderStatus),
}

/// Decides whether `order_id` may move from `from` to `to`.
///
/// ## Rules
/// - same state → [`Transition::Unchanged`]
/// - out of PAID or CANCELLED → [`CoreError::OrderClosed`]
/// - anything else is allowed
pub fn plan_transition(order_id: &str, from: OrderStatus, to: OrderStatus) -> CoreResult<Transition> {
    if from == to {
        return Ok(Transition::Unchanged);
    }

    if from.is_terminal() {
        return Err(CoreError::OrderClosed {
            order_id: order_id.to_string(),
            status: from,
        });
    }

    if to.is_terminal() {
        Ok(Transition::Close(to))
    } else {
        Ok(Transition::Move(to))
    }
}

/// Rejects line mutations on a settled order.
pub fn ensure_modifiable(order_id: &str, status: OrderStatus) -> CoreResult<()> {
    if status.is_terminal() {
        return Err(CoreError::OrderClosed {
            order_id: order_id.to_string(),
            status,
        });
    }
    Ok(())
}

impl Order {
    /// See [`ensure_modifiable`].
    pub fn ensure_modifiable(&self) -> CoreResult<()> {
        ensure_modifiable(&self.id, self.status)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Checks a tendered amount and returns the change due.
///
/// Cash must cover the total. Card charges must equal it exactly.
pub fn settle(
    total: Money,
    method: crate::types::PaymentMethod,
    tendered: Money,
) -> CoreResult<Money> {
    use crate::types::PaymentMethod;

    if tendered.is_negative() {
        return Err(CoreError::InvalidPayment {
            reason: "amount cannot be negative".to_string(),
        });
    }

    match method {
        PaymentMethod::Cash if tendered < total => Err(CoreError::InvalidPayment {
            reason: format!("tendered {} is less than total {}", tendered, total),
        }),
        PaymentMethod::Cash => Ok(tendered - total),
        PaymentMethod::Card if tendered != total => Err(CoreError::InvalidPayment {
            reason: format!("card charge {} must equal total {}", tendered, total),
        }),
        PaymentMethod::Card => Ok(Money::zero()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::Utc;

    fn modifier(delta: i64) -> SelectedModifier {
        SelectedModifier {
            modifier_id: format!("mod-{delta}"),
            name: format!("delta {delta}"),
            price_delta_cents: delta,
        }
    }

    fn item(unit: i64, qty: i64, modifiers: Vec<SelectedModifier>) -> OrderItem {
        OrderItem {
            id: "item".to_string(),
            order_id: "order".to_string(),
            position: 0,
            menu_item_id: "menu".to_string(),
            name: "Burger".to_string(),
            unit_price_cents: unit,
            quantity: qty,
            modifiers,
            special_requests: None,
            // deliberately stale, compute() must not trust it
            line_total_cents: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_total_applies_modifiers_per_unit() {
        let total = line_total(Money::from_cents(1210), 3, &[modifier(120), modifier(-50)]).unwrap();
        assert_eq!(total.cents(), 3 * (1210 + 120 - 50));
    }

    #[test]
    fn test_line_total_without_modifiers() {
        assert_eq!(line_total(Money::from_cents(450), 2, &[]).unwrap().cents(), 900);
    }

    #[test]
    fn test_discount_may_bring_line_to_zero() {
        let total = line_total(Money::from_cents(50), 4, &[modifier(-50)]).unwrap();
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_discount_below_zero_is_rejected() {
        let result = line_total(Money::zero(), 2, &[modifier(-50)]);
        assert!(matches!(
            result,
            Err(CoreError::NegativeLine { unit_price }) if unit_price.cents() == -50
        ));

        let stored = item(100, 1, vec![modifier(-150)]);
        assert!(OrderTotals::compute(&[stored], TaxRate::from_bps(800)).is_err());
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let huge = Money::from_cents(5_000_000_000_000_000_000);
        assert!(matches!(line_total(huge, 2, &[]), Err(CoreError::AmountOverflow)));
        assert!(matches!(
            line_total(Money::from_cents(i64::MAX), 1, &[modifier(1)]),
            Err(CoreError::AmountOverflow)
        ));
    }

    #[test]
    fn test_largest_allowed_line_fits() {
        use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MAX_PRICE_CENTS, MAX_PRICE_DELTA_CENTS};

        let line = line_total(
            Money::from_cents(MAX_PRICE_CENTS),
            MAX_ITEM_QUANTITY,
            &[modifier(MAX_PRICE_DELTA_CENTS)],
        )
        .unwrap();
        assert_eq!(line.cents(), (MAX_PRICE_CENTS + MAX_PRICE_DELTA_CENTS) * MAX_ITEM_QUANTITY);

        // a full order of maximal lines still totals without overflow
        let totals = OrderTotals::from_line_totals(
            std::iter::repeat(line).take(MAX_ORDER_LINES),
            TaxRate::from_bps(10000),
        )
        .unwrap();
        assert_eq!(totals.total.cents(), 2 * line.cents() * MAX_ORDER_LINES as i64);
    }

    #[test]
    fn test_subtotal_overflow_is_an_error() {
        let half = Money::from_cents(i64::MAX / 2 + 1);
        let result = OrderTotals::from_line_totals([half, half], TaxRate::from_bps(800));
        assert!(matches!(result, Err(CoreError::AmountOverflow)));

        let result = OrderTotals::from_subtotal(Money::from_cents(i64::MAX), TaxRate::from_bps(800));
        assert!(matches!(result, Err(CoreError::AmountOverflow)));
    }

    #[test]
    fn test_order_totals() {
        let items = vec![
            item(1000, 2, vec![modifier(150)]), // 2300
            item(450, 1, vec![]),               // 450
        ];
        let totals = OrderTotals::compute(&items, TaxRate::from_bps(800)).unwrap();

        assert_eq!(totals.subtotal.cents(), 2750);
        assert_eq!(totals.tax.cents(), 220);
        assert_eq!(totals.total.cents(), 2970);
    }

    #[test]
    fn test_order_totals_empty() {
        let totals = OrderTotals::compute(&[], TaxRate::from_bps(800)).unwrap();
        assert_eq!(totals, OrderTotals::default());
    }

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        let rate = TaxRate::from_bps(800);
        for subtotal in [0, 1, 6, 7, 99, 1235, 1256, 100_000] {
            let totals = OrderTotals::from_subtotal(Money::from_cents(subtotal), rate).unwrap();
            assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
    }

    #[test]
    fn test_negative_subtotal_tax_matches_rate() {
        let totals = OrderTotals::from_subtotal(Money::from_cents(-50), TaxRate::from_bps(800)).unwrap();
        assert_eq!(totals.tax.cents(), -4);
        assert_eq!(totals.total.cents(), -54);
    }

    #[test]
    fn test_transition_between_open_states() {
        use OrderStatus::*;

        assert_eq!(plan_transition("o", Open, InProgress).unwrap(), Transition::Move(InProgress));
        assert_eq!(plan_transition("o", Done, Open).unwrap(), Transition::Move(Open));
        assert_eq!(plan_transition("o", InProgress, Paid).unwrap(), Transition::Close(Paid));
        assert_eq!(plan_transition("o", Open, Cancelled).unwrap(), Transition::Close(Cancelled));
    }

    #[test]
    fn test_same_state_is_unchanged() {
        use OrderStatus::*;

        assert_eq!(plan_transition("o", Done, Done).unwrap(), Transition::Unchanged);
        assert_eq!(plan_transition("o", Paid, Paid).unwrap(), Transition::Unchanged);
    }

    #[test]
    fn test_terminal_states_are_final() {
        use OrderStatus::*;

        for to in [Open, InProgress, Done, Cancelled] {
            assert!(matches!(
                plan_transition("o", Paid, to),
                Err(CoreError::OrderClosed { status: Paid, .. })
            ));
        }
        for to in [Open, InProgress, Done, Paid] {
            assert!(plan_transition("o", Cancelled, to).is_err());
        }
    }

    #[test]
    fn test_ensure_modifiable() {
        assert!(ensure_modifiable("o", OrderStatus::Open).is_ok());
        assert!(ensure_modifiable("o", OrderStatus::Done).is_ok());
        assert!(ensure_modifiable("o", OrderStatus::Paid).is_err());
        assert!(ensure_modifiable("o", OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn test_settle_cash_returns_change() {
        let change = settle(Money::from_cents(2970), PaymentMethod::Cash, Money::from_cents(3000)).unwrap();
        assert_eq!(change.cents(), 30);
    }

    #[test]
    fn test_settle_rejects_short_cash() {
        let result = settle(Money::from_cents(2970), PaymentMethod::Cash, Money::from_cents(2000));
        assert!(matches!(result, Err(CoreError::InvalidPayment { .. })));
    }

    #[test]
    fn test_settle_card_must_match() {
        assert!(settle(Money::from_cents(500), PaymentMethod::Card, Money::from_cents(500)).is_ok());
        assert!(settle(Money::from_cents(500), PaymentMethod::Card, Money::from_cents(600)).is_err());
    }
}
