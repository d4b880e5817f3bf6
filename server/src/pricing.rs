//! Ticket price arithmetic.
//!
//! Every amount charged is derived here from stored rows; nothing the client
//! sends about prices is trusted.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Event, TicketType};

/// Minor currency units per major unit (paise per rupee).
pub const MINOR_UNITS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Price of a single ticket before discount.
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    /// Total in major units, never negative.
    pub total: Decimal,
    /// `total` rounded half-up to an integer number of minor units.
    pub amount_minor: i64,
}

impl Quote {
    pub fn is_free(&self) -> bool {
        self.amount_minor == 0
    }
}

/// A ticket type's price wins over the event's legacy flat price.
pub fn resolve_unit_price(event: &Event, ticket_type: Option<&TicketType>) -> Decimal {
    match ticket_type {
        Some(tt) => tt.price,
        None => event.price,
    }
}

/// Subtracts `percent` of `unit` and clamps at zero. Out-of-range percentages
/// are clamped into `[0, 100]`.
pub fn apply_discount(unit: Decimal, percent: Decimal) -> Decimal {
    let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let discount = unit * percent / Decimal::ONE_HUNDRED;
    (unit - discount).max(Decimal::ZERO)
}

pub fn quote(unit_price: Decimal, discount_percent: Option<Decimal>, quantity: u32) -> Quote {
    let discount_percent = discount_percent.unwrap_or(Decimal::ZERO);
    let per_ticket = apply_discount(unit_price.max(Decimal::ZERO), discount_percent);
    let total = (per_ticket * Decimal::from(quantity)).max(Decimal::ZERO);

    Quote {
        unit_price,
        discount_percent,
        total,
        amount_minor: to_minor_units(total),
    }
}

/// Rounds half away from zero, which for the non-negative totals produced
/// here is ordinary half-up rounding.
pub fn to_minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::from(MINOR_UNITS))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}
