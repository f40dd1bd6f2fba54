//! Pricing

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::cart::CartLine;

/// Flat delivery charge in taka, added at display and invoice time only.
pub const DELIVERY_FEE: u64 = 50;

/// Currency every price is quoted in.
pub const CURRENCY: &Currency = iso::BDT;

/// Amount too large to express as money
#[derive(Debug, Error, PartialEq, Eq)]
#[error("amount {0} is out of range")]
pub struct AmountOutOfRange(pub u64);

/// Sum of price times quantity over `lines`.
///
/// Saturates at `u64::MAX`, which [`to_money`] then rejects.
pub fn subtotal(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .map(CartLine::subtotal)
        .fold(0, u64::saturating_add)
}

/// `subtotal` plus [`DELIVERY_FEE`], saturating.
pub fn grand_total(subtotal: u64) -> u64 {
    subtotal.saturating_add(DELIVERY_FEE)
}

/// Convert whole taka into [`Money`].
///
/// # Errors
///
/// Returns an error if `amount` does not fit in an `i64`.
pub fn to_money(amount: u64) -> Result<Money<'static, Currency>, AmountOutOfRange> {
    let major = i64::try_from(amount).map_err(|_err| AmountOutOfRange(amount))?;

    Ok(Money::from_major(major, CURRENCY))
}
