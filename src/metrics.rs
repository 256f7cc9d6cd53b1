use crate::models::Direction;

/// Percentage profit/loss of a position marked at `mark_price`. Zero entry
/// returns 0 rather than dividing — upstream feeds occasionally emit
/// placeholder prices and reporting must not blow up on them.
pub fn pnl_pct(direction: Direction, entry_price: f64, mark_price: f64) -> f64 {
    if entry_price == 0.0 {
        return 0.0;
    }
    match direction {
        Direction::Long => (mark_price - entry_price) / entry_price * 100.0,
        Direction::Short => (entry_price - mark_price) / entry_price * 100.0,
    }
}
