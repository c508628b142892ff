use rust_decimal::Decimal;

use crate::models::chart::{AxisLabel, ChartData, ChartPoint};
use crate::models::price::PricePoint;

/// Number of intervals between y-axis labels (six labels, top to bottom).
const Y_AXIS_INTERVALS: u32 = 5;

/// Prepares the historical price series for the chart component.
///
/// All numbers are computed here; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build chart data from a historical series (oldest first).
    ///
    /// Returns `None` for fewer than two points: there is no line to draw
    /// and the UI shows its "no data" placeholder instead. Also `None` when
    /// `max − min` does not fit a `Decimal`.
    pub fn chart_data(
        &self,
        history: &[PricePoint],
        prev_close: Option<Decimal>,
    ) -> Option<ChartData> {
        if history.len() < 2 {
            return None;
        }

        let prices: Vec<Decimal> = history.iter().map(|p| p.price).collect();
        let min = prices.iter().copied().min()?;
        let max = prices.iter().copied().max()?;
        let last_price = *prices.last()?;
        // a span wider than the Decimal range cannot be drawn
        let range = max.checked_sub(min)?;

        let points = prices
            .iter()
            .map(|&price| ChartPoint {
                value: price.saturating_sub(min),
                show_value: price,
            })
            .collect();

        let y_axis_labels = self.y_axis_labels(min, max, last_price);

        let prev_close_position = prev_close
            .filter(|_| !range.is_zero())
            .and_then(|pc| pc.checked_sub(min))
            .and_then(|offset| offset.checked_div(range))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

        Some(ChartData {
            min,
            max,
            range,
            last_price,
            points,
            y_axis_labels,
            prev_close_position,
        })
    }

    /// Six evenly spaced labels from `max` down to `min`, rounded to whole
    /// units. The label sitting closest to `last_price` shows the exact last
    /// price instead, unless the last price is itself the max or the min.
    pub fn y_axis_labels(&self, min: Decimal, max: Decimal, last_price: Decimal) -> Vec<AxisLabel> {
        let range = max.saturating_sub(min);
        let intervals = Decimal::from(Y_AXIS_INTERVALS);
        let step = range / intervals;

        // Position of the last price on the 0..=5 label scale, counted from the top.
        let last_slot = if range.is_zero() {
            None
        } else {
            last_price
                .saturating_sub(min)
                .checked_div(range)
                .and_then(|ratio| ratio.checked_mul(intervals))
                .map(|offset| intervals.saturating_sub(offset))
        };
        let half = Decimal::new(5, 1);
        let snap_allowed = last_price != max && last_price != min;

        (0..=Y_AXIS_INTERVALS)
            .map(|i| {
                let slot = Decimal::from(i);
                let near_last = last_slot.is_some_and(|s| slot.saturating_sub(s).abs() < half);

                if near_last && snap_allowed {
                    AxisLabel {
                        value: last_price,
                        is_last_price: true,
                    }
                } else {
                    let rounded = round_half_up(max.saturating_sub(step.saturating_mul(slot)));
                    AxisLabel {
                        value: rounded,
                        is_last_price: rounded == last_price,
                    }
                }
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to an integer, halves toward positive infinity.
fn round_half_up(value: Decimal) -> Decimal {
    value.saturating_add(Decimal::new(5, 1)).floor()
}
