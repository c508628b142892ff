use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point of the price chart, shifted so the series minimum sits at zero.
///
/// Generated by the core; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// `price − min`, what the line is drawn from
    pub value: Decimal,

    /// The real price, shown in the pointer label
    pub show_value: Decimal,
}

/// One of the six labels on the y-axis, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub value: Decimal,

    /// Highlight this label: it shows the latest price
    pub is_last_price: bool,
}

/// Everything the price chart needs to draw the historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub min: Decimal,
    pub max: Decimal,

    /// `max − min`
    pub range: Decimal,

    /// Latest price in the series
    pub last_price: Decimal,

    pub points: Vec<ChartPoint>,

    pub y_axis_labels: Vec<AxisLabel>,

    /// Where the previous-close line sits, in percent from the bottom.
    /// `None` if no previous close is known or the series is flat.
    pub prev_close_position: Option<Decimal>,
}
