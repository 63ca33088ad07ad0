//! Inline SVG candlestick chart with volume panel and trade markers.

use chrono::NaiveDate;
use journal_core::types::{first_on_or_after, Direction, PriceBar, TradeRecord};
use num_traits::ToPrimitive;

const UP_COLOR: &str = "#e53935";
const DOWN_COLOR: &str = "#2e7d32";
const GRID_COLOR: &str = "#e0e0e0";
const AXIS_COLOR: &str = "#666";

const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 36.0;
const PAD_BOTTOM: f64 = 40.0;
const PANEL_GAP: f64 = 18.0;
const MARKER_SIZE: f64 = 7.0;

/// Chart canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// A trade placed on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeMarker {
    pub date: NaiveDate,
    pub direction: Direction,
    pub price: f64,
    /// Index of the bar the marker sits on
    pub bar_index: usize,
}

/// Place each trade on the first bar dated on or after it.
///
/// The marker uses the trade's own price; unpriced trades sit on the bar's
/// low (buys) or high (sells). Trades after the last bar are not drawn.
pub fn place_markers<'a, I>(bars: &[PriceBar], trades: I) -> Vec<TradeMarker>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    trades
        .into_iter()
        .filter_map(|trade| {
            let bar_index = first_on_or_after(bars, trade.date)?;
            let bar = &bars[bar_index];
            let fallback = match trade.direction {
                Direction::Buy => bar.low,
                Direction::Sell => bar.high,
            };
            let price = trade.price.and_then(|p| p.to_f64()).unwrap_or(fallback);

            Some(TradeMarker {
                date: trade.date,
                direction: trade.direction,
                price,
                bar_index,
            })
        })
        .collect()
}

/// Linear map from a value range onto a pixel range (inverted for y).
struct Scale {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl Scale {
    fn y(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return (self.top + self.bottom) / 2.0;
        }
        self.bottom - (value - self.min) / span * (self.bottom - self.top)
    }
}

/// Render the chart. Returns an empty string when there are no bars.
pub fn candlestick_svg(bars: &[PriceBar], markers: &[TradeMarker], size: ChartSize) -> String {
    if bars.is_empty() {
        return String::new();
    }

    let plot_width = (size.width - PAD_LEFT - PAD_RIGHT).max(1.0);
    let plot_height = (size.height - PAD_TOP - PAD_BOTTOM - PANEL_GAP).max(1.0);
    // 80% price, 20% volume
    let price_bottom = PAD_TOP + plot_height * 0.8;
    let volume_top = price_bottom + PANEL_GAP;
    let volume_bottom = size.height - PAD_BOTTOM;

    let slot = plot_width / bars.len() as f64;
    let body_width = (slot * 0.7).max(1.0);
    let x_center = |i: usize| PAD_LEFT + slot * (i as f64 + 0.5);

    let marker_prices = markers.iter().map(|m| m.price);
    let low = bars
        .iter()
        .map(|b| b.low)
        .chain(marker_prices.clone())
        .fold(f64::INFINITY, f64::min);
    let high = bars
        .iter()
        .map(|b| b.high)
        .chain(marker_prices)
        .fold(f64::NEG_INFINITY, f64::max);
    let margin = ((high - low) * 0.05).max(0.01);
    let price = Scale {
        min: low - margin,
        max: high + margin,
        top: PAD_TOP,
        bottom: price_bottom,
    };
    let max_volume = bars.iter().map(|b| b.volume).fold(0.0, f64::max);
    let volume = Scale {
        min: 0.0,
        max: max_volume,
        top: volume_top,
        bottom: volume_bottom,
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="100%" font-family="Arial, sans-serif" font-size="12">
<rect width="{w:.0}" height="{h:.0}" fill="white"/>
"##,
        w = size.width,
        h = size.height,
    ));

    // Price grid and labels
    for step in 0..=4 {
        let value = price.min + (price.max - price.min) * step as f64 / 4.0;
        let y = price.y(value);
        svg.push_str(&format!(
            r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{GRID_COLOR}"/>
<text x="{lx:.1}" y="{ty:.1}" text-anchor="end" fill="{AXIS_COLOR}">{value:.2}</text>
"#,
            x1 = PAD_LEFT,
            x2 = PAD_LEFT + plot_width,
            lx = PAD_LEFT - 6.0,
            ty = y + 4.0,
        ));
    }

    // Date labels
    let label_every = (bars.len() / 8).max(1);
    for (i, bar) in bars.iter().enumerate().step_by(label_every) {
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" fill="{AXIS_COLOR}">{date}</text>
"#,
            x = x_center(i),
            y = size.height - PAD_BOTTOM + 16.0,
            date = bar.date.format("%Y-%m-%d"),
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" fill="{AXIS_COLOR}">成交量</text>
"#,
        x = PAD_LEFT + 4.0,
        y = volume_top + 12.0,
    ));

    for (i, bar) in bars.iter().enumerate() {
        let color = if bar.is_rising() { UP_COLOR } else { DOWN_COLOR };
        let x = x_center(i);
        let body_top = price.y(bar.open.max(bar.close));
        let body_height = (price.y(bar.open.min(bar.close)) - body_top).max(1.0);
        let volume_y = volume.y(bar.volume);

        svg.push_str(&format!(
            r#"<g><title>{date} 开:{o:.2} 高:{hi:.2} 低:{lo:.2} 收:{c:.2} 量:{v:.0}</title><line x1="{x:.1}" y1="{wy1:.1}" x2="{x:.1}" y2="{wy2:.1}" stroke="{color}"/><rect x="{bx:.1}" y="{by:.1}" width="{bw:.1}" height="{bh:.1}" fill="{color}"/></g>
<rect x="{bx:.1}" y="{vy:.1}" width="{bw:.1}" height="{vh:.1}" fill="{color}" opacity="0.7"/>
"#,
            date = bar.date.format("%Y-%m-%d"),
            o = bar.open,
            hi = bar.high,
            lo = bar.low,
            c = bar.close,
            v = bar.volume,
            wy1 = price.y(bar.high),
            wy2 = price.y(bar.low),
            bx = x - body_width / 2.0,
            by = body_top,
            bw = body_width,
            bh = body_height,
            vy = volume_y,
            vh = (volume_bottom - volume_y).max(0.0),
        ));
    }

    for marker in markers {
        let x = x_center(marker.bar_index);
        let y = price.y(marker.price);
        let (points, color) = match marker.direction {
            // Tip touches the price from below
            Direction::Buy => (
                format!(
                    "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                    x,
                    y,
                    x - MARKER_SIZE,
                    y + MARKER_SIZE * 1.6,
                    x + MARKER_SIZE,
                    y + MARKER_SIZE * 1.6
                ),
                UP_COLOR,
            ),
            Direction::Sell => (
                format!(
                    "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                    x,
                    y,
                    x - MARKER_SIZE,
                    y - MARKER_SIZE * 1.6,
                    x + MARKER_SIZE,
                    y - MARKER_SIZE * 1.6
                ),
                DOWN_COLOR,
            ),
        };
        svg.push_str(&format!(
            r#"<polygon class="marker-{kind}" points="{points}" fill="{color}" stroke="white"><title>{label} {price:.2} 日期: {date}</title></polygon>
"#,
            kind = marker.direction.to_string().to_lowercase(),
            label = marker.direction.label(),
            price = marker.price,
            date = marker.date.format("%Y-%m-%d"),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn bars() -> Vec<PriceBar> {
        vec![
            PriceBar::new(day(2), 10.0, 10.8, 9.8, 10.5, 1000.0),
            PriceBar::new(day(3), 10.5, 10.6, 9.9, 10.0, 800.0),
            PriceBar::new(day(5), 10.0, 11.2, 9.95, 11.0, 1500.0),
        ]
    }

    #[test]
    fn test_marker_prices() {
        let trades = vec![
            TradeRecord::new(day(2), "000001", Direction::Buy, Some(dec!(10.2))),
            TradeRecord::new(day(4), "000001", Direction::Sell, None),
            TradeRecord::new(day(1), "000001", Direction::Buy, None),
            TradeRecord::new(day(9), "000001", Direction::Sell, Some(dec!(11))),
        ];
        let markers = place_markers(&bars(), &trades);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].price, 10.2);
        assert_eq!(markers[0].bar_index, 0);
        // Holiday sell lands on the next bar's high
        assert_eq!(markers[1].bar_index, 2);
        assert_eq!(markers[1].price, 11.2);
        // Buy before the first bar uses that bar's low
        assert_eq!(markers[2].price, 9.8);
    }

    #[test]
    fn test_svg_contents() {
        let bars = bars();
        let trades = vec![
            TradeRecord::new(day(2), "000001", Direction::Buy, Some(dec!(10.2))),
            TradeRecord::new(day(5), "000001", Direction::Sell, Some(dec!(11))),
        ];
        let markers = place_markers(&bars, &trades);
        let svg = candlestick_svg(&bars, &markers, ChartSize::default());

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.matches(UP_COLOR).count() >= 4);
        assert!(svg.contains(DOWN_COLOR));
        assert!(svg.contains("class=\"marker-buy\""));
        assert!(svg.contains("class=\"marker-sell\""));
        assert!(svg.contains("买入 10.20"));
        assert!(svg.contains("成交量"));
    }

    #[test]
    fn test_empty_and_flat_series() {
        assert!(candlestick_svg(&[], &[], ChartSize::default()).is_empty());

        let flat = vec![PriceBar::new(day(2), 5.0, 5.0, 5.0, 5.0, 0.0)];
        let svg = candlestick_svg(&flat, &[], ChartSize::default());
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }
}
