//! SVG candlestick chart rendering.
//!
//! Up bars (close >= open) draw green, down bars red; each bar is a thick
//! body over a thin high/low wick.

use crate::domain::ohlcv::OhlcvBar;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 40.0;

pub fn render_candle_chart(bars: &[OhlcvBar], title: &str) -> String {
    if bars.is_empty() {
        return "No price data available.".to_string();
    }

    let min_price = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let max_price = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_price - min_price;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let y = |price: f64| HEIGHT - PADDING - (price - min_price) * scale_y;

    let slot = plot_width / bars.len() as f64;
    let body_width = (slot * 0.4).max(1.0);
    let wick_width = (slot * 0.05).max(0.5);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">
<rect width="{WIDTH:.0}" height="{HEIGHT:.0}" fill="white"/>
<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>
"#,
        WIDTH / 2.0,
        PADDING / 2.0,
        title,
    );

    for (i, bar) in bars.iter().enumerate() {
        let cx = PADDING + (i as f64 + 0.5) * slot;
        let color = if bar.is_bullish() { "green" } else { "red" };

        svg.push_str(&format!(
            r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="{color}" stroke-width="{wick_width:.2}"/>
"#,
            y(bar.high),
            y(bar.low),
        ));

        let body_top = y(bar.open.max(bar.close));
        let body_bottom = y(bar.open.min(bar.close));
        let body_height = (body_bottom - body_top).max(1.0);

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{body_top:.1}" width="{body_width:.1}" height="{body_height:.1}" fill="{color}"/>
"#,
            cx - body_width / 2.0,
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">Date</text>
<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 {:.1} {:.1})">Price</text>
</svg>
"#,
        WIDTH / 2.0,
        HEIGHT - PADDING / 4.0,
        PADDING / 4.0,
        HEIGHT / 2.0,
        PADDING / 4.0,
        HEIGHT / 2.0,
    ));

    svg
}
