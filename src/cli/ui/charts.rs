use rust_decimal::prelude::ToPrimitive;
use spendwise_core::{CategorySlice, MonthlyBar};

use super::format_amount;

const BAR_GLYPH: char = '█';

/// Horizontal bars of expense per category, with each category's share.
pub fn render_category_chart(slices: &[CategorySlice], width: usize, currency: &str) -> String {
    if slices.is_empty() {
        return "No expenses recorded.".to_string();
    }
    let rows: Vec<(String, f64, String)> = slices
        .iter()
        .map(|slice| {
            let detail = format!(
                "{} ({:.0}%)",
                format_amount(currency, slice.amount),
                slice.share * 100.0
            );
            (
                capitalize(&slice.category),
                slice.amount.to_f64().unwrap_or(0.0),
                detail,
            )
        })
        .collect();
    render_bars(&rows, width)
}

/// Horizontal bars of expense per month, January first.
pub fn render_monthly_chart(bars: &[MonthlyBar], width: usize, currency: &str) -> String {
    if bars.is_empty() {
        return "No monthly expenses recorded.".to_string();
    }
    let rows: Vec<(String, f64, String)> = bars
        .iter()
        .map(|bar| {
            (
                bar.month.label().to_string(),
                bar.amount.to_f64().unwrap_or(0.0),
                format_amount(currency, bar.amount),
            )
        })
        .collect();
    render_bars(&rows, width)
}

fn render_bars(rows: &[(String, f64, String)], width: usize) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = rows.iter().map(|(_, value, _)| *value).fold(0.0, f64::max);

    rows.iter()
        .map(|(label, value, detail)| {
            let length = bar_length(*value, max, width);
            let bar: String = std::iter::repeat(BAR_GLYPH).take(length).collect();
            let line = format!(
                "{label:<label_width$}  {bar:<width$}  {detail}",
                label_width = label_width,
                width = width
            );
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bar length in glyphs; any positive value gets at least one.
fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let scaled = (value / max * width as f64).round() as usize;
    scaled.clamp(1, width)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use spendwise_domain::MonthKey;

    use super::*;

    #[test]
    fn bars_scale_to_the_largest_value() {
        assert_eq!(bar_length(50.0, 100.0, 10), 5);
        assert_eq!(bar_length(100.0, 100.0, 10), 10);
        assert_eq!(bar_length(0.1, 100.0, 10), 1);
        assert_eq!(bar_length(0.0, 100.0, 10), 0);
        assert_eq!(bar_length(10.0, 0.0, 10), 0);
    }

    #[test]
    fn category_chart_shows_amounts_and_shares() {
        let slices = vec![
            CategorySlice {
                category: "food".into(),
                amount: dec!(250),
                share: 0.25,
            },
            CategorySlice {
                category: "rent".into(),
                amount: dec!(750),
                share: 0.75,
            },
        ];

        let chart = render_category_chart(&slices, 4, "₹");
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], "Food  █     ₹250.00 (25%)");
        assert_eq!(lines[1], "Rent  ████  ₹750.00 (75%)");
    }

    #[test]
    fn monthly_chart_keeps_zero_months() {
        let bars = vec![
            MonthlyBar {
                month: MonthKey::from_number(3).unwrap(),
                amount: dec!(0),
            },
            MonthlyBar {
                month: MonthKey::from_number(4).unwrap(),
                amount: dec!(80),
            },
        ];

        let chart = render_monthly_chart(&bars, 8, "$");

        assert_eq!(chart, "March            $0.00\nApril  ████████  $80.00");
        assert_eq!(render_monthly_chart(&[], 8, "$"), "No monthly expenses recorded.");
    }
}
