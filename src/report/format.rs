//! Formatted terminal output.
//!
//! All text output lives here so the model code stays free of presentation
//! details and output changes stay localised.

use crate::data::city_multiplier;
use crate::domain::{ForestConfig, PropertyRecord};
use crate::fit::HoldoutReport;
use crate::report::{CityAverage, EstimateOutcome, HistogramBin, MarketPosition};

const BAR_WIDTH: usize = 40;

/// Estimate summary shown after every query.
pub fn format_estimate(outcome: &EstimateOutcome) -> String {
    let q = &outcome.query;
    let insight = &outcome.insight;
    let mut out = String::new();

    out.push_str("=== hpe - Home Price Estimate ===\n");
    out.push_str(&format!(
        "Property: {} sq ft | {} BHK | {} bath | {}\n",
        q.area(),
        q.bedrooms(),
        q.bathrooms(),
        q.city()
    ));
    if let Some(multiplier) = city_multiplier(q.city()) {
        out.push_str(&format!("City factor: {multiplier:.2}x the base market price\n"));
    }
    if !outcome.prediction.city_known {
        out.push_str("Note: city not in the market sample; estimate uses a fallback category.\n");
    }

    out.push('\n');
    out.push_str(&format!("Estimated price : {}\n", fmt_inr(insight.price)));
    out.push_str(&format!(
        "Price range     : {} - {}\n",
        fmt_inr(insight.range.lower),
        fmt_inr(insight.range.upper)
    ));
    out.push_str(&format!("Price per sq ft : ₹{:.0}\n", insight.price_per_sqft));
    out.push_str(&format!("Investment grade: {}\n", insight.grade.display_name()));

    match &insight.similar {
        Some(cmp) => {
            let position = match cmp.position {
                MarketPosition::Above => "above",
                MarketPosition::Below => "below",
            };
            out.push_str(&format!(
                "Market position : {position} the average of {} similar homes ({})\n",
                cmp.n_similar,
                fmt_inr(cmp.average_price.round() as u64)
            ));
        }
        None => out.push_str("Market position : no similar homes in the sample\n"),
    }

    out
}

/// Per-city averages followed by a text histogram of prices.
pub fn format_trends(averages: &[CityAverage], histogram: &[HistogramBin]) -> String {
    let mut out = String::new();

    out.push_str("Average price by city:\n");
    out.push_str(format!("{:<20} {:>6} {:>16}", "city", "n", "avg price").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<20} {:-<6} {:-<16}", "", "", "").trim_end());
    out.push('\n');
    for a in averages {
        out.push_str(&format!(
            "{:<20} {:>6} {:>16}\n",
            truncate(&a.city, 20),
            a.n,
            fmt_inr(a.average_price.round() as u64)
        ));
    }

    out.push_str("\nPrice distribution:\n");
    let peak = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in histogram {
        let len = if peak == 0 { 0 } else { bin.count * BAR_WIDTH / peak };
        out.push_str(
            format!(
                "{:>14} - {:>14} {:>5} {}",
                fmt_inr(bin.lower.round() as u64),
                fmt_inr(bin.upper.round() as u64),
                bin.count,
                "#".repeat(len)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

pub fn format_evaluation(report: &HoldoutReport, config: &ForestConfig) -> String {
    let mut out = String::new();
    out.push_str("=== hpe - Holdout Evaluation ===\n");
    out.push_str(&format!(
        "Forest: trees={} seed={} max_depth={}\n",
        config.n_trees,
        config.seed,
        config
            .max_depth
            .map_or_else(|| "none".to_string(), |d| d.to_string())
    ));
    out.push_str(&format!("Split : train={} test={}\n", report.n_train, report.n_test));
    out.push_str(&format!("RMSE  : {}\n", fmt_inr(report.rmse.round() as u64)));
    out.push_str(&format!("MAE   : {}\n", fmt_inr(report.mae.round() as u64)));
    out.push_str(&format!("R²    : {:.4}\n", report.r2));
    out
}

pub fn format_cities(table: &[(String, f64)]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<20} {:>10}", "city", "multiplier").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<20} {:-<10}", "", "").trim_end());
    out.push('\n');
    for (city, multiplier) in table {
        out.push_str(&format!("{:<20} {:>10.2}\n", truncate(city, 20), multiplier));
    }
    out
}

/// Short description of a generated sample.
pub fn format_sample_summary(records: &[PropertyRecord], data_seed: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Sample: n={} | seed={}\n", records.len(), data_seed));
    if records.is_empty() {
        return out;
    }

    let area_min = records.iter().map(|r| r.area).min().unwrap_or(0);
    let area_max = records.iter().map(|r| r.area).max().unwrap_or(0);
    let price_min = records.iter().map(|r| r.price).min().unwrap_or(0);
    let price_max = records.iter().map(|r| r.price).max().unwrap_or(0);
    let price_mean = records.iter().map(|r| r.price as f64).sum::<f64>() / records.len() as f64;

    out.push_str(&format!("Area : [{area_min}, {area_max}] sq ft\n"));
    out.push_str(&format!(
        "Price: [{}, {}] | mean={}\n",
        fmt_inr(price_min),
        fmt_inr(price_max),
        fmt_inr(price_mean.round() as u64)
    ));

    let mut bedrooms = [0usize; 5];
    for r in records {
        if let Some(slot) = bedrooms.get_mut(usize::from(r.bedrooms).wrapping_sub(1)) {
            *slot += 1;
        }
    }
    let parts: Vec<String> = bedrooms
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}BHK={n}", i + 1))
        .collect();
    out.push_str(&format!("Bedrooms: {}\n", parts.join(" ")));
    out
}

/// Rupee amount with thousands separators, e.g. `₹9,750,000`.
pub fn fmt_inr(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₹{grouped}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bathrooms, PriceQuery, Prediction};
    use crate::report::{
        InvestmentGrade, PriceRange, SimilarComparison, average_price_by_city, build_insight, price_histogram,
    };

    #[test]
    fn inr_groups_thousands() {
        assert_eq!(fmt_inr(0), "₹0");
        assert_eq!(fmt_inr(999), "₹999");
        assert_eq!(fmt_inr(1_000), "₹1,000");
        assert_eq!(fmt_inr(50_000), "₹50,000");
        assert_eq!(fmt_inr(9_750_000), "₹9,750,000");
        assert_eq!(fmt_inr(123_456_789), "₹123,456,789");
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Mumbai", 20), "Mumbai");
        assert_eq!(truncate("Thiruvananthapuram", 8), "Thiruva.");
    }

    #[test]
    fn estimate_summary_lists_key_figures() {
        let outcome = EstimateOutcome {
            query: PriceQuery::new(1500, 3, Bathrooms::from_f64(2.0).unwrap(), "Mumbai").unwrap(),
            prediction: Prediction {
                price: 9_750_000,
                city_code: 12,
                city_known: true,
            },
            insight: crate::report::Insight {
                price: 9_750_000,
                price_per_sqft: 6_500.0,
                range: PriceRange {
                    lower: 8_775_000,
                    upper: 10_725_000,
                },
                grade: InvestmentGrade::Good,
                similar: Some(SimilarComparison {
                    n_similar: 4,
                    average_price: 9_000_000.0,
                    position: MarketPosition::Above,
                }),
            },
        };
        let text = format_estimate(&outcome);
        assert!(text.contains("₹9,750,000"));
        assert!(text.contains("₹8,775,000 - ₹10,725,000"));
        assert!(text.contains("Good"));
        assert!(text.contains("above the average of 4 similar homes"));
        assert!(text.contains("City factor: 2.50x"));
        assert!(!text.contains("fallback"));
    }

    #[test]
    fn estimate_summary_flags_unknown_city() {
        let query = PriceQuery::new(800, 2, Bathrooms::from_f64(1.0).unwrap(), "Atlantis").unwrap();
        let outcome = EstimateOutcome {
            insight: build_insight(&[], &query, 2_000_000),
            query,
            prediction: Prediction {
                price: 2_000_000,
                city_code: 0,
                city_known: false,
            },
        };
        let text = format_estimate(&outcome);
        assert!(text.contains("fallback"));
        assert!(text.contains("no similar homes"));
        assert!(!text.contains("City factor"));
    }

    #[test]
    fn trends_render_every_city_and_bin() {
        let records: Vec<PropertyRecord> = ["Pune", "Agra", "Pune"]
            .iter()
            .zip([4_000_000u64, 1_000_000, 6_000_000])
            .map(|(city, price)| PropertyRecord {
                area: 1000,
                bedrooms: 2,
                bathrooms: Bathrooms::from_f64(2.0).unwrap(),
                city: city.to_string(),
                price,
            })
            .collect();
        let text = format_trends(&average_price_by_city(&records), &price_histogram(&records, 5));
        assert!(text.contains("Agra"));
        assert!(text.contains("₹5,000,000"));
        let bin_lines = text.lines().skip_while(|l| !l.starts_with("Price distribution")).skip(1);
        assert_eq!(bin_lines.count(), 5);
    }

    #[test]
    fn cities_table_has_header_and_rows() {
        let text = format_cities(&[("Mumbai".to_string(), 2.5), ("Patna".to_string(), 0.6)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Mumbai"));
        assert!(lines[3].ends_with("0.60"));
    }
}
