//! # Conversion Engine Module
//!
//! Executes the conversion selected by the unit registry: scalar and affine
//! arithmetic, multi-line fan-outs (cups, spoons, ounces, inches, quart) and
//! the two conversions that depend on external data (the beer price scrape
//! and the USD/EUR exchange rate).
//!
//! All output values are fixed-precision: two decimals everywhere except the
//! beer count, which uses three.

use teloxide::utils::markdown;
use tracing::debug;

use crate::aldi;
use crate::currency;
use crate::errors::{ConvertError, ConvertResult};
use crate::units::{Conversion, UnitMatch};

// Grams per cup, in fixed output order
const CUPS_TO_GRAM: [(f64, &str); 13] = [
    (227.0, "gram (butter)"),
    (125.0, "gram (all purpose flour)"),
    (136.0, "gram (bread flour)"),
    (85.0, "gram (cocoa powder)"),
    (120.0, "gram (powdered sugar)"),
    (95.0, "gram (rolled oats)"),
    (200.0, "gram (granulated sugar)"),
    (220.0, "gram (packed brown sugar)"),
    (185.0, "gram (uncooked long grain rice)"),
    (200.0, "gram (uncooked short grain rice)"),
    (340.0, "gram (honey, molasse, syrup)"),
    (237.0, "gram (water)"),
    (249.0, "gram (whole milk)"),
];

const TABLESPOON_TO_GRAM: f64 = 15.0;
const TABLESPOON_TO_MILLILITER: f64 = 14.7867648;
const TEASPOON_TO_GRAM: f64 = 4.18;
const TEASPOON_TO_MILLILITER: f64 = 5.0;
const OUNCES_TO_MILLILITER: f64 = 29.57353;
const OUNCES_TO_GRAM: f64 = 28.34952;
const INCHES_TO_CENTIMETER: f64 = 2.54;
const CENTIMETER_PER_TAHOCKER: f64 = 159.5;
const US_LIQUID_QUART_TO_LITER: f64 = 0.946353;
const US_DRY_QUART_TO_LITER: f64 = 1.101221;
const IMPERIAL_QUART_TO_LITER: f64 = 1.136523;

/// Reference price of a can of Karlskrone, in cents
const KARLSKRONE_REFERENCE_PRICE_CENTS: f64 = 29.0;

const ALDI_BEER_LINK: &str = "[Aldi Bier](https://song.link/t/120323761)";

/// Execute the conversion selected by `matched`.
///
/// The two external-data arms differ deliberately in their failure handling:
/// the live beer price is best-effort and degrades silently to the reference
/// price, while an exchange-rate failure propagates to the caller.
pub async fn convert(matched: &UnitMatch<'_>, client: &reqwest::Client) -> ConvertResult<String> {
    let number = parse_number(matched)?;

    let text = match matched.unit.conversion {
        Conversion::Scalar { factor, label } => format_value(number * factor, label),
        Conversion::Fahrenheit => format_value((number - 32.0) * 5.0 / 9.0, "°C"),
        Conversion::Inches => convert_inches(number),
        Conversion::Ounces => convert_ounces(number),
        Conversion::Cups => convert_cups(number),
        Conversion::Tablespoon => convert_tablespoon(number),
        Conversion::Teaspoon => convert_teaspoon(number),
        Conversion::Quart => convert_quart(number),
        Conversion::NonFreedom => convert_non_freedom(number, &matched.unit_name),
        Conversion::AldiBeer => {
            let live_price = match aldi::fetch_karlskrone_price(client).await {
                Ok(price) => Some(price),
                Err(error) => {
                    debug!(error = %error, "live beer price lookup failed, using reference price only");
                    None
                }
            };
            convert_aldi_beer(number, &matched.unit_name, live_price)
        }
        Conversion::Dollar => {
            let rate = currency::fetch_exchange_rate(client, "USD", "EUR")
                .await
                .map_err(|error| ConvertError::RateLookup(error.to_string()))?;
            convert_dollar(number, rate)
        }
    };

    Ok(text)
}

/// Normalize and parse the matched numeric field
fn parse_number(matched: &UnitMatch<'_>) -> ConvertResult<f64> {
    let raw = matched
        .number
        .as_deref()
        .ok_or(ConvertError::MissingNumber)?;
    raw.replace(',', ".")
        .parse()
        .map_err(|_| ConvertError::NotANumber(raw.to_string()))
}

fn format_value(value: f64, label: &str) -> String {
    format!("{:.2} {}", value, label)
}

/// One line per ingredient, in the fixed table order
pub fn convert_cups(number: f64) -> String {
    CUPS_TO_GRAM
        .iter()
        .map(|(factor, label)| format!("{:.2}{}", number * factor, label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn convert_tablespoon(number: f64) -> String {
    format!(
        "{}\n{}",
        format_value(number * TABLESPOON_TO_GRAM, "gram"),
        format_value(number * TABLESPOON_TO_MILLILITER, "ml")
    )
}

pub fn convert_teaspoon(number: f64) -> String {
    format!(
        "{}\n{}",
        format_value(number * TEASPOON_TO_GRAM, "gram"),
        format_value(number * TEASPOON_TO_MILLILITER, "ml")
    )
}

pub fn convert_ounces(number: f64) -> String {
    let fluid = format_value(number * OUNCES_TO_MILLILITER, "ml");
    let mass = format_value(number * OUNCES_TO_GRAM, "gram");

    format!("{}\n{}", fluid, mass)
}

pub fn convert_inches(number: f64) -> String {
    let centimeters = number * INCHES_TO_CENTIMETER;

    format!(
        "{}\n{}",
        format_value(centimeters, "cm"),
        format_value(centimeters / CENTIMETER_PER_TAHOCKER, "tahocker")
    )
}

pub fn convert_quart(number: f64) -> String {
    format!(
        "US liquid: {}\nUS dry: {}\nImperial: {}",
        format_value(number * US_LIQUID_QUART_TO_LITER, "l"),
        format_value(number * US_DRY_QUART_TO_LITER, "l"),
        format_value(number * IMPERIAL_QUART_TO_LITER, "l")
    )
}

/// Metric input is echoed back unchanged. The metric-to-imperial reverse
/// path stays disabled; this arm only validates the number.
pub fn convert_non_freedom(number: f64, unit_name: &str) -> String {
    format!("{}{}", number, unit_name)
}

/// Beer count against the reference can price, with an optional second count
/// against the live price. The euro suffixes carry major-currency amounts
/// and are normalized to cents first.
pub fn convert_aldi_beer(number: f64, unit_name: &str, live_price: Option<f64>) -> String {
    let multiplier = match unit_name.trim().to_lowercase().as_str() {
        "euro" | "€" => 100.0,
        _ => 1.0,
    };
    let cents = number * multiplier;

    let mut result = markdown::escape(&format!(
        "Boah Bruder, das sind ja {:.3}",
        cents / KARLSKRONE_REFERENCE_PRICE_CENTS
    ));
    if let Some(price) = live_price {
        result.push_str(&markdown::escape(&format!(
            " ({:.3})",
            cents / (price * 100.0)
        )));
    }

    format!("{} {}", result, ALDI_BEER_LINK)
}

pub fn convert_dollar(number: f64, rate: f64) -> String {
    format!("{:.2}€", number * rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::find_matching_unit;

    async fn convert_offline(args: &str) -> ConvertResult<String> {
        let matched = find_matching_unit(args).ok_or(ConvertError::NoMatch)?;
        convert(&matched, &reqwest::Client::new()).await
    }

    #[tokio::test]
    async fn test_scalar_conversions_round_to_two_decimals() {
        assert_eq!(convert_offline("12.5 ft").await.unwrap(), "3.81 m");
        assert_eq!(convert_offline("1 pound").await.unwrap(), "453.59 gram");
        assert_eq!(convert_offline("1 mi").await.unwrap(), "1.61 km");
        assert_eq!(convert_offline("1 yd").await.unwrap(), "0.91 m");
        assert_eq!(convert_offline("3 ft^2").await.unwrap(), "0.28 m²");
        assert_eq!(convert_offline("1 mi²").await.unwrap(), "2.59 km²");
    }

    #[tokio::test]
    async fn test_fahrenheit_to_celsius() {
        assert_eq!(convert_offline("32 F").await.unwrap(), "0.00 °C");
        assert_eq!(convert_offline("212 °F").await.unwrap(), "100.00 °C");
    }

    #[tokio::test]
    async fn test_comma_and_period_inputs_are_equivalent() {
        assert_eq!(
            convert_offline("12,5 ft").await.unwrap(),
            convert_offline("12.5 ft").await.unwrap()
        );
    }

    #[test]
    fn test_cups_fans_out_to_thirteen_ingredients() {
        let output = convert_cups(2.0);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "454.00gram (butter)");
        assert_eq!(lines[1], "250.00gram (all purpose flour)");
        assert_eq!(lines[10], "680.00gram (honey, molasse, syrup)");
        assert_eq!(lines[12], "498.00gram (whole milk)");
    }

    #[test]
    fn test_spoon_and_ounce_fan_outs() {
        assert_eq!(convert_tablespoon(1.0), "15.00 gram\n14.79 ml");
        assert_eq!(convert_teaspoon(1.0), "4.18 gram\n5.00 ml");
        assert_eq!(convert_ounces(1.0), "29.57 ml\n28.35 gram");
    }

    #[test]
    fn test_inches_include_tahocker_line() {
        assert_eq!(convert_inches(1.0), "2.54 cm\n0.02 tahocker");
    }

    #[test]
    fn test_quart_lists_all_three_variants() {
        assert_eq!(
            convert_quart(1.0),
            "US liquid: 0.95 l\nUS dry: 1.10 l\nImperial: 1.14 l"
        );
    }

    #[tokio::test]
    async fn test_non_freedom_passthrough_is_verbatim() {
        assert_eq!(convert_offline("5 cm").await.unwrap(), "5cm");
        assert_eq!(convert_offline("12.5 km").await.unwrap(), "12.5km");
    }

    #[test]
    fn test_aldi_beer_reference_count_without_live_price() {
        let output = convert_aldi_beer(250.0, "cent", None);

        assert_eq!(
            output,
            r"Boah Bruder, das sind ja 8\.621 [Aldi Bier](https://song.link/t/120323761)"
        );
        // Exactly one beer-count line when the live lookup is unavailable.
        assert_eq!(output.matches('(').count(), 1);
    }

    #[test]
    fn test_aldi_beer_euro_amounts_are_normalized_to_cents() {
        assert_eq!(
            convert_aldi_beer(2.5, "euro", None),
            convert_aldi_beer(250.0, "ct", None)
        );
        assert_eq!(
            convert_aldi_beer(2.5, "€", None),
            convert_aldi_beer(250.0, "cent", None)
        );
    }

    #[test]
    fn test_aldi_beer_appends_live_price_count() {
        let output = convert_aldi_beer(250.0, "cent", Some(0.58));

        assert!(output.starts_with(r"Boah Bruder, das sind ja 8\.621 \(4\.310\)"));
        assert!(output.ends_with("[Aldi Bier](https://song.link/t/120323761)"));
    }

    #[test]
    fn test_dollar_renders_euro_amount() {
        assert_eq!(convert_dollar(5.0, 0.92), "4.60€");
    }

    #[tokio::test]
    async fn test_missing_number_is_reported_per_unit() {
        let matched = find_matching_unit("abc ft").expect("feet suffix should match");
        let result = convert(&matched, &reqwest::Client::new()).await;

        assert_eq!(result, Err(ConvertError::MissingNumber));
    }
}
