//! # Unit Registry Module
//!
//! This module provides the unit catalog for the bot, including regex-based
//! unit detection and disambiguation between overlapping unit names.
//!
//! ## Features
//!
//! - Unit detection using per-unit regex patterns with named capture groups
//! - Longest-matched-suffix disambiguation (more specific tokens outrank
//!   shorter ones, e.g. `ft²` over `ft`)
//! - Stable first-registered-wins tie-breaking for equal-length suffixes
//! - Decimal numbers with either `.` or `,` as the fractional separator

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

/// How a conversion result must be rendered by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Plain text reply
    Plain,
    /// Reply contains MarkdownV2 markup; reserved characters in the
    /// surrounding text are already escaped by the conversion
    MarkdownV2,
}

/// Discriminant selecting the conversion applied to a matched unit.
///
/// The registry stays a closed set: every unit picks one of these variants
/// and the conversion engine dispatches over them in a single `match`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Multiply by a fixed factor and render with the given label
    Scalar { factor: f64, label: &'static str },
    /// Fahrenheit to Celsius, `(n - 32) * 5/9`
    Fahrenheit,
    /// Centimeters plus the tahocker novelty unit
    Inches,
    /// Fluid milliliters plus mass grams
    Ounces,
    /// Fan-out to the per-ingredient grams-per-cup table
    Cups,
    /// Grams plus milliliters
    Tablespoon,
    /// Grams plus milliliters
    Teaspoon,
    /// US liquid, US dry and Imperial liters
    Quart,
    /// Beer-count conversion against the reference can price, with a
    /// best-effort live price lookup
    AldiBeer,
    /// USD to EUR via the exchange-rate lookup
    Dollar,
    /// Metric input echoed back unchanged (the reverse path is disabled)
    NonFreedom,
}

/// A registered unit: matching pattern, conversion and render mode.
///
/// Definitions are immutable after registry construction.
#[derive(Debug)]
pub struct UnitDefinition {
    /// Unique display identifier, also the listing key
    pub name: &'static str,
    /// Full pattern: numeric field followed by the unit-name token
    pattern: Regex,
    /// Suffix-only pattern, used to attribute number-less input to a unit
    bare_pattern: Regex,
    /// Conversion applied to the extracted number
    pub conversion: Conversion,
    /// Rendering requirement of the conversion output
    pub render_mode: RenderMode,
}

/// Pattern fragment for the numeric field: optional sign, decimal number
/// with `.` or `,` as the fractional separator.
const NUMBER_PATTERN: &str = r"(?P<number>[-+]?\d+(?:[.,]\d+)?)";

impl UnitDefinition {
    /// Unit whose number must lead the input (case-insensitive)
    pub fn anchored(name: &'static str, alternation: &str, conversion: Conversion) -> Self {
        Self::compile(name, alternation, true, true, conversion, RenderMode::Plain)
    }

    /// Same as [`UnitDefinition::anchored`] but matching case-sensitively
    pub fn anchored_case_sensitive(
        name: &'static str,
        alternation: &str,
        conversion: Conversion,
    ) -> Self {
        Self::compile(name, alternation, true, false, conversion, RenderMode::Plain)
    }

    /// Unit that tolerates arbitrary leading text before the number, for
    /// commands with supplementary leading words
    pub fn leading_text(
        name: &'static str,
        alternation: &str,
        conversion: Conversion,
        render_mode: RenderMode,
    ) -> Self {
        Self::compile(name, alternation, false, true, conversion, render_mode)
    }

    fn compile(
        name: &'static str,
        alternation: &str,
        anchored: bool,
        case_insensitive: bool,
        conversion: Conversion,
        render_mode: RenderMode,
    ) -> Self {
        let flags = if case_insensitive { "(?i)" } else { "" };
        // Unanchored search is the leading-text skip; anchored units pin the
        // number to the start of the argument. Trailing text is ignored in
        // both shapes.
        let anchor = if anchored { "^" } else { "" };
        let pattern = format!(
            r"{}{}{}\s*(?P<unit_name>{})",
            flags, anchor, NUMBER_PATTERN, alternation
        );
        // The suffix-only pattern requires the token to stand alone so that a
        // bare word merely starting with a unit letter does not claim it.
        let bare_pattern = format!(r"{}(?:^|\s)(?P<unit_name>{})(?:\s|$)", flags, alternation);
        Self {
            name,
            pattern: Regex::new(&pattern).expect("unit pattern should be valid"),
            bare_pattern: Regex::new(&bare_pattern).expect("bare unit pattern should be valid"),
            conversion,
            render_mode,
        }
    }
}

/// Ephemeral result of resolving raw argument text against the registry
#[derive(Debug, Clone)]
pub struct UnitMatch<'a> {
    /// Raw numeric field as matched, before locale normalization; `None`
    /// when the unit token appeared without a number attached
    pub number: Option<String>,
    /// The unit-name substring actually consumed, used for tie-breaking and
    /// by suffix-sensitive conversions
    pub unit_name: String,
    /// The winning unit definition
    pub unit: &'a UnitDefinition,
}

/// The unit catalog with longest-suffix-wins resolution
#[derive(Debug)]
pub struct UnitRegistry {
    units: Vec<UnitDefinition>,
}

impl UnitRegistry {
    /// Create a registry from explicit definitions. Insertion order is the
    /// documented tie-break order: on equal suffix length the first
    /// registered unit wins.
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        Self { units }
    }

    /// Build the full catalog
    pub fn with_catalog() -> Self {
        use Conversion::*;

        Self::new(vec![
            UnitDefinition::anchored("fahrenheit", r"°?F", Fahrenheit),
            UnitDefinition::anchored("inches", r#""|in(?:ch(?:es)?)?"#, Inches),
            UnitDefinition::anchored(
                "pound",
                r"(?:pound|lb)s?",
                Scalar {
                    factor: POUND_TO_GRAM,
                    label: "gram",
                },
            ),
            UnitDefinition::anchored("ounces", r"(?:fl\.)?oz|ounces", Ounces),
            UnitDefinition::anchored(
                "feet",
                r"ft|feet",
                Scalar {
                    factor: FEET_TO_METER,
                    label: "m",
                },
            ),
            UnitDefinition::anchored("cups", r"cup|endgegner", Cups),
            UnitDefinition::anchored("tablespoon", r"tablespoon|tbsp", Tablespoon),
            UnitDefinition::anchored("teaspoon", r"teaspoon|tsp", Teaspoon),
            UnitDefinition::anchored(
                "mile",
                r"mi(?:le)?",
                Scalar {
                    factor: MILE_TO_KILOMETER,
                    label: "km",
                },
            ),
            UnitDefinition::anchored(
                "yard",
                r"yd|yard",
                Scalar {
                    factor: YARD_TO_METER,
                    label: "m",
                },
            ),
            UnitDefinition::leading_text(
                "aldi beer",
                r"€|euro|ct|cent",
                AldiBeer,
                RenderMode::MarkdownV2,
            ),
            UnitDefinition::leading_text("USD", r"\$|usd|dollar", Dollar, RenderMode::Plain),
            UnitDefinition::anchored(
                "feet squared",
                r"(?:ft|feet)(?:\^?2|²)",
                Scalar {
                    factor: FEET_SQUARED_TO_METER_SQUARED,
                    label: "m²",
                },
            ),
            UnitDefinition::anchored(
                "miles squared",
                r"(?:mi|mile)(?:\^?2|²)",
                Scalar {
                    factor: MILE_SQUARED_TO_KILOMETER_SQUARED,
                    label: "km²",
                },
            ),
            UnitDefinition::anchored_case_sensitive(
                "non freedom units",
                r"cm|[cz]entimeter|ml|milliliter|km|kilometer|g(?:ram)?|m(?:eter)?|c(?:elsius)?|°C",
                NonFreedom,
            ),
            UnitDefinition::anchored_case_sensitive("quart", r"qt|quart", Quart),
        ])
    }

    /// Registered units in tie-break order
    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    /// Resolve raw argument text to the winning unit.
    ///
    /// Every unit's pattern is tried; among the matching units the one whose
    /// consumed unit-name substring is strictly longest wins, and equal
    /// lengths fall back to registration order. When no number-plus-suffix
    /// pattern matches, a second suffix-only pass attributes number-less
    /// input (e.g. `"abc ft"`) to its unit so the reply can point at the
    /// number instead of claiming no unit matched.
    pub fn resolve(&self, args: &str) -> Option<UnitMatch<'_>> {
        if let Some(found) = self.resolve_with(args, |unit| &unit.pattern) {
            return Some(found);
        }
        self.resolve_with(args, |unit| &unit.bare_pattern)
    }

    fn resolve_with<'a>(
        &'a self,
        args: &str,
        pattern_of: impl Fn(&'a UnitDefinition) -> &'a Regex,
    ) -> Option<UnitMatch<'a>> {
        let mut best: Option<UnitMatch<'a>> = None;
        let mut longest = 0usize;

        for unit in &self.units {
            let Some(capture) = pattern_of(unit).captures(args) else {
                continue;
            };
            let Some(unit_name) = capture.name("unit_name") else {
                continue;
            };
            trace!(unit = unit.name, suffix = unit_name.as_str(), "Unit pattern matched");

            // Strictly-greater comparison keeps the first registered unit on
            // ties.
            let length = unit_name.as_str().chars().count();
            if length > longest {
                longest = length;
                best = Some(UnitMatch {
                    number: capture.name("number").map(|m| m.as_str().to_string()),
                    unit_name: unit_name.as_str().to_string(),
                    unit,
                });
            }
        }

        best
    }
}

// Scalar conversion factors
const POUND_TO_GRAM: f64 = 453.59237;
const FEET_TO_METER: f64 = 0.3048;
const MILE_TO_KILOMETER: f64 = 1.609344;
const YARD_TO_METER: f64 = 0.9144;
const FEET_SQUARED_TO_METER_SQUARED: f64 = 0.09290304;
const MILE_SQUARED_TO_KILOMETER_SQUARED: f64 = 2.589988;

lazy_static! {
    static ref CATALOG: UnitRegistry = UnitRegistry::with_catalog();
}

/// The process-wide unit catalog
pub fn catalog() -> &'static UnitRegistry {
    &CATALOG
}

/// Resolve argument text against the process-wide catalog
pub fn find_matching_unit(args: &str) -> Option<UnitMatch<'static>> {
    CATALOG.resolve(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_stable() {
        let names: Vec<&str> = catalog().units().iter().map(|u| u.name).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "fahrenheit");
        assert_eq!(names[10], "aldi beer");
        assert_eq!(names[15], "quart");
    }

    #[test]
    fn test_simple_match_extracts_number_and_suffix() {
        let matched = find_matching_unit("5 ft").expect("feet should match");
        assert_eq!(matched.unit.name, "feet");
        assert_eq!(matched.number.as_deref(), Some("5"));
        assert_eq!(matched.unit_name, "ft");
    }

    #[test]
    fn test_comma_number_is_captured_raw() {
        let matched = find_matching_unit("12,5 ft").expect("feet should match");
        assert_eq!(matched.number.as_deref(), Some("12,5"));
    }

    #[test]
    fn test_longest_suffix_beats_registration_order() {
        // "feet squared" and "miles squared" are registered after "feet" and
        // "mile" but win on suffix length.
        let matched = find_matching_unit("5 ft^2").expect("area should match");
        assert_eq!(matched.unit.name, "feet squared");
        assert_eq!(matched.unit_name, "ft^2");

        let matched = find_matching_unit("5 mi²").expect("area should match");
        assert_eq!(matched.unit.name, "miles squared");
    }

    #[test]
    fn test_mile_outranks_meter_passthrough() {
        let matched = find_matching_unit("3 mi").expect("mile should match");
        assert_eq!(matched.unit.name, "mile");

        let matched = find_matching_unit("3 m").expect("meter should match");
        assert_eq!(matched.unit.name, "non freedom units");
    }

    #[test]
    fn test_tie_break_prefers_first_registered_unit() {
        let registry = UnitRegistry::new(vec![
            UnitDefinition::anchored("first", r"blorp", Conversion::Cups),
            UnitDefinition::anchored("second", r"blorp", Conversion::Quart),
        ]);

        let matched = registry.resolve("5 blorp").expect("both units match");
        assert_eq!(matched.unit.name, "first");
    }

    #[test]
    fn test_leading_text_units_skip_prefix_words() {
        let matched = find_matching_unit("was kosten 250 cent").expect("beer should match");
        assert_eq!(matched.unit.name, "aldi beer");
        assert_eq!(matched.number.as_deref(), Some("250"));
        assert_eq!(matched.unit_name, "cent");

        let matched = find_matching_unit("gib mir 5 $").expect("dollar should match");
        assert_eq!(matched.unit.name, "USD");
    }

    #[test]
    fn test_suffix_without_number_is_attributed_to_unit() {
        let matched = find_matching_unit("abc ft").expect("feet suffix should match");
        assert_eq!(matched.unit.name, "feet");
        assert!(matched.number.is_none());
    }

    #[test]
    fn test_plain_word_does_not_match() {
        assert!(find_matching_unit("foo").is_none());
        assert!(find_matching_unit("").is_none());
    }

    #[test]
    fn test_case_insensitive_units() {
        assert_eq!(find_matching_unit("90 F").unwrap().unit.name, "fahrenheit");
        assert_eq!(find_matching_unit("90 °f").unwrap().unit.name, "fahrenheit");
        assert_eq!(find_matching_unit("2 CUPS").unwrap().unit.name, "cups");
    }

    #[test]
    fn test_case_sensitive_units_reject_uppercase() {
        // The passthrough and quart patterns are deliberately case-sensitive.
        assert_eq!(find_matching_unit("1 qt").unwrap().unit.name, "quart");
        assert!(find_matching_unit("1 QT").is_none());
        assert_eq!(
            find_matching_unit("5 cm").unwrap().unit.name,
            "non freedom units"
        );
    }

    #[test]
    fn test_plural_and_spelled_out_tokens() {
        assert_eq!(find_matching_unit("2 pounds").unwrap().unit_name, "pounds");
        assert_eq!(find_matching_unit("2 lbs").unwrap().unit_name, "lbs");
        assert_eq!(find_matching_unit("5 inches").unwrap().unit_name, "inches");
        assert_eq!(find_matching_unit("1 fl.oz").unwrap().unit_name, "fl.oz");
        assert_eq!(find_matching_unit("3 miles").unwrap().unit_name, "mile");
        assert_eq!(
            find_matching_unit("1 endgegner").unwrap().unit.name,
            "cups"
        );
    }

    #[test]
    fn test_german_metric_spellings_pass_through() {
        assert_eq!(
            find_matching_unit("5 zentimeter").unwrap().unit.name,
            "non freedom units"
        );
        assert_eq!(
            find_matching_unit("5 centimeter").unwrap().unit.name,
            "non freedom units"
        );
    }
}
