//! Value-plus-unit recognizers: resistance, capacitance, inductance,
//! voltage, current and frequency.
//!
//! Values stay symbolic: the number is kept as typed (trailing fractional
//! zeros dropped) and the multiplier becomes an SI prefix, so `10k` is
//! reported as `10kΩ` rather than `10000`.

use std::sync::LazyLock;

use nlq_types::{EntityType, EntityValue};
use regex::{Captures, Regex};

use super::{EntityMatch, Span};
use crate::normalize::NormalizedQuery;

// =============================================================================
// Confidence by notation
// =============================================================================

/// Number followed by a unit word or symbol ("10kohm", "100uf")
pub const EXPLICIT_UNIT_CONFIDENCE: f64 = 0.95;
/// RKM / IEC 60062 notation ("4k7", "4r7", "3v3")
pub const RKM_CONFIDENCE: f64 = 0.9;
/// Bare multiplier with no unit ("10k"), read as resistance
pub const BARE_MULTIPLIER_CONFIDENCE: f64 = 0.85;

const MICRO: &str = "\u{b5}";

// =============================================================================
// Patterns (run against normalized text: lowercase, Ω → ohm, µ → u)
// =============================================================================

static RESISTANCE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\s?(k|meg|m|g)?\s?ohms?\b").unwrap()
});
static RESISTANCE_RKM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+)([kmr])([0-9]+)\b").unwrap());
static RESISTANCE_R_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)r\b").unwrap());
static RESISTANCE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)(k|meg|m)\b").unwrap());

static CAPACITANCE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\s?(p|n|u|m)?(?:f|farads?)\b").unwrap()
});

static INDUCTANCE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\s?(n|u|m)?(?:h|henr(?:y|ies))\b").unwrap()
});

static VOLTAGE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\s?(m|k)?(?:v|volts?|vdc|vac)\b").unwrap()
});
static VOLTAGE_RKM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+)v([0-9]+)\b").unwrap());

// A bare "a" suffix must be attached ("2a"); with a space only amp words count
static CURRENT_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)(?:\s?(u|m)?(?:amps?|amperes?)|(u|m)?a)\b").unwrap()
});

static FREQUENCY_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+(?:\.[0-9]+)?)\s?(k|m|g)?hz\b").unwrap());

/// One notation for one quantity.
struct UnitForm {
    regex: &'static LazyLock<Regex>,
    confidence: f64,
    value: fn(&Captures<'_>) -> Option<String>,
}

static RESISTANCE_FORMS: [UnitForm; 4] = [
    UnitForm {
        regex: &RESISTANCE_UNIT,
        confidence: EXPLICIT_UNIT_CONFIDENCE,
        value: resistance_value,
    },
    UnitForm {
        regex: &RESISTANCE_RKM,
        confidence: RKM_CONFIDENCE,
        value: resistance_rkm_value,
    },
    UnitForm {
        regex: &RESISTANCE_R_SUFFIX,
        confidence: RKM_CONFIDENCE,
        value: resistance_value,
    },
    UnitForm {
        regex: &RESISTANCE_BARE,
        confidence: BARE_MULTIPLIER_CONFIDENCE,
        value: resistance_value,
    },
];

static CAPACITANCE_FORMS: [UnitForm; 1] = [UnitForm {
    regex: &CAPACITANCE_UNIT,
    confidence: EXPLICIT_UNIT_CONFIDENCE,
    value: capacitance_value,
}];

static INDUCTANCE_FORMS: [UnitForm; 1] = [UnitForm {
    regex: &INDUCTANCE_UNIT,
    confidence: EXPLICIT_UNIT_CONFIDENCE,
    value: inductance_value,
}];

static VOLTAGE_FORMS: [UnitForm; 2] = [
    UnitForm {
        regex: &VOLTAGE_UNIT,
        confidence: EXPLICIT_UNIT_CONFIDENCE,
        value: voltage_value,
    },
    UnitForm {
        regex: &VOLTAGE_RKM,
        confidence: RKM_CONFIDENCE,
        value: voltage_rkm_value,
    },
];

static CURRENT_FORMS: [UnitForm; 1] = [UnitForm {
    regex: &CURRENT_UNIT,
    confidence: EXPLICIT_UNIT_CONFIDENCE,
    value: current_value,
}];

static FREQUENCY_FORMS: [UnitForm; 1] = [UnitForm {
    regex: &FREQUENCY_UNIT,
    confidence: EXPLICIT_UNIT_CONFIDENCE,
    value: frequency_value,
}];

/// The value-plus-unit quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Resistance,
    Capacitance,
    Inductance,
    Voltage,
    Current,
    Frequency,
}

impl Quantity {
    pub const ALL: [Quantity; 6] = [
        Quantity::Resistance,
        Quantity::Capacitance,
        Quantity::Inductance,
        Quantity::Voltage,
        Quantity::Current,
        Quantity::Frequency,
    ];

    pub fn entity_type(&self) -> EntityType {
        match self {
            Quantity::Resistance => EntityType::Resistance,
            Quantity::Capacitance => EntityType::Capacitance,
            Quantity::Inductance => EntityType::Inductance,
            Quantity::Voltage => EntityType::Voltage,
            Quantity::Current => EntityType::Current,
            Quantity::Frequency => EntityType::Frequency,
        }
    }

    /// Canonical unit symbol.
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Resistance => "Ω",
            Quantity::Capacitance => "F",
            Quantity::Inductance => "H",
            Quantity::Voltage => "V",
            Quantity::Current => "A",
            Quantity::Frequency => "Hz",
        }
    }

    fn forms(&self) -> &'static [UnitForm] {
        match self {
            Quantity::Resistance => &RESISTANCE_FORMS,
            Quantity::Capacitance => &CAPACITANCE_FORMS,
            Quantity::Inductance => &INDUCTANCE_FORMS,
            Quantity::Voltage => &VOLTAGE_FORMS,
            Quantity::Current => &CURRENT_FORMS,
            Quantity::Frequency => &FREQUENCY_FORMS,
        }
    }

    pub fn recognize(&self, query: &NormalizedQuery) -> Vec<EntityMatch> {
        let text = query.text();
        let mut matches = Vec::new();

        for form in self.forms() {
            for caps in form.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let Some(value) = (form.value)(&caps) else {
                    continue;
                };
                matches.push(EntityMatch::new(
                    self.entity_type(),
                    EntityValue::Text(value),
                    Span::new(whole.start(), whole.end()),
                    form.confidence,
                ));
            }
        }

        matches
    }
}

// =============================================================================
// Canonical values
// =============================================================================

/// Drop trailing fractional zeros: "3.30" → "3.3", "5.0" → "5".
pub fn format_number(raw: &str) -> String {
    if raw.contains('.') {
        raw.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        raw.to_string()
    }
}

fn si_prefix(prefix: &str) -> &'static str {
    match prefix {
        "p" => "p",
        "n" => "n",
        "u" => MICRO,
        "m" => "m",
        "k" => "k",
        "meg" => "M",
        "g" => "G",
        _ => "",
    }
}

/// Resistance and frequency never use milli; a lowercase `m` means mega.
fn mega_prefix(prefix: &str) -> &'static str {
    match prefix {
        "m" => "M",
        other => si_prefix(other),
    }
}

fn compose(number: &str, prefix: &str, unit: &str) -> String {
    format!("{}{}{}", format_number(number), prefix, unit)
}

fn group<'c>(caps: &'c Captures<'_>, index: usize) -> &'c str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn resistance_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    Some(compose(number, mega_prefix(group(caps, 2)), Quantity::Resistance.unit()))
}

fn resistance_rkm_value(caps: &Captures<'_>) -> Option<String> {
    let number = format!("{}.{}", caps.get(1)?.as_str(), caps.get(3)?.as_str());
    let prefix = match caps.get(2)?.as_str() {
        "r" => "",
        other => mega_prefix(other),
    };
    Some(compose(&number, prefix, Quantity::Resistance.unit()))
}

fn capacitance_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    Some(compose(number, si_prefix(group(caps, 2)), Quantity::Capacitance.unit()))
}

fn inductance_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    Some(compose(number, si_prefix(group(caps, 2)), Quantity::Inductance.unit()))
}

fn voltage_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    Some(compose(number, si_prefix(group(caps, 2)), Quantity::Voltage.unit()))
}

fn voltage_rkm_value(caps: &Captures<'_>) -> Option<String> {
    let number = format!("{}.{}", caps.get(1)?.as_str(), caps.get(2)?.as_str());
    Some(compose(&number, "", Quantity::Voltage.unit()))
}

fn current_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    let prefix = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
    Some(compose(number, si_prefix(prefix), Quantity::Current.unit()))
}

fn frequency_value(caps: &Captures<'_>) -> Option<String> {
    let number = caps.get(1)?.as_str();
    Some(compose(number, mega_prefix(group(caps, 2)), Quantity::Frequency.unit()))
}
