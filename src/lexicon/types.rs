//! Lexicon configuration types.
//!
//! `LexiconConfig` is the editable, serializable form of the lookup tables
//! (shipped as YAML under `config/lexicon/`). It is compiled into an
//! immutable [`Lexicon`](super::Lexicon) before any query is parsed.
//!
//! The built-in tables below mirror the shipped YAML so that a parser can
//! be constructed without touching the filesystem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical value → aliases that map to it.
pub type AliasTable = BTreeMap<String, Vec<String>>;

/// All recognizer lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Component type synonyms ("res" → resistor)
    pub component_types: AliasTable,
    /// Stock-status phrases keyed by canonical status wire name
    pub stock_status: AliasTable,
    /// Package codes, families and generic mounting keywords
    pub packages: PackageTables,
    /// Manufacturer aliases keyed by display name
    pub manufacturers: AliasTable,
    /// Words that introduce a named storage location ("bin", "drawer")
    pub location_prefixes: Vec<String>,
    /// Keywords implying an upper price bound ("cheap")
    pub price_keywords: Vec<String>,
    /// Words that carry no filter meaning and do not count toward coverage
    pub filler_words: Vec<String>,
}

/// Package vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageTables {
    /// Complete package codes matched as whole tokens ("0805", "d2pak")
    pub codes: Vec<String>,
    /// Families that take a pin/size number ("sot" → "SOT-23")
    pub families: Vec<String>,
    /// Families also meaningful without a number ("qfn")
    pub bare_families: Vec<String>,
    /// Generic mounting keywords keyed by canonical value ("SMD", "THT")
    pub generic: AliasTable,
}

/// Partial lexicon as read from one YAML file; present sections replace
/// the corresponding built-in table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconPatch {
    pub component_types: Option<AliasTable>,
    pub stock_status: Option<AliasTable>,
    pub packages: Option<PackageTables>,
    pub manufacturers: Option<AliasTable>,
    pub location_prefixes: Option<Vec<String>>,
    pub price_keywords: Option<Vec<String>>,
    pub filler_words: Option<Vec<String>>,
}

impl LexiconPatch {
    /// Names of the sections this patch carries.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.component_types.is_some() {
            out.push("component_types");
        }
        if self.stock_status.is_some() {
            out.push("stock_status");
        }
        if self.packages.is_some() {
            out.push("packages");
        }
        if self.manufacturers.is_some() {
            out.push("manufacturers");
        }
        if self.location_prefixes.is_some() {
            out.push("location_prefixes");
        }
        if self.price_keywords.is_some() {
            out.push("price_keywords");
        }
        if self.filler_words.is_some() {
            out.push("filler_words");
        }
        out
    }
}

impl LexiconConfig {
    /// Replace every section present in `patch`.
    pub fn apply(&mut self, patch: LexiconPatch) {
        if let Some(v) = patch.component_types {
            self.component_types = v;
        }
        if let Some(v) = patch.stock_status {
            self.stock_status = v;
        }
        if let Some(v) = patch.packages {
            self.packages = v;
        }
        if let Some(v) = patch.manufacturers {
            self.manufacturers = v;
        }
        if let Some(v) = patch.location_prefixes {
            self.location_prefixes = v;
        }
        if let Some(v) = patch.price_keywords {
            self.price_keywords = v;
        }
        if let Some(v) = patch.filler_words {
            self.filler_words = v;
        }
    }
}

// =============================================================================
// Built-in tables
// =============================================================================

const COMPONENT_TYPES: &[(&str, &[&str])] = &[
    ("resistor", &["resistor", "resistors", "res", "r"]),
    (
        "capacitor",
        &[
            "capacitor",
            "capacitors",
            "cap",
            "caps",
            "electrolytic",
            "electrolytics",
            "ceramic capacitor",
            "ceramic capacitors",
        ],
    ),
    ("inductor", &["inductor", "inductors", "coil", "coils", "choke", "chokes"]),
    ("diode", &["diode", "diodes", "zener", "zeners", "rectifier", "rectifiers"]),
    ("led", &["led", "leds", "light emitting diode", "light emitting diodes"]),
    ("transistor", &["transistor", "transistors", "bjt", "bjts"]),
    ("mosfet", &["mosfet", "mosfets", "fet", "fets"]),
    ("ic", &["ic", "ics", "chip", "chips", "integrated circuit", "integrated circuits"]),
    (
        "microcontroller",
        &["microcontroller", "microcontrollers", "mcu", "mcus"],
    ),
    (
        "voltage_regulator",
        &["voltage regulator", "voltage regulators", "regulator", "regulators", "ldo", "ldos"],
    ),
    ("crystal", &["crystal", "crystals", "oscillator", "oscillators", "xtal"]),
    ("connector", &["connector", "connectors", "header", "headers", "jack", "jacks"]),
    ("switch", &["switch", "switches", "button", "buttons"]),
    ("relay", &["relay", "relays"]),
    ("fuse", &["fuse", "fuses", "polyfuse", "polyfuses"]),
    (
        "potentiometer",
        &["potentiometer", "potentiometers", "pot", "pots", "trimmer", "trimmers"],
    ),
    ("sensor", &["sensor", "sensors"]),
];

const STOCK_STATUS: &[(&str, &[&str])] = &[
    (
        "low",
        &[
            "low stock",
            "running low",
            "low on stock",
            "stock low",
            "low quantity",
            "low qty",
            "almost out",
            "nearly out",
            "running out",
        ],
    ),
    (
        "out_of_stock",
        &["out of stock", "empty", "none left", "no stock", "sold out", "depleted"],
    ),
    ("available", &["available", "in stock", "on hand", "stocked"]),
    ("unused", &["unused", "brand new", "never used", "unopened"]),
    (
        "needs_reorder",
        &[
            "need reorder",
            "needs reorder",
            "need to reorder",
            "needs reordering",
            "reorder",
            "to reorder",
            "need restock",
            "needs restock",
            "restock",
        ],
    ),
];

const PACKAGE_CODES: &[&str] = &[
    // Imperial chip sizes
    "01005", "0201", "0402", "0603", "0805", "1206", "1210", "1812", "2010", "2512",
    // Metric chip sizes
    "1005", "1608", "2012", "3216", "3225", "5025", "6332",
    // Power and diode outlines
    "dpak", "d2pak", "sma", "smb", "smc", "melf", "minimelf",
];

const PACKAGE_FAMILIES: &[&str] = &[
    "dip", "pdip", "soic", "sop", "ssop", "tssop", "msop", "qfn", "dfn", "qfp", "lqfp",
    "tqfp", "bga", "plcc", "sot", "sod", "to", "do", "sip",
];

const PACKAGE_BARE_FAMILIES: &[&str] = &[
    "dip", "pdip", "soic", "ssop", "tssop", "msop", "qfn", "dfn", "qfp", "lqfp", "tqfp",
    "bga", "plcc",
];

const PACKAGE_GENERIC: &[(&str, &[&str])] = &[
    ("SMD", &["smd", "smt", "surface mount", "surface-mount"]),
    ("THT", &["tht", "through-hole", "through hole", "thru-hole", "thru hole"]),
];

const MANUFACTURERS: &[(&str, &[&str])] = &[
    ("Texas Instruments", &["texas instruments", "ti"]),
    ("STMicroelectronics", &["stmicroelectronics", "st", "stm", "st micro"]),
    ("Microchip", &["microchip", "microchip technology"]),
    ("Atmel", &["atmel"]),
    ("NXP", &["nxp", "nxp semiconductors"]),
    ("Analog Devices", &["analog devices", "adi"]),
    ("onsemi", &["onsemi", "on semi", "on semiconductor"]),
    ("Infineon", &["infineon"]),
    ("Vishay", &["vishay"]),
    ("Yageo", &["yageo"]),
    ("Murata", &["murata"]),
    ("KEMET", &["kemet"]),
    ("TDK", &["tdk"]),
    ("Bourns", &["bourns"]),
    ("Panasonic", &["panasonic"]),
    ("Samsung", &["samsung", "samsung electro-mechanics"]),
    ("ROHM", &["rohm"]),
    ("Nichicon", &["nichicon"]),
    ("Maxim Integrated", &["maxim", "maxim integrated"]),
    ("Renesas", &["renesas"]),
    ("Espressif", &["espressif"]),
    ("Diodes Incorporated", &["diodes incorporated", "diodes inc"]),
    ("Littelfuse", &["littelfuse"]),
    ("Molex", &["molex"]),
    ("Würth Elektronik", &["würth", "wurth", "würth elektronik", "wurth elektronik"]),
];

const LOCATION_PREFIXES: &[&str] = &[
    "bin", "box", "drawer", "shelf", "rack", "cabinet", "tray", "slot", "bay", "bag", "case",
];

const PRICE_KEYWORDS: &[&str] = &[
    "cheap", "cheapest", "affordable", "budget", "inexpensive", "low cost", "low-cost",
];

const FILLER_WORDS: &[&str] = &[
    "a", "all", "an", "and", "any", "are", "at", "do", "find", "for", "from", "get", "give",
    "have", "i", "in", "is", "it", "list", "me", "my", "of", "on", "or", "our", "please",
    "search", "show", "some", "that", "the", "there", "to", "what", "which", "with", "we",
    "components", "component", "parts", "part", "items", "item", "stuff", "things",
];

fn alias_table(entries: &[(&str, &[&str])]) -> AliasTable {
    entries
        .iter()
        .map(|(canonical, aliases)| {
            (
                canonical.to_string(),
                aliases.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

fn strings(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl Default for PackageTables {
    fn default() -> Self {
        Self {
            codes: strings(PACKAGE_CODES),
            families: strings(PACKAGE_FAMILIES),
            bare_families: strings(PACKAGE_BARE_FAMILIES),
            generic: alias_table(PACKAGE_GENERIC),
        }
    }
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            component_types: alias_table(COMPONENT_TYPES),
            stock_status: alias_table(STOCK_STATUS),
            packages: PackageTables::default(),
            manufacturers: alias_table(MANUFACTURERS),
            location_prefixes: strings(LOCATION_PREFIXES),
            price_keywords: strings(PRICE_KEYWORDS),
            filler_words: strings(FILLER_WORDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_populated() {
        let config = LexiconConfig::default();
        assert_eq!(
            config.component_types.get("resistor").map(|v| v.len()),
            Some(4)
        );
        assert_eq!(config.stock_status.len(), 5);
        assert!(config.packages.codes.iter().any(|c| c == "0805"));
        assert!(config.manufacturers.contains_key("Texas Instruments"));
    }

    #[test]
    fn test_patch_replaces_only_present_sections() {
        let mut config = LexiconConfig::default();
        let patch: LexiconPatch =
            serde_yaml::from_str("price_keywords: [thrifty]\n").unwrap();
        assert_eq!(patch.sections(), vec!["price_keywords"]);

        config.apply(patch);
        assert_eq!(config.price_keywords, vec!["thrifty".to_string()]);
        assert_eq!(config.component_types, LexiconConfig::default().component_types);
    }

    #[test]
    fn test_partial_package_tables_default_missing_fields() {
        let patch: LexiconPatch =
            serde_yaml::from_str("packages:\n  codes: ['0805']\n").unwrap();
        let packages = patch.packages.unwrap();
        assert_eq!(packages.codes, vec!["0805".to_string()]);
        assert!(!packages.families.is_empty());
    }
}
