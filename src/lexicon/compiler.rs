//! LexiconCompiler - Build the immutable lexicon from table configuration.
//!
//! ## Build Process
//!
//! 1. Normalize every alias with the query normalizer
//! 2. Index aliases per table, rejecting empty and conflicting ones
//! 3. Collect the reserved-token set used by the location recognizer
//! 4. Build package-family and location-prefix patterns from table content
//! 5. Compute a deterministic hash of the source tables
//!
//! ## Usage
//!
//! ```rust
//! use inventory_nlq::lexicon::{LexiconCompiler, LexiconConfig};
//!
//! let config = LexiconConfig::default();
//! let lexicon = LexiconCompiler::new(&config).build().unwrap();
//! assert_eq!(lexicon.hash.len(), 64);
//! ```

use std::collections::{HashMap, HashSet};

use nlq_types::StockStatus;
use regex::Regex;
use sha2::{Digest, Sha256};

use super::snapshot::{Lexicon, PhraseTable};
use super::types::{AliasTable, LexiconConfig};
use crate::error::LexiconError;
use crate::normalize::normalize_phrase;
use crate::recognizers::{location, price};

/// Compiler for building a [`Lexicon`] from a [`LexiconConfig`].
pub struct LexiconCompiler<'a> {
    config: &'a LexiconConfig,
}

impl<'a> LexiconCompiler<'a> {
    pub fn new(config: &'a LexiconConfig) -> Self {
        Self { config }
    }

    pub fn build(&self) -> Result<Lexicon, LexiconError> {
        let config = self.config;
        let mut reserved: HashSet<String> = HashSet::new();

        let component_types =
            index_aliases("component_types", &config.component_types, |c| Ok(c.to_string()))?;
        let stock_status = index_aliases("stock_status", &config.stock_status, |c| {
            StockStatus::from_canonical(c)
                .ok_or_else(|| LexiconError::UnknownStockStatus(c.to_string()))
        })?;
        let package_generic =
            index_aliases("packages.generic", &config.packages.generic, |c| Ok(c.to_string()))?;
        let manufacturers =
            index_aliases("manufacturers", &config.manufacturers, |c| Ok(c.to_string()))?;

        let mut price_keywords = PhraseTable::default();
        for keyword in &config.price_keywords {
            let phrase = normalized("price_keywords", keyword)?;
            price_keywords.insert(phrase.clone(), phrase);
        }

        reserve(&mut reserved, component_types.phrases());
        reserve(&mut reserved, stock_status.phrases());
        reserve(&mut reserved, package_generic.phrases());
        reserve(&mut reserved, manufacturers.phrases());
        reserve(&mut reserved, price_keywords.phrases());

        let package_codes = normalized_set("packages.codes", &config.packages.codes)?;
        let package_families = normalized_set("packages.families", &config.packages.families)?;
        let package_bare_families =
            normalized_set("packages.bare_families", &config.packages.bare_families)?;
        let location_prefixes = normalized_set("location_prefixes", &config.location_prefixes)?;
        let filler_words = normalized_set("filler_words", &config.filler_words)?;

        for set in [
            &package_codes,
            &package_families,
            &package_bare_families,
            &location_prefixes,
            &filler_words,
        ] {
            reserve(&mut reserved, set.iter().map(String::as_str));
        }
        reserve(&mut reserved, price::OPERATOR_WORDS.iter().copied());
        reserve(&mut reserved, location::LEAD_IN_WORDS.iter().copied());

        let package_family = alternation(&package_families)
            .map(|alts| Regex::new(&format!(r"\b({alts})-?([0-9]{{1,3}})\b")))
            .transpose()?;
        let location_prefix = alternation(&location_prefixes)
            .map(|alts| {
                Regex::new(&format!(
                    r"\b({alts})(?:(?:-|\s)?[0-9]{{1,4}}|(?:-|\s)[a-z][0-9]{{0,3}})\b"
                ))
            })
            .transpose()?;

        let hash = compute_hash(config);

        tracing::debug!(
            hash = %hash,
            component_types = component_types.len(),
            stock_phrases = stock_status.len(),
            manufacturers = manufacturers.len(),
            "compiled lexicon"
        );

        Ok(Lexicon {
            hash,
            component_types,
            stock_status,
            package_generic,
            manufacturers,
            price_keywords,
            package_codes,
            package_bare_families,
            filler_words,
            reserved,
            package_family,
            location_prefix,
        })
    }
}

/// Compile `config` into a lexicon.
pub fn compile(config: &LexiconConfig) -> Result<Lexicon, LexiconError> {
    LexiconCompiler::new(config).build()
}

fn normalized(table: &'static str, raw: &str) -> Result<String, LexiconError> {
    let phrase = normalize_phrase(raw);
    if phrase.is_empty() {
        return Err(LexiconError::EmptyAlias {
            table,
            canonical: raw.to_string(),
        });
    }
    Ok(phrase)
}

fn normalized_set(table: &'static str, raw: &[String]) -> Result<HashSet<String>, LexiconError> {
    raw.iter().map(|r| normalized(table, r)).collect()
}

fn index_aliases<V, F>(
    table: &'static str,
    aliases: &AliasTable,
    mut canonical_value: F,
) -> Result<PhraseTable<V>, LexiconError>
where
    V: Clone,
    F: FnMut(&str) -> Result<V, LexiconError>,
{
    let mut index = PhraseTable::default();
    // Normalized alias → canonical key that claimed it
    let mut owners: HashMap<String, &str> = HashMap::new();

    for (canonical, list) in aliases {
        let value = canonical_value(canonical)?;
        for alias in list {
            let phrase = normalize_phrase(alias);
            if phrase.is_empty() {
                return Err(LexiconError::EmptyAlias {
                    table,
                    canonical: canonical.clone(),
                });
            }
            if let Some(first) = owners.get(&phrase) {
                if *first != canonical.as_str() {
                    return Err(LexiconError::ConflictingAlias {
                        table,
                        alias: phrase,
                        first: first.to_string(),
                        second: canonical.clone(),
                    });
                }
                continue;
            }
            owners.insert(phrase.clone(), canonical);
            index.insert(phrase, value.clone());
        }
    }

    Ok(index)
}

fn reserve<'s>(reserved: &mut HashSet<String>, phrases: impl Iterator<Item = &'s str>) {
    for phrase in phrases {
        for token in phrase.split(' ') {
            reserved.insert(token.to_string());
        }
    }
}

/// Regex alternation over `words`, longest first so that `pdip` is tried
/// before `dip`. `None` when there are no words.
fn alternation(words: &HashSet<String>) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    let mut sorted: Vec<&String> = words.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    Some(
        sorted
            .into_iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compute_hash(config: &LexiconConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"inventory_nlq_lexicon_v1");

    let mut feed_table = |name: &str, table: &AliasTable| {
        hasher.update(name.as_bytes());
        for (canonical, aliases) in table {
            hasher.update(b"\x1e");
            hasher.update(canonical.as_bytes());
            for alias in aliases {
                hasher.update(b"\x1f");
                hasher.update(alias.as_bytes());
            }
        }
    };
    feed_table("component_types", &config.component_types);
    feed_table("stock_status", &config.stock_status);
    feed_table("packages.generic", &config.packages.generic);
    feed_table("manufacturers", &config.manufacturers);

    for (name, list) in [
        ("packages.codes", &config.packages.codes),
        ("packages.families", &config.packages.families),
        ("packages.bare_families", &config.packages.bare_families),
        ("location_prefixes", &config.location_prefixes),
        ("price_keywords", &config.price_keywords),
        ("filler_words", &config.filler_words),
    ] {
        hasher.update(name.as_bytes());
        for item in list {
            hasher.update(b"\x1f");
            hasher.update(item.as_bytes());
        }
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        assert_eq!(
            lexicon.component_types.get("res").map(|e| e.canonical.as_str()),
            Some("resistor")
        );
        assert_eq!(
            lexicon.stock_status.get("low stock").map(|e| e.canonical),
            Some(StockStatus::Low)
        );
        assert_eq!(
            lexicon
                .package_generic
                .get("through-hole")
                .map(|e| e.canonical.as_str()),
            Some("THT")
        );
        assert!(lexicon.package_codes.contains("0805"));
        assert!(lexicon.is_filler("show"));
    }

    #[test]
    fn test_reserved_tokens_cover_tables() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        for token in ["stock", "resistors", "least", "drawer", "cheap", "semi"] {
            assert!(lexicon.is_reserved(token), "{token} should be reserved");
        }
        assert!(!lexicon.is_reserved("garage"));
    }

    #[test]
    fn test_hash_is_deterministic_and_content_sensitive() {
        let config = LexiconConfig::default();
        let a = compile(&config).unwrap();
        let b = compile(&config).unwrap();
        assert_eq!(a.hash, b.hash);

        let mut changed = config.clone();
        changed.price_keywords.push("thrifty".to_string());
        let c = compile(&changed).unwrap();
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn test_conflicting_alias_rejected() {
        let mut config = LexiconConfig::default();
        config
            .component_types
            .insert("rheostat".to_string(), vec!["RES".to_string()]);
        let err = compile(&config).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::ConflictingAlias { table: "component_types", ref alias, .. } if alias == "res"
        ));
    }

    #[test]
    fn test_empty_alias_rejected() {
        let mut config = LexiconConfig::default();
        config
            .manufacturers
            .insert("Acme".to_string(), vec!["!!".to_string()]);
        let err = compile(&config).unwrap_err();
        assert!(matches!(err, LexiconError::EmptyAlias { table: "manufacturers", .. }));
    }

    #[test]
    fn test_unknown_stock_status_rejected() {
        let mut config = LexiconConfig::default();
        config
            .stock_status
            .insert("discontinued".to_string(), vec!["eol".to_string()]);
        let err = compile(&config).unwrap_err();
        assert!(matches!(err, LexiconError::UnknownStockStatus(ref s) if s == "discontinued"));
    }

    #[test]
    fn test_family_pattern_prefers_longest() {
        let lexicon = compile(&LexiconConfig::default()).unwrap();
        let re = lexicon.package_family.as_ref().unwrap();
        let caps = re.captures("pdip-8").unwrap();
        assert_eq!(&caps[1], "pdip");
        assert_eq!(&caps[2], "8");
        assert!(re.captures("sot23").is_some());
        assert!(re.captures("up to 10").is_none());
    }

    #[test]
    fn test_empty_tables_compile() {
        let config = LexiconConfig {
            component_types: AliasTable::new(),
            stock_status: AliasTable::new(),
            packages: Default::default(),
            manufacturers: AliasTable::new(),
            location_prefixes: Vec::new(),
            price_keywords: Vec::new(),
            filler_words: Vec::new(),
        };
        let lexicon = compile(&config).unwrap();
        assert!(lexicon.component_types.is_empty());
        assert!(lexicon.location_prefix.is_none());
    }
}
