//! Query text normalization
//!
//! Produces the canonical text every recognizer scans:
//! - Control characters dropped (replaced with space)
//! - Unicode NFKC fold, per character
//! - Symbol aliasing: `Ω` → `ohm`, `μ`/`µ` → `u`
//! - Lowercase conversion
//! - Punctuation stripped, except `.` between digits, `-` inside words
//!   (`bin-23`, `to-220`) and `$` in front of an amount
//! - Whitespace collapsing
//!
//! Every token remembers the byte range of the caller's query it came
//! from, so a parse trace can point back at the original text.

use std::ops::Range;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// A whitespace-delimited token of the normalized query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Normalized token text
    pub text: String,
    /// Start byte offset in the normalized text
    pub start: usize,
    /// End byte offset in the normalized text (exclusive)
    pub end: usize,
    /// Byte range of the token in the original query
    pub original: Range<usize>,
}

/// A normalized query: text and tokens.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    text: String,
    tokens: Vec<Token>,
}

impl NormalizedQuery {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A folded character with the original byte range it came from.
#[derive(Clone)]
struct Folded {
    ch: char,
    origin: Range<usize>,
}

/// Normalize query text.
///
/// Never fails: anything that cannot be represented is dropped or turned
/// into whitespace.
///
/// ```
/// use inventory_nlq::normalize::normalize_query;
///
/// let q = normalize_query("  10kΩ  SMD, Resistors!! ");
/// assert_eq!(q.text(), "10kohm smd resistors");
/// assert_eq!(q.tokens().len(), 3);
/// ```
pub fn normalize_query(raw: &str) -> NormalizedQuery {
    let folded = fold_chars(raw);
    let filtered = strip_punctuation(&folded);
    collapse(filtered)
}

/// Join the normalized tokens of a phrase with single spaces.
///
/// Used to index lexicon phrases with the same rules applied to queries.
pub fn normalize_phrase(phrase: &str) -> String {
    normalize_query(phrase)
        .tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_chars(raw: &str) -> Vec<Folded> {
    let mut out = Vec::with_capacity(raw.len());

    for (i, c) in raw.char_indices() {
        let origin = i..i + c.len_utf8();

        if c.is_control() {
            out.push(Folded {
                ch: ' ',
                origin,
            });
            continue;
        }

        for nc in c.nfkc() {
            match nc {
                // Greek capital/small omega; NFKC folds the ohm sign to capital omega
                'Ω' | 'ω' => {
                    for ch in "ohm".chars() {
                        out.push(Folded {
                            ch,
                            origin: origin.clone(),
                        });
                    }
                }
                // Greek mu; NFKC folds the micro sign to it
                'μ' => out.push(Folded {
                    ch: 'u',
                    origin: origin.clone(),
                }),
                _ => {
                    for ch in nc.to_lowercase() {
                        out.push(Folded {
                            ch,
                            origin: origin.clone(),
                        });
                    }
                }
            }
        }
    }

    out
}

fn strip_punctuation(folded: &[Folded]) -> Vec<Folded> {
    let mut out = Vec::with_capacity(folded.len());

    for (idx, f) in folded.iter().enumerate() {
        let prev = idx.checked_sub(1).and_then(|p| folded.get(p)).map(|p| p.ch);
        let next = folded.get(idx + 1).map(|n| n.ch);
        let digit_before = prev.is_some_and(|c| c.is_ascii_digit());
        let digit_after = next.is_some_and(|c| c.is_ascii_digit());

        let kept = match f.ch {
            c if c.is_alphanumeric() => Some(c),
            '.' if digit_before && digit_after => Some('.'),
            '-' if prev.is_some_and(|c| c.is_alphanumeric())
                && next.is_some_and(|c| c.is_alphanumeric() || c == '$') =>
            {
                Some('-')
            }
            '$' if digit_after => Some('$'),
            // Digit grouping ("1,000") and in-word apostrophes vanish
            ',' if digit_before && digit_after => None,
            '\'' | '’' if prev.is_some_and(|c| c.is_alphabetic())
                && next.is_some_and(|c| c.is_alphabetic()) =>
            {
                None
            }
            _ => Some(' '),
        };

        if let Some(ch) = kept {
            out.push(Folded {
                ch,
                origin: f.origin.clone(),
            });
        }
    }

    out
}

fn collapse(chars: Vec<Folded>) -> NormalizedQuery {
    let mut text = String::with_capacity(chars.len());
    let mut tokens = Vec::new();

    let mut current: Option<(usize, usize)> = None; // (normalized start, original start)
    let mut last_original_end = 0;

    for f in chars {
        if f.ch.is_whitespace() {
            if let Some((start, original_start)) = current.take() {
                tokens.push(Token {
                    text: text[start..].to_string(),
                    start,
                    end: text.len(),
                    original: original_start..last_original_end,
                });
            }
            continue;
        }

        if current.is_none() {
            if !text.is_empty() {
                text.push(' ');
            }
            current = Some((text.len(), f.origin.start));
        }

        text.push(f.ch);
        last_original_end = f.origin.end;
    }

    if let Some((start, original_start)) = current {
        tokens.push(Token {
            text: text[start..].to_string(),
            start,
            end: text.len(),
            original: original_start..last_original_end,
        });
    }

    NormalizedQuery { text, tokens }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(q: &NormalizedQuery) -> Vec<&str> {
        q.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_lowercase_and_collapse() {
        let q = normalize_query("  Show   ME\tResistors ");
        assert_eq!(q.text(), "show me resistors");
        assert_eq!(texts(&q), vec!["show", "me", "resistors"]);
    }

    #[test]
    fn test_symbol_aliasing() {
        assert_eq!(normalize_query("10kΩ").text(), "10kohm");
        // Ohm sign (U+2126) folds the same way
        assert_eq!(normalize_query("10k\u{2126}").text(), "10kohm");
        assert_eq!(normalize_query("100μF").text(), "100uf");
        // Micro sign (U+00B5)
        assert_eq!(normalize_query("100\u{b5}F").text(), "100uf");
    }

    #[test]
    fn test_full_width_folded() {
        assert_eq!(normalize_query("Ｒｅｓｉｓｔｏｒ").text(), "resistor");
    }

    #[test]
    fn test_punctuation_rules() {
        assert_eq!(normalize_query("3.3V regulators.").text(), "3.3v regulators");
        assert_eq!(normalize_query("Bin-23, TO-220").text(), "bin-23 to-220");
        assert_eq!(normalize_query("under $5!").text(), "under $5");
        assert_eq!(normalize_query("$5-$10").text(), "$5-$10");
        assert_eq!(normalize_query("1,000 pcs").text(), "1000 pcs");
        assert_eq!(normalize_query("what's - left?").text(), "whats left");
        assert_eq!(normalize_query("$ signs").text(), "signs");
    }

    #[test]
    fn test_control_characters_stripped() {
        let q = normalize_query("res\u{0}istors\u{7}\nin A1");
        assert_eq!(q.text(), "res istors in a1");
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(normalize_query("").is_empty());
        assert!(normalize_query("  ?! ").is_empty());
        assert_eq!(normalize_query("  ?! ").text(), "");
    }

    #[test]
    fn test_original_offsets() {
        let raw = "Resistors in  Bin-23";
        let q = normalize_query(raw);
        let bin = &q.tokens()[2];
        assert_eq!(bin.text, "bin-23");
        assert_eq!(&raw[bin.original.clone()], "Bin-23");
        assert_eq!(&raw[q.tokens()[1].original.clone()], "in");
    }

    #[test]
    fn test_offsets_through_expansion() {
        let raw = "4.7kΩ";
        let q = normalize_query(raw);
        assert_eq!(q.text(), "4.7kohm");
        let t = &q.tokens()[0];
        assert_eq!(t.original, 0..raw.len());
    }

    #[test]
    fn test_replacement_characters_become_spaces() {
        let q = normalize_query(&String::from_utf8_lossy(b"caps \xff\xfe 10uF"));
        assert_eq!(q.text(), "caps 10uf");
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("Through-Hole"), "through-hole");
        assert_eq!(normalize_phrase("  Texas   Instruments "), "texas instruments");
    }
}
