//! Card name canonicalisation.
//!
//! Deck exporters decorate card names with quantities, set codes, collector
//! numbers, foil flags and commander markers. [`canonicalize`] strips all of
//! them so the result can be used as a lookup and cache key.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref QUANTITY_PREFIX: Regex = Regex::new(r"^\s*\d+\s*[xX]?\s+").unwrap();
    static ref ALTERNATE_FACE: Regex = Regex::new(r"\s*//.*$").unwrap();
    static ref ASTERISK_FLAGS: Regex = Regex::new(r"(\s*\*[^*]*\*)+\s*$").unwrap();
    static ref FOIL_OR_COMMANDER: Regex = Regex::new(r"(?i)\(\s*(foil|commander)\s*\)").unwrap();
    static ref SET_AND_NUMBER: Regex =
        Regex::new(r"\s*\([A-Za-z0-9]{2,6}\)\s*[A-Za-z0-9★†\-]*\s*$").unwrap();
    static ref PARENTHESIZED: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref BRACED: Regex = Regex::new(r"\{[^}]*\}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip export annotations from a raw card token.
///
/// Steps, in order: quantity prefix, `// back face`, trailing `*FLAG*`s,
/// `(foil)`/`(commander)`, trailing `(SET) 123`, other `( ... )`, `{ ... }`,
/// whitespace collapse. The pass is repeated until the name stops changing,
/// which makes the function idempotent.
pub fn canonicalize(raw: &str) -> String {
    let mut current = canonicalize_once(raw);
    loop {
        let next = canonicalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn canonicalize_once(raw: &str) -> String {
    let name = QUANTITY_PREFIX.replace(raw, "");
    let name = ALTERNATE_FACE.replace(&name, "");
    let name = ASTERISK_FLAGS.replace(&name, "");
    let name = FOIL_OR_COMMANDER.replace_all(&name, " ");
    let name = SET_AND_NUMBER.replace(&name, "");
    let name = PARENTHESIZED.replace_all(&name, " ");
    let name = BRACED.replace_all(&name, " ");
    WHITESPACE.replace_all(&name, " ").trim().to_string()
}

/// Cache key for a canonical name
pub fn cache_key(canonical: &str) -> String {
    canonical.to_lowercase()
}
