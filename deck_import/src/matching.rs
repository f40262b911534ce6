//! String helpers for the resolver: edit distance and lookup variants.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARENTHESIZED: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]]*\]").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r#"[,.;:!?"]"#).unwrap();
    static ref STOPWORDS: Regex = Regex::new(
        r"(?i)\b(foil|non-?foil|etched|promo|proxy|borderless|showcase|extended art|prerelease|signed|altered)\b"
    )
    .unwrap();
}

/// Levenshtein distance over Unicode scalar values
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Case-insensitive edit distance between a query and a card name.
/// Double-faced names are also compared by their front face.
pub fn name_distance(query: &str, card_name: &str) -> usize {
    let query = query.to_lowercase();
    let full = card_name.to_lowercase();
    let front = full.split(" // ").next().unwrap_or(&full).to_string();
    levenshtein(&query, &full).min(levenshtein(&query, &front))
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_ligatures(s: &str) -> String {
    s.replace('Æ', "Ae")
        .replace('æ', "ae")
        .replace('Œ', "Oe")
        .replace('œ', "oe")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
}

/// Alternative spellings to try after an exact miss, in fixed order:
/// parentheses removed, brackets removed, ligatures normalised,
/// punctuation removed, annotation words removed. Duplicates of the
/// input or of earlier variants are dropped.
pub fn name_variants(canonical: &str) -> Vec<String> {
    let candidates = [
        collapse(&PARENTHESIZED.replace_all(canonical, " ")),
        collapse(&BRACKETED.replace_all(canonical, " ")),
        normalize_ligatures(canonical),
        collapse(&PUNCTUATION.replace_all(canonical, "")),
        collapse(&STOPWORDS.replace_all(canonical, " ")),
    ];

    let mut variants: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.is_empty()
            || candidate.eq_ignore_ascii_case(canonical)
            || variants.iter().any(|v| v.eq_ignore_ascii_case(&candidate))
        {
            continue;
        }
        variants.push(candidate);
    }
    variants
}

/// First word of a name with surrounding punctuation removed, used as a broad search term
pub fn first_token(canonical: &str) -> Option<String> {
    canonical
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|word| !word.is_empty())
        .map(str::to_string)
}
