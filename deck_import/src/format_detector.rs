//! Deck-list dialect sniffing.
//!
//! Each exporter gets one or more structural fingerprints. The fingerprints
//! are necessary but not sufficient, so they are tried in a fixed order,
//! most specific first, and the first match wins. Anything unmatched is
//! [`FormatTag::Generic`].

use log::debug;

use crate::models::{FormatTag, ParsedDeck};
use crate::parsers::{archidekt, edhrec, generic, moxfield, mtga, mtggoldfish, mtgo, tappedout};

/// A fingerprint paired with the parser for the dialect it identifies
#[derive(Clone, Copy)]
pub struct Dialect {
    pub tag: FormatTag,
    /// Short description of the fingerprint, for logs
    pub fingerprint: &'static str,
    pub detect: fn(&str) -> bool,
    pub parse: fn(&str) -> ParsedDeck,
}

fn always(_: &str) -> bool {
    true
}

/// Fingerprints in priority order; the last entry always matches
pub const DIALECTS: &[Dialect] = &[
    Dialect {
        tag: FormatTag::Moxfield,
        fingerprint: "\"Commander:\" label",
        detect: moxfield::has_commander_label,
        parse: moxfield::parse,
    },
    Dialect {
        tag: FormatTag::Archidekt,
        fingerprint: "[Category] tags",
        detect: archidekt::detect,
        parse: archidekt::parse,
    },
    Dialect {
        tag: FormatTag::Tappedout,
        fingerprint: "*CMDR* with printing details",
        detect: tappedout::detect,
        parse: tappedout::parse,
    },
    Dialect {
        tag: FormatTag::Edhrec,
        fingerprint: "*CMDR* marker",
        detect: edhrec::detect,
        parse: edhrec::parse,
    },
    Dialect {
        tag: FormatTag::Mtga,
        fingerprint: "Deck/Sideboard headers",
        detect: mtga::detect,
        parse: mtga::parse,
    },
    Dialect {
        tag: FormatTag::Mtggoldfish,
        fingerprint: "\"Name <commander> <theme>\" title",
        detect: mtggoldfish::detect,
        parse: mtggoldfish::parse,
    },
    Dialect {
        tag: FormatTag::Moxfield,
        fingerprint: "(SET) number column without *CMDR*",
        detect: moxfield::has_set_code_columns,
        parse: moxfield::parse,
    },
    Dialect {
        tag: FormatTag::Mtgo,
        fingerprint: "flat list with trailing single-copy block",
        detect: mtgo::detect,
        parse: mtgo::parse,
    },
    Dialect {
        tag: FormatTag::Generic,
        fingerprint: "fallback",
        detect: always,
        parse: generic::parse,
    },
];

/// First dialect whose fingerprint matches `text`
pub fn detect_dialect(text: &str) -> &'static Dialect {
    let text = text.trim();
    let dialect = DIALECTS
        .iter()
        .find(|dialect| (dialect.detect)(text))
        .unwrap_or(&DIALECTS[DIALECTS.len() - 1]);
    debug!(
        "Detected format {} via {}",
        dialect.tag, dialect.fingerprint
    );
    dialect
}

/// Classify raw deck text; never fails
pub fn detect_format(text: &str) -> FormatTag {
    detect_dialect(text).tag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mtgo_sample() -> String {
        let mut text: String = (1..=25).map(|i| format!("1 Card Number {i}\n")).collect();
        text.push_str("\n1 Alesha, Who Smiles at Death\n");
        text
    }

    #[test]
    fn detects_moxfield_commander_label() {
        let text = "Commander: Alesha, Who Smiles at Death\n\nMain:\n1 Sol Ring\n1 Command Tower";
        assert_eq!(detect_format(text), FormatTag::Moxfield);
    }

    #[test]
    fn detects_moxfield_set_code_columns() {
        let text = "1 Alesha, Who Smiles at Death (KTK) 163\n1 Sol Ring (CMM) 410\n1 Command Tower (CMM) 1037";
        assert_eq!(detect_format(text), FormatTag::Moxfield);
    }

    #[test]
    fn detects_edhrec_cmdr_marker() {
        let text = "1x Alesha, Who Smiles at Death *CMDR*\n1x Sol Ring";
        assert_eq!(detect_format(text), FormatTag::Edhrec);
    }

    #[test]
    fn set_codes_with_cmdr_select_tappedout() {
        let text = "1x Alesha, Who Smiles at Death (KTK) 163 *CMDR*\n1x Sol Ring (CMM) 410";
        assert_eq!(detect_format(text), FormatTag::Tappedout);

        let foil = "1x Alesha, Who Smiles at Death *CMDR*\n1x Sol Ring *F*";
        assert_eq!(detect_format(foil), FormatTag::Tappedout);
    }

    #[test]
    fn detects_archidekt_tags() {
        let text = "1x Alesha, Who Smiles at Death (ktk) 163 [Commander{top}]\n1x Sol Ring (cmm) 410 [Ramp]";
        assert_eq!(detect_format(text), FormatTag::Archidekt);
    }

    #[test]
    fn detects_mtga_headers() {
        let text = "Commander\n1 Alesha, Who Smiles at Death (KTK) 163\n\nDeck\n1 Sol Ring (CMM) 410";
        assert_eq!(detect_format(text), FormatTag::Mtga);
    }

    #[test]
    fn detects_mtggoldfish_title() {
        let text = "Name Alesha Aristocrats\n1 Alesha, Who Smiles at Death\n1 Sol Ring";
        assert_eq!(detect_format(text), FormatTag::Mtggoldfish);
    }

    #[test]
    fn detects_mtgo_trailing_commander() {
        assert_eq!(detect_format(&mtgo_sample()), FormatTag::Mtgo);
    }

    #[test]
    fn short_list_with_trailing_block_is_generic() {
        let text = "1 Sol Ring\n1 Arcane Signet\n\n1 Alesha, Who Smiles at Death";
        assert_eq!(detect_format(text), FormatTag::Generic);
    }

    #[test]
    fn unmarked_text_is_generic() {
        assert_eq!(detect_format("1 Sol Ring\n1 Command Tower"), FormatTag::Generic);
        assert_eq!(detect_format("Sol Ring\nCommand Tower"), FormatTag::Generic);
        assert_eq!(detect_format(""), FormatTag::Generic);
    }

    #[test]
    fn every_format_has_a_dialect() {
        for tag in FormatTag::all() {
            assert!(DIALECTS.iter().any(|d| d.tag == *tag), "no dialect for {tag}");
        }
    }

    #[test]
    fn fallback_is_last() {
        assert_eq!(DIALECTS[DIALECTS.len() - 1].tag, FormatTag::Generic);
    }
}
