//! Query-side types: searchable fields, raw conditions and the term parser.
//!
//! A raw query string turns into a [`ParsedQuery`] before any store access:
//! wildcard detection, partial-match glyph stripping, comma/whitespace
//! splitting and per-term canonicalization all happen here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canon::{self, Profile};
use crate::error::{Result, SearchError};

/// Glyphs that stand for "match everything" when they are the entire query.
const WILDCARD_GLYPHS: &[char] = &['*', '＊'];

/// Glyphs that request substring matching; stripped wherever they appear.
const PARTIAL_GLYPHS: &[char] = &['?', '？'];

/// Every field a condition may search on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ApplicationNumber,
    RegistrationNumber,
    InternationalRegistrationNumber,
    DisplayText,
    Phonetic,
    PhoneticExact,
    ClassificationCode,
    SimilarGroupCode,
    GoodsServicesText,
    ApplicantName,
}

impl Field {
    /// Canonicalization profile applied to raw terms for this field.
    pub fn profile(self) -> Profile {
        match self {
            Field::DisplayText => Profile::Display,
            Field::Phonetic | Field::PhoneticExact => Profile::Phonetic,
            Field::ApplicantName => Profile::PartyName,
            _ => Profile::Basic,
        }
    }

    /// Whether domestic applications carry this field.
    pub fn covers_domestic(self) -> bool {
        !matches!(self, Field::InternationalRegistrationNumber)
    }

    /// Whether international registrations carry this field.
    pub fn covers_international(self) -> bool {
        !matches!(self, Field::ApplicationNumber | Field::RegistrationNumber)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::ApplicationNumber => "application_number",
            Field::RegistrationNumber => "registration_number",
            Field::InternationalRegistrationNumber => "international_registration_number",
            Field::DisplayText => "display_text",
            Field::Phonetic => "phonetic",
            Field::PhoneticExact => "phonetic_exact",
            Field::ClassificationCode => "classification_code",
            Field::SimilarGroupCode => "similar_group_code",
            Field::GoodsServicesText => "goods_services_text",
            Field::ApplicantName => "applicant_name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single global combinator applied across all conditions of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

/// One raw search condition as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: Field,
    pub raw_query: String,
}

/// A raw query string broken into canonical terms plus its match flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<String>,
    pub wildcard_all: bool,
    pub partial_match: bool,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && !self.wildcard_all
    }
}

/// Parses one raw query string under the canonicalization profile of the
/// field it targets.
///
/// The sole wildcard glyph yields `wildcard_all` with no terms; a wildcard
/// glyph mixed into longer text is malformed. Partial-match glyphs are
/// stripped wherever they appear and recorded in the flag. The remainder is
/// split on half/full width commas and whitespace runs, and every surviving
/// piece is canonicalized; pieces that canonicalize to nothing are dropped.
pub fn parse(raw: &str, profile: Profile) -> Result<ParsedQuery> {
    let trimmed = raw.trim();
    if matches!(trimmed, "*" | "＊") {
        return Ok(ParsedQuery {
            terms: Vec::new(),
            wildcard_all: true,
            partial_match: false,
        });
    }
    if trimmed.contains(WILDCARD_GLYPHS) {
        return Err(SearchError::InvalidQuery(format!(
            "wildcard glyph must stand alone: {trimmed:?}"
        )));
    }

    let mut partial_match = false;
    let stripped: String = trimmed
        .chars()
        .filter(|c| {
            if PARTIAL_GLYPHS.contains(c) {
                partial_match = true;
                false
            } else {
                true
            }
        })
        .collect();

    let mut terms = Vec::new();
    for piece in stripped.split(|c: char| c == ',' || c == '，' || c.is_whitespace()) {
        if piece.is_empty() {
            continue;
        }
        let term = canon::canonicalize(piece, profile);
        if term.is_empty() || terms.contains(&term) {
            continue;
        }
        terms.push(term);
    }

    Ok(ParsedQuery {
        terms,
        wildcard_all: false,
        partial_match,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sole_wildcard_glyph_matches_all() {
        for raw in ["*", "＊", "  *  "] {
            let parsed = parse(raw, Profile::Basic).expect("parse");
            assert!(parsed.wildcard_all, "raw {raw:?}");
            assert!(parsed.terms.is_empty());
            assert!(!parsed.partial_match);
        }
    }

    #[test]
    fn embedded_wildcard_is_malformed() {
        for raw in ["ソニー*", "*ソニー", "a*b", "**"] {
            let err = parse(raw, Profile::Basic).expect_err("should reject");
            assert!(matches!(err, SearchError::InvalidQuery(_)), "raw {raw:?}");
        }
    }

    #[test]
    fn partial_glyph_sets_flag_and_is_stripped() {
        let parsed = parse("ソニー?", Profile::Display).expect("parse");
        assert!(parsed.partial_match);
        assert_eq!(parsed.terms, vec!["ソニ-".to_string()]);

        let parsed = parse("ソ？ニー", Profile::Display).expect("parse");
        assert!(parsed.partial_match);
        assert_eq!(parsed.terms, vec!["ソニ-".to_string()]);
    }

    #[test]
    fn splits_on_commas_and_whitespace_runs() {
        let parsed = parse("ソニー,パナソニック　東芝", Profile::Display).expect("parse");
        assert_eq!(
            parsed.terms,
            vec![
                "ソニ-".to_string(),
                "パナソニック".to_string(),
                "東芝".to_string(),
            ]
        );
        assert!(!parsed.partial_match);
    }

    #[test]
    fn canonicalizes_terms_under_the_given_profile() {
        let parsed = parse("そにー", Profile::Phonetic).expect("parse");
        assert_eq!(parsed.terms, vec!["ソニ-".to_string()]);

        let parsed = parse("ソニー株式会社", Profile::PartyName).expect("parse");
        assert_eq!(parsed.terms, vec!["ソニ-".to_string()]);
    }

    #[test]
    fn drops_empty_and_duplicate_terms() {
        let parsed = parse("ソニー , , ソニー", Profile::Display).expect("parse");
        assert_eq!(parsed.terms, vec!["ソニ-".to_string()]);

        let parsed = parse("", Profile::Basic).expect("parse");
        assert!(parsed.is_empty());
        assert!(!parsed.partial_match);
    }
}
