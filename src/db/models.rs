//! Boundary types shared by the store, the engine and its callers.

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

/// Width of one similar-group token inside the flat stored column.
pub const SIMILAR_GROUP_TOKEN_LEN: usize = 5;

/// One search result row in the unified display schema, shared by the
/// domestic and international families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub identifier: String,
    pub display_text: Option<String>,
    pub phonetics: Vec<String>,
    pub application_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub applicant_name: Option<String>,
    pub rights_holder_name: Option<String>,
    pub classification_entries: Vec<ClassificationEntry>,
    pub is_international: bool,
    pub has_image: bool,
}

/// One classification row of a record: the class, its decoded similar-group
/// tokens and the goods/services designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub class_number: String,
    pub similar_group_codes: Vec<String>,
    pub goods_text: Option<String>,
}

/// Decodes the flat similar-group column into its fixed-width tokens.
///
/// The stored value is a plain concatenation of five-character codes; it is
/// never compared as a blob. A trailing fragment shorter than one token is
/// kept as-is rather than dropped, so dirty data stays visible.
pub fn decode_similar_groups(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.trim().chars().collect();
    chars
        .chunks(SIMILAR_GROUP_TOKEN_LEN)
        .map(|chunk| chunk.iter().collect::<String>())
        .filter(|token| !token.is_empty())
        .collect()
}
