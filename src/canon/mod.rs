//! Text canonicalization for register matching.
//!
//! Every comparison the engine performs runs over canonical strings produced
//! here, never over raw register text. `canonicalize` is deterministic, total
//! and idempotent: it never fails, and characters no table covers pass
//! through unchanged.

mod tables;

/// Separator between the stacked lines of a two-row mark. Survives the
/// display profile only.
pub const TWO_ROW_SEPARATOR: char = '＼';

/// Selects which variant of the canonical form is produced.
///
/// `Basic` is the shared core. `Phonetic` layers sound-merging rules on top
/// of it for reading comparison. `Display` keeps the glyphs registered marks
/// distinguish by (two-row separator, middle dot, ampersand). `PartyName`
/// strips legal-entity suffixes around the core pipeline until none remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Basic,
    Display,
    Phonetic,
    PartyName,
}

/// Produces the canonical comparison form of `text` under `profile`.
///
/// The pipeline order is fixed: kana fold, width/case fold, dash collapse,
/// whitespace strip, profile noise strip, punctuation strip, letter-variant
/// fold, legacy-ideograph fold, Roman-numeral fold, then the profile extras.
pub fn canonicalize(text: &str, profile: Profile) -> String {
    if profile == Profile::PartyName {
        // A suffix spelled with glyphs the fold chain rewrites (dots between
        // the letters, Greek capitals) is invisible to the raw-text matcher,
        // so strip again on the folded form until nothing more comes off.
        let mut folded = fold_chain(&strip_entity_suffixes(text), profile);
        loop {
            let stripped = strip_entity_suffixes(&folded);
            if stripped == folded {
                return folded;
            }
            folded = fold_chain(&stripped, profile);
        }
    }

    let folded = fold_chain(text, profile);
    if profile == Profile::Phonetic {
        apply_phonetic_rules(&folded)
    } else {
        folded
    }
}

fn fold_chain(text: &str, profile: Profile) -> String {
    let folded = fold_kana(text);
    let folded = fold_width_case(&folded);
    let folded = collapse_dashes(&folded);
    let folded = strip_whitespace(&folded);
    let folded = strip_noise(&folded, profile);
    let folded = strip_punctuation(&folded);
    let folded = fold_letter_variants(&folded);
    let folded = fold_legacy_ideographs(&folded);
    fold_roman_numerals(&folded)
}

/// Splits a display-profile canonical string on the two-row separator into
/// its component lines plus their concatenation. Non-destructive: a string
/// without the separator yields itself. Empty components are dropped and
/// duplicates collapse, preserving first-seen order.
pub fn split_two_row(text: &str) -> Vec<String> {
    if !text.contains(TWO_ROW_SEPARATOR) {
        return vec![text.to_string()];
    }
    let parts: Vec<&str> = text
        .split(TWO_ROW_SEPARATOR)
        .filter(|part| !part.is_empty())
        .collect();
    let mut keys: Vec<String> = Vec::with_capacity(parts.len() + 1);
    for part in &parts {
        let part = (*part).to_string();
        if !keys.contains(&part) {
            keys.push(part);
        }
    }
    let joined = parts.concat();
    if !joined.is_empty() && !keys.contains(&joined) {
        keys.push(joined);
    }
    keys
}

/// Alternate phonetic-comparison keys for one raw display text: the display
/// canonical form is split on the two-row separator and each component (plus
/// the joined text) is re-canonicalized under the phonetic profile. The batch
/// loader materializes these per record so resolvers can probe them with
/// plain equality.
pub fn mark_keys(display_text: &str) -> Vec<String> {
    let canonical = canonicalize(display_text, Profile::Display);
    let mut keys = Vec::new();
    for part in split_two_row(&canonical) {
        let key = canonicalize(&part, Profile::Phonetic);
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn fold_kana(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            // Hiragana sits exactly 0x60 below its katakana row.
            'ぁ'..='ゖ' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            'ゝ' => 'ヽ',
            'ゞ' => 'ヾ',
            _ => c,
        })
        .collect()
}

fn fold_fullwidth_alnum(c: char) -> char {
    char::from_u32(c as u32 - 0xFEE0)
        .map(|a| a.to_ascii_uppercase())
        .unwrap_or(c)
}

fn fold_width_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(raw) = chars.next() {
        let folded = match raw {
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => fold_fullwidth_alnum(raw),
            _ => *tables::HALFWIDTH_KANA.get(&raw).unwrap_or(&raw),
        };
        // A trailing voicing mark merges into the base it modifies.
        let folded = match chars.peek().copied() {
            Some('ﾞ' | '゛' | '\u{3099}') => match tables::VOICED.get(&folded) {
                Some(&voiced) => {
                    chars.next();
                    voiced
                }
                None => folded,
            },
            Some('ﾟ' | '゜' | '\u{309A}') => match tables::SEMI_VOICED.get(&folded) {
                Some(&semi) => {
                    chars.next();
                    semi
                }
                None => folded,
            },
            _ => folded,
        };
        if folded.is_lowercase() {
            out.extend(folded.to_uppercase());
        } else {
            out.push(folded);
        }
    }
    out
}

fn collapse_dashes(input: &str) -> String {
    input
        .chars()
        .map(|c| if tables::DASHES.contains(&c) { '-' } else { c })
        .collect()
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

fn strip_noise(input: &str, profile: Profile) -> String {
    match profile {
        Profile::Display => input
            .chars()
            .filter_map(|c| match c {
                '\\' => Some(TWO_ROW_SEPARATOR),
                '･' => Some('・'),
                '＆' => Some('&'),
                c if tables::DECORATIVE.contains(&c) => None,
                c if tables::DISPLAY_EXTRA_NOISE.contains(&c) => None,
                c => Some(c),
            })
            .collect(),
        _ => input
            .chars()
            .filter(|c| {
                !tables::DECORATIVE.contains(c) && !tables::BASIC_EXTRA_NOISE.contains(c)
            })
            .collect(),
    }
}

fn strip_punctuation(input: &str) -> String {
    input
        .chars()
        .filter(|c| !tables::PUNCTUATION.contains(c))
        .collect()
}

fn fold_letter_variants(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match tables::LETTER_VARIANTS.get(&c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

fn fold_legacy_ideographs(input: &str) -> String {
    input
        .chars()
        .map(|c| *tables::LEGACY_IDEOGRAPHS.get(&c).unwrap_or(&c))
        .collect()
}

fn fold_roman_numerals(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match tables::ROMAN_NUMERALS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, digits)) => out.push_str(digits),
            None => out.push(c),
        }
    }
    out
}

fn apply_phonetic_rules(input: &str) -> String {
    let merged: String = input
        .chars()
        .map(|c| {
            tables::PHONETIC_MERGERS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect();

    // Subtle-sound substitution, longest pattern first at every position.
    let mut out = String::with_capacity(merged.len());
    let mut rest = merged.as_str();
    'scan: while !rest.is_empty() {
        for (pattern, replacement) in tables::SUBTLE_SOUNDS.iter() {
            if let Some(remainder) = rest.strip_prefix(pattern) {
                out.push_str(replacement);
                rest = remainder;
                continue 'scan;
            }
        }
        let Some(c) = rest.chars().next() else { break };
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    // Small kana raise before the digraph pass, so a sequence the raise
    // uncovers (ウェイ to ウエイ) still contracts in the same pass.
    let raised: String = out
        .chars()
        .map(|c| {
            tables::SMALL_KANA
                .iter()
                .find(|(small, _)| *small == c)
                .map(|(_, full)| *full)
                .unwrap_or(c)
        })
        .collect();

    let mut contracted = raised;
    for (digraph, replacement) in tables::LONG_VOWEL_DIGRAPHS {
        contracted = contracted.replace(digraph, replacement);
    }
    contracted
}

/// Width/case fold used when matching entity-suffix table entries against
/// raw party names. Whitespace is skipped separately by the caller.
fn match_fold(c: char) -> char {
    if ('\u{FF01}'..='\u{FF5E}').contains(&c) {
        char::from_u32(c as u32 - 0xFEE0)
            .map(|a| a.to_ascii_uppercase())
            .unwrap_or(c)
    } else {
        c.to_ascii_uppercase()
    }
}

fn is_alnumish(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, 'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９')
}

/// The cut point of a suffix strip must sit on a word boundary: whitespace
/// between the kept and removed characters always qualifies, and otherwise
/// any adjacency except ASCII alphanumeric touching ASCII alphanumeric does.
/// 株式会社 cuts cleanly off katakana, but the INC inside AZINC never strips.
fn is_cut_boundary(kept_end: usize, kept: char, cut_start: usize, cut: char) -> bool {
    if kept_end < cut_start {
        return true;
    }
    !(is_alnumish(kept) && is_alnumish(cut))
}

const CUT_EDGE_TRIM: &[char] = &[',', '，', '、', '・', '･'];

fn non_whitespace_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn suffix_cut(text: &str, view: &[(usize, char)], pattern: &[char]) -> Option<String> {
    if view.len() < pattern.len() + 2 {
        return None;
    }
    let start = view.len() - pattern.len();
    let matched = view[start..]
        .iter()
        .zip(pattern)
        .all(|((_, raw), want)| match_fold(*raw) == *want);
    if !matched {
        return None;
    }
    let (cut_idx, cut_char) = view[start];
    let (kept_idx, kept_char) = view[start - 1];
    if !is_cut_boundary(kept_idx + kept_char.len_utf8(), kept_char, cut_idx, cut_char) {
        return None;
    }
    let kept = text[..cut_idx]
        .trim_end()
        .trim_end_matches(CUT_EDGE_TRIM)
        .trim_end();
    if non_whitespace_count(kept) < 2 {
        return None;
    }
    Some(kept.to_string())
}

fn prefix_cut(text: &str, view: &[(usize, char)], pattern: &[char]) -> Option<String> {
    if view.len() < pattern.len() + 2 {
        return None;
    }
    let matched = view[..pattern.len()]
        .iter()
        .zip(pattern)
        .all(|((_, raw), want)| match_fold(*raw) == *want);
    if !matched {
        return None;
    }
    let (last_idx, last_char) = view[pattern.len() - 1];
    let (next_idx, next_char) = view[pattern.len()];
    if !is_cut_boundary(last_idx + last_char.len_utf8(), last_char, next_idx, next_char) {
        return None;
    }
    let kept = text[next_idx..]
        .trim_start()
        .trim_start_matches(CUT_EDGE_TRIM)
        .trim_start();
    if non_whitespace_count(kept) < 2 {
        return None;
    }
    Some(kept.to_string())
}

fn strip_one_entity_suffix(text: &str) -> Option<String> {
    let view: Vec<(usize, char)> = text
        .char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .collect();
    if view.is_empty() {
        return None;
    }
    for suffix in tables::ENTITY_SUFFIXES.iter() {
        let pattern: Vec<char> = suffix.chars().collect();
        if let Some(kept) = suffix_cut(text, &view, &pattern) {
            return Some(kept);
        }
        if let Some(kept) = prefix_cut(text, &view, &pattern) {
            return Some(kept);
        }
    }
    None
}

/// Removes legal-entity suffix phrases from either end of a raw party name,
/// repeating until none match. A suffix equal to the entire input is left
/// alone, and a strip that would leave fewer than two characters is not
/// applied.
fn strip_entity_suffixes(input: &str) -> String {
    let mut text = input.trim().to_string();
    while let Some(kept) = strip_one_entity_suffix(&text) {
        text = kept;
    }
    text
}
