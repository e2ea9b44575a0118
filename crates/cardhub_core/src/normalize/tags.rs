//! Tag sanitization and two-source merge.
//!
//! # Invariants
//! - Slugs are lowercase ASCII for Latin input; other scripts are lowercased
//!   where they have case and otherwise pass through.
//! - Merge output is sorted by slug and free of duplicate slugs.
//! - On slug collision the secondary source wins.

use crate::model::tag::Tag;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static WORD_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_]+").expect("valid word boundary regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Merge output: canonical tags plus their name projection in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTags {
    pub tags: Vec<Tag>,
    pub names: Vec<String>,
}

/// Canonicalizes one raw tag string.
///
/// The returned slug may be empty when the input holds only symbols; callers
/// that retain tags must drop those.
pub fn sanitize_tag(raw: &str) -> Tag {
    let trimmed = raw.trim();
    Tag {
        slug: slugify(trimmed),
        name: title_case(trimmed),
    }
}

/// Merges `primary` tags with raw `secondary` names.
///
/// Primary entries are inserted first, so a secondary entry with the same
/// slug replaces the primary display name.
pub fn merge_tags(primary: &[Tag], secondary: &[String]) -> MergedTags {
    let mut by_slug = BTreeMap::<String, String>::new();

    for tag in primary {
        let slug = tag.slug.trim();
        let name = tag.name.trim();
        if slug.is_empty() || name.is_empty() {
            continue;
        }
        by_slug.insert(slug.to_string(), name.to_string());
    }

    for raw in secondary {
        if raw.trim().is_empty() {
            continue;
        }
        let tag = sanitize_tag(raw);
        if tag.slug.is_empty() || tag.name.is_empty() {
            continue;
        }
        by_slug.insert(tag.slug, tag.name);
    }

    let mut merged = MergedTags::default();
    for (slug, name) in by_slug {
        merged.names.push(name.clone());
        merged.tags.push(Tag { slug, name });
    }
    merged
}

/// Builds canonical tags from raw site tag names.
pub fn tags_from_names(names: &[String]) -> Vec<Tag> {
    merge_tags(&[], names).tags
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if c.is_ascii() {
            continue;
        } else if let Some(folded) = fold_latin(c) {
            slug.push_str(folded);
        } else if c.is_alphanumeric() {
            slug.push(c);
        }
    }
    slug
}

fn title_case(value: &str) -> String {
    let spaced = WORD_BOUNDARY_RE.replace_all(value, " ");
    let collapsed = WHITESPACE_RE.replace_all(spaced.trim(), " ");
    collapsed
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        Some(first) => std::iter::once(first).chain(chars).collect(),
        None => String::new(),
    }
}

/// Folds lowercase Latin letters with diacritics to their ASCII base.
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'ǎ' | 'ạ' | 'ả' | 'ấ' | 'ầ'
        | 'ẩ' | 'ẫ' | 'ậ' | 'ắ' | 'ằ' | 'ẳ' | 'ẵ' | 'ặ' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' | 'ẹ' | 'ẻ' | 'ẽ' | 'ế' | 'ề'
        | 'ể' | 'ễ' | 'ệ' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' | 'ǐ' | 'ỉ' | 'ị' => "i",
        'ĳ' => "ij",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' | 'ǒ' | 'ọ' | 'ỏ' | 'ố' | 'ồ'
        | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ớ' | 'ờ' | 'ở' | 'ỡ' | 'ợ' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' | 'ǔ' | 'ư' | 'ụ' | 'ủ'
        | 'ứ' | 'ừ' | 'ử' | 'ữ' | 'ự' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' | 'ỳ' | 'ỵ' | 'ỷ' | 'ỹ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
