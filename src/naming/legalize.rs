//! Identifier validity under Unicode general-category rules.
//!
//! Start: letters, letter-numbers (`Nl`) and `_`.
//! Continue: start characters plus decimal digits, connector punctuation,
//! combining marks (`Mn`, `Mc`) and formatting characters (`Cf`).
//!
//! XID_Start/XID_Continue are the base sets. They also admit the
//! Other_ID_Start and Other_ID_Continue compatibility characters, which are
//! symbols and punctuation (`Sm`, `So`, `Sk`, `Po`, `No`); those are removed.

use unicode_xid::UnicodeXID;

/// Stand-in for names built from an empty string.
pub const PLACEHOLDER: &str = "Empty";

/// `Cf` ranges; XID_Continue leaves these out.
const FORMAT_CHARS: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
];

/// Other_ID_Start members that are symbols.
const OTHER_ID_START: &[char] = &['\u{2118}', '\u{212E}', '\u{309B}', '\u{309C}'];

/// Other_ID_Start members that are `Mn`: never a start, fine inside.
const OTHER_ID_START_MARKS: &[char] = &['\u{1885}', '\u{1886}'];

/// Other_ID_Continue minus ZWNJ/ZWJ, which are `Cf`.
const OTHER_ID_CONTINUE: &[(char, char)] = &[
    ('\u{00B7}', '\u{00B7}'),
    ('\u{0387}', '\u{0387}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{30FB}', '\u{30FB}'),
    ('\u{FF65}', '\u{FF65}'),
];

fn in_ranges(ranges: &[(char, char)], c: char) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

pub fn is_format_char(c: char) -> bool {
    in_ranges(FORMAT_CHARS, c)
}

fn is_compat_id_char(c: char) -> bool {
    OTHER_ID_START.contains(&c) || in_ranges(OTHER_ID_CONTINUE, c)
}

pub fn is_start_char(c: char) -> bool {
    c == '_'
        || (c.is_xid_start()
            && c.is_alphabetic()
            && !is_compat_id_char(c)
            && !OTHER_ID_START_MARKS.contains(&c))
}

pub fn is_continue_char(c: char) -> bool {
    is_start_char(c) || is_format_char(c) || (c.is_xid_continue() && !is_compat_id_char(c))
}

/// Turn an arbitrary string into a valid identifier. Never fails.
pub fn legalize(raw: &str) -> String {
    if raw.is_empty() {
        return legalize(PLACEHOLDER);
    }
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if is_start_char(first) => {
            let mut out = String::with_capacity(raw.len());
            out.push(first);
            out.extend(chars.map(|c| if is_continue_char(c) { c } else { '_' }));
            out
        }
        _ => legalize(&format!("_{raw}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWKWARD: &[&str] = &[
        "", " ", "_", "a", "1", "123abc", "$ref", "@type", "foo-bar", "foo bar",
        "a.b.c", "Ⅻ", "ünïcödé", "日本語", "e\u{301}", "x\u{200D}y", "\u{200D}",
        "\u{301}accent", "🙂", "tab\there", "quote\"d", "-", "--9", "ok_1",
    ];

    #[test]
    fn empty_becomes_placeholder() {
        assert_eq!(legalize(""), "Empty");
    }

    #[test]
    fn invalid_start_is_prefixed() {
        assert_eq!(legalize("1abc"), "_1abc");
        assert_eq!(legalize("$ref"), "__ref");
        assert_eq!(legalize("\u{301}x"), "_\u{301}x");
    }

    #[test]
    fn body_characters_are_replaced() {
        assert_eq!(legalize("foo-bar baz"), "foo_bar_baz");
        assert_eq!(legalize("Ⅻ_9"), "Ⅻ_9");
        assert_eq!(legalize("x\u{200D}y"), "x\u{200D}y");
        assert_eq!(legalize("a🙂b"), "a_b");
    }

    #[test]
    fn output_is_always_valid() {
        for raw in AWKWARD {
            let id = legalize(raw);
            let mut chars = id.chars();
            let first = chars.next().expect("non-empty");
            assert!(is_start_char(first), "{raw:?} -> {id:?}");
            assert!(chars.all(is_continue_char), "{raw:?} -> {id:?}");
        }
    }

    #[test]
    fn legalize_is_idempotent() {
        for raw in AWKWARD {
            let once = legalize(raw);
            assert_eq!(legalize(&once), once, "{raw:?}");
        }
    }

    /// General categories of characters where XID and the category rules
    /// could disagree, plus one or two plain members of each category.
    const CATEGORIES: &[(char, &str)] = &[
        ('\u{00B7}', "Po"), ('\u{0387}', "Po"), ('\u{30FB}', "Po"), ('\u{FF65}', "Po"),
        ('\u{1369}', "No"), ('\u{1371}', "No"), ('\u{19DA}', "No"), ('\u{00B2}', "No"), ('\u{00BD}', "No"),
        ('\u{2118}', "Sm"), ('\u{00D7}', "Sm"),
        ('\u{212E}', "So"), ('\u{00A9}', "So"),
        ('\u{309B}', "Sk"), ('\u{309C}', "Sk"), ('\u{00B4}', "Sk"),
        ('\u{1885}', "Mn"), ('\u{0301}', "Mn"), ('\u{064B}', "Mn"),
        ('\u{0903}', "Mc"),
        ('\u{0660}', "Nd"), ('\u{0966}', "Nd"), ('\u{FF10}', "Nd"),
        ('\u{203F}', "Pc"), ('\u{2040}', "Pc"),
        ('\u{200B}', "Cf"), ('\u{200D}', "Cf"), ('\u{FEFF}', "Cf"),
        ('\u{2160}', "Nl"), ('\u{3007}', "Nl"),
        ('\u{02B0}', "Lm"), ('\u{05D0}', "Lo"), ('\u{01C5}', "Lt"), ('A', "Lu"), ('z', "Ll"),
    ];

    fn category_starts(cat: &str) -> bool {
        cat.starts_with('L') || cat == "Nl"
    }

    fn category_continues(cat: &str) -> bool {
        category_starts(cat) || matches!(cat, "Nd" | "Pc" | "Mn" | "Mc" | "Cf")
    }

    #[test]
    fn follows_general_categories() {
        for &(c, cat) in CATEGORIES {
            let alone = legalize(&c.to_string());
            let first = alone.chars().next().unwrap();
            assert_eq!(first == c, category_starts(cat), "{c:?} ({cat}) at start -> {alone:?}");

            let inside = legalize(&format!("a{c}"));
            let kept = inside.chars().nth(1) == Some(c);
            assert_eq!(kept, category_continues(cat), "{c:?} ({cat}) inside -> {inside:?}");
        }
    }

    #[test]
    fn sweep_is_valid_and_idempotent() {
        let rejected: Vec<char> = CATEGORIES
            .iter()
            .filter(|(_, cat)| !category_continues(cat))
            .map(|&(c, _)| c)
            .collect();
        let swept = ('\u{0}'..='\u{3000}')
            .chain(CATEGORIES.iter().map(|&(c, _)| c))
            .chain(['\u{FF65}', '\u{1BCA0}', '\u{E0020}']);
        for c in swept {
            for raw in [c.to_string(), format!("a{c}"), format!("{c}{c}")] {
                let id = legalize(&raw);
                assert_eq!(legalize(&id), id, "{raw:?}");

                let mut chars = id.chars();
                let first = chars.next().unwrap();
                assert!(first == '_' || first.is_alphabetic(), "{raw:?} -> {id:?}");
                for k in id.chars() {
                    assert!(!rejected.contains(&k), "{raw:?} -> {id:?}");
                    assert!(
                        k == '_' || k.is_alphanumeric() || !(k.is_whitespace() || k.is_control() || k.is_ascii_punctuation()),
                        "{raw:?} -> {id:?}"
                    );
                }
            }
        }
    }
}
