//! Name comparison that follows the zh-CN collation layout: symbols and
//! punctuation, then digits, then Latin letters (case-insensitive first),
//! then other alphabets, then CJK ideographs.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Symbol,
    Digit,
    Latin,
    OtherScript,
    Ideograph,
}

fn is_ideograph(c: char) -> bool {
    matches!(c as u32,
        0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xF900..=0xFAFF
        | 0x20000..=0x2FA1F)
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || (c.is_alphabetic() && (c as u32) <= 0x024F)
}

fn primary(c: char) -> (Class, u32) {
    if c.is_numeric() {
        return (Class::Digit, c.to_digit(10).unwrap_or(c as u32));
    }
    if is_ideograph(c) {
        return (Class::Ideograph, c as u32);
    }
    if is_latin(c) {
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (Class::Latin, folded as u32);
    }
    if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (Class::OtherScript, folded as u32);
    }
    (Class::Symbol, c as u32)
}

/// Compare two display names. Total order: ties at the primary level are
/// broken by case (lowercase first), then by raw code points.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary)
        .cmp(b.chars().map(primary))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Owned sort key wrapper so names can sit inside tuple keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey(pub String);

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        locale_compare(&self.0, &other.0)
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
