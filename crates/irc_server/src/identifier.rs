//! Validity predicates and equality rules for the two identifier kinds the
//! protocol cares about: nicknames and channel names.
//!
//! <nick> ::= <letter> { <letter> | <number> | <special> }
//! <channel> ::= ( '#' | '&' ) <chstring>

use nom::{
    IResult, Parser,
    bytes::complete::take_while,
    character::complete::satisfy,
    combinator::{recognize, verify},
    sequence::pair,
};

/// Maximum nickname length per RFC 1459 (9 octets).
pub const MAX_NICKNAME: usize = 9;
/// Maximum channel name length accepted by this server.
pub const MAX_CHANNAME: usize = 50;

fn is_special(c: char) -> bool {
    "-[]\\`^{}".contains(c)
}

fn is_nick_first(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_nick_tail(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special(c)
}

fn nickname_parser(input: &str) -> IResult<&str, &str> {
    let parser = recognize(pair(satisfy(is_nick_first), take_while(is_nick_tail)));
    verify(parser, |s: &str| s.len() <= MAX_NICKNAME).parse(input)
}

/// Returns true iff `nick` is a structurally valid nickname: non-empty,
/// starting with a letter, the rest letters/digits/specials, length <= 9.
pub fn is_valid_nickname(nick: &str) -> bool {
    if nick.is_empty() {
        return false;
    }
    matches!(nickname_parser(nick), Ok((rest, matched)) if rest.is_empty() && matched.len() == nick.len())
}

fn is_chan_char(c: char) -> bool {
    !matches!(c, ' ' | '\0' | '\u{07}' | '\r' | '\n' | ',')
}

fn channel_parser(input: &str) -> IResult<&str, &str> {
    let prefix = satisfy(|c| c == '#' || c == '&');
    let parser = recognize(pair(prefix, take_while(is_chan_char)));
    verify(parser, |s: &str| s.len() <= MAX_CHANNAME).parse(input)
}

/// Returns true iff `name` is a structurally valid channel name: length
/// 1..=50, first byte `#` or `&`, no space/NUL/BEL/CR/LF/comma thereafter.
pub fn is_valid_channel(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    matches!(channel_parser(name), Ok((rest, matched)) if rest.is_empty() && matched.len() == name.len())
}

/// Folds a single character under the "Scandinavian" nickname equality rule:
/// `{`<->`[`, `}`<->`]`, `|`<->`\`. Ordinary ASCII case is left untouched.
fn fold_char(c: char) -> char {
    match c {
        '{' => '[',
        '}' => ']',
        '|' => '\\',
        other => other,
    }
}

/// Two nicknames collide iff they have the same length and each character
/// pair is equal once folded. This is NOT a case-insensitive comparison.
pub fn nicknames_collide(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| fold_char(x) == fold_char(y))
}

/// Truncates a possibly-oversized, untrusted identifier to a safe length for
/// echoing back in an error reply. Operates on char boundaries.
pub fn safe_truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nicknames() {
        for n in ["a", "a1", "abc123", "Z9", "x-y", "t[est]", "g{ood}", "h\\i", "j`k", "m^n"] {
            assert!(is_valid_nickname(n), "should be valid: {n}");
        }
    }

    #[test]
    fn invalid_nicknames() {
        for n in ["", "1abc", "123456789a", "abc def"] {
            assert!(!is_valid_nickname(n), "should be invalid: {n}");
        }
    }

    #[test]
    fn first_character_must_be_a_letter_not_a_special() {
        for n in ["[abc", "-admin", "{x}", "|pipe", "^hat", "`tick"] {
            assert!(!is_valid_nickname(n), "should be invalid: {n}");
        }
    }

    #[test]
    fn nickname_length_boundary() {
        assert!(is_valid_nickname("123456789".chars().map(|_| 'a').take(9).collect::<String>().as_str()));
        assert!(!is_valid_nickname(&"a".repeat(10)));
    }

    #[test]
    fn valid_channels() {
        for c in ["#general", "&local", "#a", "#general-chat"] {
            assert!(is_valid_channel(c), "should be valid: {c}");
        }
    }

    #[test]
    fn invalid_channels() {
        for c in ["", "general", "#with space", "#with,comma", "#with\rcr"] {
            assert!(!is_valid_channel(c), "should be invalid: {c}");
        }
    }

    #[test]
    fn folded_collision() {
        assert!(nicknames_collide("foo{bar", "foo[bar"));
        assert!(nicknames_collide("a}b|c", "a]b\\c"));
        assert!(!nicknames_collide("Bob", "bob"));
        assert!(!nicknames_collide("short", "shorter"));
    }

    #[test]
    fn ascii_case_is_not_folded() {
        assert!(!nicknames_collide("Alice", "alice"));
    }

    #[test]
    fn truncate_is_char_boundary_safe() {
        assert_eq!(safe_truncate("hello world", 5), "hello");
        assert_eq!(safe_truncate("hi", 5), "hi");
    }
}
