//! Go string literal quoting, matching `strconv.Quote` (`%q`).

use std::fmt::Write;

/// Quote `s` as an interpreted Go string literal.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                write!(out, "\\x{:02x}", c as u32).unwrap();
            }
            c if !is_printable(c) => {
                if (c as u32) < 0x10000 {
                    write!(out, "\\u{:04x}", c as u32).unwrap();
                } else {
                    write!(out, "\\U{:08x}", c as u32).unwrap();
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Approximates `unicode.IsPrint`: controls, non-ASCII spaces and common
/// format characters are escaped.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{00ad}'
            | '\u{061c}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_escapes() {
        assert_eq!(go_quote("hello"), r#""hello""#);
        assert_eq!(go_quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(go_quote("C:\\dir"), r#""C:\\dir""#);
        assert_eq!(go_quote("a\tb"), r#""a\tb""#);
    }

    #[test]
    fn test_control_and_unicode() {
        assert_eq!(go_quote("\x1b[0m"), r#""\x1b[0m""#);
        assert_eq!(go_quote("café ✓"), "\"café ✓\"");
        assert_eq!(go_quote("a\u{00a0}b"), r#""a\u00a0b""#);
        assert_eq!(go_quote("\u{feff}"), r#""\ufeff""#);
    }
}
