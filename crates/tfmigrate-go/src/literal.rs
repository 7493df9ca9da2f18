//! Go literal decoding.

/// Decode an interpreted (`"..."`) or raw (`` `...` ``) string literal.
///
/// Returns `None` for malformed escapes or if the decoded bytes are not UTF-8.
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        // carriage returns are discarded from raw strings
        return Some(raw.replace('\r', ""));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => {
                out.push(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?);
                continue;
            }
            'u' => char::from_u32(u32::from_str_radix(&take(&mut chars, 4)?, 16).ok()?)?,
            'U' => char::from_u32(u32::from_str_radix(&take(&mut chars, 8)?, 16).ok()?)?,
            d @ '0'..='7' => {
                let rest = take(&mut chars, 2)?;
                let value = u32::from_str_radix(&format!("{d}{rest}"), 8).ok()?;
                out.push(u8::try_from(value).ok()?);
                continue;
            }
            _ => return None,
        };
        out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
    }

    String::from_utf8(out).ok()
}

fn take(chars: &mut std::str::Chars, n: usize) -> Option<String> {
    let taken: String = chars.by_ref().take(n).collect();
    (taken.chars().count() == n).then_some(taken)
}

/// Parse a Go integer literal: decimal, `0x`, `0o`, `0b`, legacy leading-zero
/// octal, with optional `_` separators.
pub fn parse_int(literal: &str) -> Option<i64> {
    let clean: String = literal.chars().filter(|c| *c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    if digits.is_empty() {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}
