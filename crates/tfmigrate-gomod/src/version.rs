//! Module versions and their precedence.

use std::cmp::Ordering;
use std::fmt;

/// A `vMAJOR[.MINOR[.PATCH]][-pre][+build]` module version.
///
/// `v1` and `v1.2` are shorthands for `v1.0.0` and `v1.2.0`. Build metadata
/// does not take part in comparison.
#[derive(Debug, Clone)]
pub struct GoVersion {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<String>,
    original: String,
}

impl GoVersion {
    pub fn parse(version: &str) -> Option<Self> {
        let rest = version.strip_prefix('v')?;
        let (rest, _build) = match rest.split_once('+') {
            Some((core, build)) if !build.is_empty() => (core, Some(build)),
            Some(_) => return None,
            None => (rest, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut numbers = core.split('.');
        let major = number(numbers.next()?)?;
        let minor = numbers.next().map(number).unwrap_or(Some(0))?;
        let patch = numbers.next().map(number).unwrap_or(Some(0))?;
        if numbers.next().is_some() {
            return None;
        }

        let pre = match pre {
            Some(pre) => {
                let parts: Vec<String> = pre.split('.').map(str::to_string).collect();
                if parts.iter().any(|p| p.is_empty() || !p.chars().all(is_ident_char)) {
                    return None;
                }
                parts
            }
            None => Vec::new(),
        };

        Some(Self {
            major,
            minor,
            patch,
            pre,
            original: version.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

fn number(s: &str) -> Option<u64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // no leading zeros
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn compare_pre(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    for (x, y) in a.iter().zip(b) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

impl Ord for GoVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| compare_pre(&self.pre, &other.pre))
    }
}

impl PartialOrd for GoVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GoVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GoVersion {}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
