//! Ordering of apk version strings.
//!
//! A version has the shape `<segments>[_<tag>[<n>]]...[-r<revision>]`, for
//! example `1.2.3`, `2.0_rc1`, `1.1.22_git20190101-r3`. Parsing never fails:
//! strings outside the grammar still get a place in the order so that the
//! comparison stays total over arbitrary index contents.

use std::cmp::Ordering;
use std::fmt;

/// A parsed version string.
///
/// Equality and ordering follow the version semantics, not the text: `1.01`
/// and `1.1` compare equal, as do `1.0` and `1.0-r0`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
    tags: Vec<Tag>,
    revision: String,
}

/// One dot-separated component of the main sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    /// An empty component (`""`, or between two adjacent dots).
    Empty,
    /// A purely numeric zero (`0`, `00`).
    Zero,
    /// Placeholder for a segment the shorter side does not have.
    Absent,
    /// Leading digits (non-zero, or followed by text) plus trailing text.
    Numeric(Digits, String),
    /// No leading digit at all.
    Text(String),
}

/// Pre-release classes rank below [`TagKind::Release`], post-release above.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TagKind {
    Unknown(String),
    Alpha,
    Beta,
    Pre,
    Rc,
    /// No tag in this position.
    Release,
    Cvs,
    Svn,
    Git,
    Hg,
    P,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Tag {
    kind: TagKind,
    number: Digits,
    rest: String,
}

/// An arbitrarily long unsigned decimal, compared by value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(digits: &str) -> Self {
        Digits(digits.trim_start_matches('0').to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        // Leading zeros are stripped, so the longer string is the larger number.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split `s` into its leading ASCII digits and the remainder.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

impl Segment {
    fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Segment::Empty;
        }

        let (digits, rest) = split_digits(s);
        if digits.is_empty() {
            return Segment::Text(s.to_string());
        }

        let number = Digits::new(digits);
        if number.0.is_empty() && rest.is_empty() {
            Segment::Zero
        } else {
            Segment::Numeric(number, rest.to_string())
        }
    }
}

impl TagKind {
    fn parse(name: &str) -> Self {
        match name {
            "alpha" => TagKind::Alpha,
            "beta" => TagKind::Beta,
            "pre" => TagKind::Pre,
            "rc" => TagKind::Rc,
            "cvs" => TagKind::Cvs,
            "svn" => TagKind::Svn,
            "git" => TagKind::Git,
            "hg" => TagKind::Hg,
            "p" => TagKind::P,
            _ => TagKind::Unknown(name.to_string()),
        }
    }
}

impl Tag {
    const RELEASE: Tag = Tag {
        kind: TagKind::Release,
        number: Digits(String::new()),
        rest: String::new(),
    };

    fn parse(s: &str) -> Self {
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (name, tail) = s.split_at(split);
        let (digits, rest) = split_digits(tail);

        Tag {
            kind: TagKind::parse(name),
            number: Digits::new(digits),
            rest: rest.to_string(),
        }
    }
}

/// Strip a trailing `-r<digits>` and return `(version, revision digits)`.
fn split_revision(s: &str) -> (&str, &str) {
    if let Some(pos) = s.rfind("-r") {
        let digits = &s[pos + 2..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return (&s[..pos], digits);
        }
    }
    (s, "")
}

impl Version {
    pub fn parse(s: &str) -> Self {
        let (rest, revision) = split_revision(s);

        let mut parts = rest.split('_');
        let main = parts.next().unwrap_or_default();

        Version {
            raw: s.to_string(),
            segments: main.split('.').map(Segment::parse).collect(),
            tags: parts.map(Tag::parse).collect(),
            revision: revision.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Compare pairwise, padding the shorter side with `fill`.
fn cmp_padded<T: Ord>(a: &[T], b: &[T], fill: &T) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).unwrap_or(fill).cmp(b.get(i).unwrap_or(fill)))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_padded(&self.segments, &other.segments, &Segment::Absent)
            .then_with(|| cmp_padded(&self.tags, &other.tags, &Tag::RELEASE))
            .then_with(|| Digits::new(&self.revision).cmp(&Digits::new(&other.revision)))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}
