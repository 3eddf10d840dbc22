//! Package entries and the `K:V` field mapper.
//!
//! See <https://wiki.alpinelinux.org/wiki/Apk_spec> for the field letters.

use std::fmt;

use super::error::FieldError;
use super::version::Version;

/// One decoded index record.
///
/// Every attribute is optional: a record only sets the fields whose keys it
/// contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageEntry {
    pub architecture: Option<String>,
    pub pull_checksum: Option<String>,
    pub pull_dependencies: Option<String>,
    pub package_installed_size: Option<u64>,
    pub license: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub size: Option<u64>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub git_commit: Option<String>,
    pub maintainer: Option<String>,
    pub origin: Option<String>,
    pub provider_priority: Option<String>,
    pub provides: Option<String>,
    pub build_timestamp: Option<i64>,
    pub install_if: Option<String>,
    pub replaces: Option<String>,
    pub replaces_priority: Option<u32>,
}

/// Setter for one attribute of a [`PackageEntry`].
#[derive(Clone, Copy)]
enum Field {
    Text(fn(&mut PackageEntry) -> &mut Option<String>),
    U64(fn(&mut PackageEntry) -> &mut Option<u64>),
    U32(fn(&mut PackageEntry) -> &mut Option<u32>),
    I64(fn(&mut PackageEntry) -> &mut Option<i64>),
}

/// Key letter to attribute table.
fn field(key: u8) -> Option<Field> {
    use Field::*;

    let field = match key {
        b'A' => Text(|e| &mut e.architecture),
        b'C' => Text(|e| &mut e.pull_checksum),
        b'D' => Text(|e| &mut e.pull_dependencies),
        b'I' => U64(|e| &mut e.package_installed_size),
        b'L' => Text(|e| &mut e.license),
        b'P' => Text(|e| &mut e.name),
        b'V' => Text(|e| &mut e.version),
        b'S' => U64(|e| &mut e.size),
        b'T' => Text(|e| &mut e.description),
        b'U' => Text(|e| &mut e.url),
        b'c' => Text(|e| &mut e.git_commit),
        b'm' => Text(|e| &mut e.maintainer),
        b'o' => Text(|e| &mut e.origin),
        b'k' => Text(|e| &mut e.provider_priority),
        b'p' => Text(|e| &mut e.provides),
        b't' => I64(|e| &mut e.build_timestamp),
        b'i' => Text(|e| &mut e.install_if),
        b'r' => Text(|e| &mut e.replaces),
        b'q' => U32(|e| &mut e.replaces_priority),
        _ => return None,
    };

    Some(field)
}

/// Parse a base-10 integer into the attribute's width.
fn parse_int<T>(key: char, value: &str) -> Result<T, FieldError>
where
    T: TryFrom<i128>,
{
    use std::num::IntErrorKind;

    let overflow = || FieldError::Overflow {
        key,
        value: value.to_string(),
    };

    let wide: i128 = value.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(),
        _ => FieldError::InvalidInteger {
            key,
            value: value.to_string(),
        },
    })?;

    T::try_from(wide).map_err(|_| overflow())
}

impl Field {
    fn apply(self, entry: &mut PackageEntry, key: char, value: &str) -> Result<(), FieldError> {
        match self {
            Field::Text(slot) => *slot(entry) = Some(value.to_string()),
            Field::U64(slot) => *slot(entry) = Some(parse_int(key, value)?),
            Field::U32(slot) => *slot(entry) = Some(parse_int(key, value)?),
            Field::I64(slot) => *slot(entry) = Some(parse_int(key, value)?),
        }
        Ok(())
    }
}

impl PackageEntry {
    /// Build an entry from one raw record.
    ///
    /// Lines are `K:V` with a single-byte key. The last line may lack its
    /// newline. Any bad line fails the whole record.
    pub fn from_record(record: &[u8]) -> Result<Self, FieldError> {
        let mut entry = PackageEntry::default();

        for line in record.split(|&b| b == b'\n') {
            if line.is_empty() {
                // Only the trailing newline of an unterminated tail produces
                // an empty segment here; blank lines never reach the mapper.
                continue;
            }

            if line.len() < 2 || line[1] != b':' {
                return Err(FieldError::MalformedLine {
                    line: String::from_utf8_lossy(line).into_owned(),
                });
            }

            let key = char::from(line[0]);
            let setter = field(line[0]).ok_or(FieldError::UnknownKey { key })?;
            let value =
                std::str::from_utf8(&line[2..]).map_err(|_| FieldError::InvalidText { key })?;

            setter.apply(&mut entry, key, value)?;
        }

        Ok(entry)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parsed version; a record without `V:` orders as the empty version.
    pub fn parsed_version(&self) -> Version {
        Version::parse(self.version.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for PackageEntry {
    /// Formats as a `name==version` pin.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}=={}",
            self.name.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MUSL: &[u8] = b"C:Q1G5N9ZpGx0JCz2QnqlnvHT+1x1gg=\n\
P:musl\n\
V:1.1.22-r3\n\
A:x86_64\n\
S:368552\n\
I:614400\n\
T:the musl c library (libc) implementation\n\
U:http://www.musl-libc.org/\n\
L:MIT\n\
o:musl\n\
m:Timo Teras <timo.teras@iki.fi>\n\
t:1565166385\n\
c:d4d6eb0b8c8ff5dd0ae8c0d17a3e3ad1d3e41c9d\n\
p:so:libc.musl-x86_64.so.1=1";

    #[test]
    fn maps_every_field_of_a_real_record() {
        let entry = PackageEntry::from_record(MUSL).unwrap();

        assert_eq!(entry.name(), Some("musl"));
        assert_eq!(entry.version.as_deref(), Some("1.1.22-r3"));
        assert_eq!(entry.architecture.as_deref(), Some("x86_64"));
        assert_eq!(entry.size, Some(368552));
        assert_eq!(entry.package_installed_size, Some(614400));
        assert_eq!(entry.build_timestamp, Some(1565166385));
        assert_eq!(entry.license.as_deref(), Some("MIT"));
        assert_eq!(
            entry.maintainer.as_deref(),
            Some("Timo Teras <timo.teras@iki.fi>")
        );
        assert_eq!(entry.provides.as_deref(), Some("so:libc.musl-x86_64.so.1=1"));
        assert_eq!(entry.to_string(), "musl==1.1.22-r3");
    }

    #[test]
    fn value_keeps_colons_and_spaces_verbatim() {
        let entry = PackageEntry::from_record(b"D:so:libc.musl-x86_64.so.1 /bin/sh\n").unwrap();
        assert_eq!(
            entry.pull_dependencies.as_deref(),
            Some("so:libc.musl-x86_64.so.1 /bin/sh")
        );
    }

    #[test]
    fn empty_record_is_an_empty_entry() {
        assert_eq!(
            PackageEntry::from_record(b"").unwrap(),
            PackageEntry::default()
        );
    }

    #[test]
    fn later_line_overrides_earlier() {
        let entry = PackageEntry::from_record(b"V:1.0\nV:2.0").unwrap();
        assert_eq!(entry.version.as_deref(), Some("2.0"));
    }

    #[rstest]
    #[case(b"P:musl\nZ:zzz\nV:1.0", FieldError::UnknownKey { key: 'Z' })]
    #[case(b"P:musl\nx:1", FieldError::UnknownKey { key: 'x' })]
    #[case(b"P:musl\nVV:1.0", FieldError::MalformedLine { line: "VV:1.0".into() })]
    #[case(b"P", FieldError::MalformedLine { line: "P".into() })]
    #[case(b"S:12a", FieldError::InvalidInteger { key: 'S', value: "12a".into() })]
    #[case(b"S:", FieldError::InvalidInteger { key: 'S', value: "".into() })]
    #[case(b"S:-1", FieldError::Overflow { key: 'S', value: "-1".into() })]
    #[case(b"q:4294967296", FieldError::Overflow { key: 'q', value: "4294967296".into() })]
    #[case(b"t:9223372036854775808", FieldError::Overflow { key: 't', value: "9223372036854775808".into() })]
    #[case(
        b"S:999999999999999999999999999999999999999999",
        FieldError::Overflow { key: 'S', value: "999999999999999999999999999999999999999999".into() }
    )]
    #[case(b"T:\xff\xfe", FieldError::InvalidText { key: 'T' })]
    fn bad_lines_fail_the_whole_record(#[case] record: &[u8], #[case] expected: FieldError) {
        assert_eq!(PackageEntry::from_record(record), Err(expected));
    }

    #[test]
    fn signed_timestamp_accepts_negative() {
        let entry = PackageEntry::from_record(b"t:-5").unwrap();
        assert_eq!(entry.build_timestamp, Some(-5));
    }

    #[test]
    fn supplementary_keys_are_known() {
        let entry =
            PackageEntry::from_record(b"P:a\ni:b c\nr:d\nq:100\nk:10").unwrap();
        assert_eq!(entry.install_if.as_deref(), Some("b c"));
        assert_eq!(entry.replaces.as_deref(), Some("d"));
        assert_eq!(entry.replaces_priority, Some(100));
        assert_eq!(entry.provider_priority.as_deref(), Some("10"));
    }
}
