use std::io::{BufReader, Read};

use indexmap::IndexMap;
use tracing::{debug, info};

use super::archive::{INDEX_MEMBER, with_member};
use super::entry::PackageEntry;
use super::error::IndexError;
use super::records::Records;
use super::version::Version;

/// Folds index entries into the newest entry per requested name.
///
/// A resolver is built for one request, fed one source at a time with
/// [`scan`](Self::scan) and consumed by [`finish`](Self::finish).
#[derive(Debug)]
pub struct Resolver {
    best: IndexMap<String, Option<Best>>,
}

/// Stored entry together with its parsed version.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Best {
    version: Version,
    entry: PackageEntry,
}

/// Outcome of a resolution: the newest entry per requested name, in request
/// order, with unmatched names kept as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    best: IndexMap<String, Option<Best>>,
}

/// Counters for one scanned source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub records: usize,
    pub matched: usize,
    pub replaced: usize,
}

impl Resolver {
    /// Create a resolver for `names`. Duplicates are collapsed.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            best: names.into_iter().map(|n| (n.into(), None)).collect(),
        }
    }

    /// Offer one entry. Returns `true` if it became the best entry for its
    /// name.
    ///
    /// Entries for names that were not requested are dropped. A stored entry
    /// is only replaced by a strictly newer version.
    pub fn offer(&mut self, entry: PackageEntry) -> bool {
        let Some(slot) = entry.name().and_then(|name| self.best.get_mut(name)) else {
            return false;
        };

        let version = entry.parsed_version();
        if let Some(current) = slot.as_ref() {
            if version <= current.version {
                return false;
            }
            debug!(
                name = entry.name().unwrap_or_default(),
                from = %current.version,
                to = %version,
                "newer version found"
            );
        }

        *slot = Some(Best { version, entry });
        true
    }

    /// Decode one index archive and fold all of its entries.
    ///
    /// The reader is consumed and dropped before returning, on success and on
    /// error alike. On error the resolver must be discarded: entries already
    /// folded from this source are not rolled back.
    pub fn scan<R: Read>(&mut self, reader: R) -> Result<ScanStats, IndexError> {
        with_member(reader, INDEX_MEMBER, |member| {
            let mut stats = ScanStats::default();

            for (i, record) in Records::new(BufReader::new(member)).enumerate() {
                let record = record?;
                let entry = PackageEntry::from_record(&record).map_err(|source| {
                    IndexError::Field {
                        record: i + 1,
                        source,
                    }
                })?;

                stats.records += 1;
                let wanted = entry
                    .name()
                    .is_some_and(|name| self.best.contains_key(name));
                if wanted {
                    stats.matched += 1;
                    if self.offer(entry) {
                        stats.replaced += 1;
                    }
                }
            }

            Ok(stats)
        })
    }

    pub fn finish(self) -> Resolution {
        Resolution { best: self.best }
    }
}

impl Resolution {
    /// Best entry for `name`, if it was requested and found.
    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.best(name).map(|best| &best.entry)
    }

    /// Parsed version of the best entry for `name`.
    pub fn version(&self, name: &str) -> Option<&Version> {
        self.best(name).map(|best| &best.version)
    }

    fn best(&self, name: &str) -> Option<&Best> {
        self.best.get(name).and_then(Option::as_ref)
    }

    /// Found entries in request order.
    pub fn resolved(&self) -> impl Iterator<Item = &PackageEntry> {
        self.best.values().flatten().map(|best| &best.entry)
    }

    /// Requested names that no source provided, in request order.
    pub fn missing(&self) -> Vec<&str> {
        self.best
            .iter()
            .filter(|(_, entry)| entry.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.best.values().all(Option::is_some)
    }

    /// `name==version` pins of all found entries, in request order.
    pub fn pins(&self) -> Vec<String> {
        self.resolved().map(ToString::to_string).collect()
    }
}

/// Resolve `names` against `sources`, scanned in order.
///
/// Every source is scanned even when all names are already matched, since a
/// later source may carry a newer version. The first failing source aborts
/// the whole resolution.
pub fn resolve<I, R, N, S>(sources: I, names: N) -> Result<Resolution, IndexError>
where
    I: IntoIterator<Item = R>,
    R: Read,
    N: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut resolver = Resolver::new(names);

    for (i, source) in sources.into_iter().enumerate() {
        let stats = resolver.scan(source)?;
        info!(
            source = i,
            records = stats.records,
            matched = stats.matched,
            replaced = stats.replaced,
            "scanned index"
        );
    }

    Ok(resolver.finish())
}
