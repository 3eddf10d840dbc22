//! APKINDEX decoding and version resolution.
//!
//! This module turns index archives into "newest entry per requested name".
//! It is synchronous and transport agnostic: each source is any [`Read`]
//! producing the raw `APKINDEX.tar.gz` bytes.
//!
//! ## Pipeline
//!
//! Each source flows through lazy stages, none of which buffers the whole
//! index:
//!
//! 1. [`archive`]: gzip (possibly several concatenated members) then tar,
//!    yielding the `APKINDEX` member's bytes
//! 2. [`records`]: blank-line separated records
//! 3. [`entry`]: `K:V` lines mapped onto a [`PackageEntry`]
//! 4. [`resolver`]: entries folded per name, keeping the greatest
//!    [`Version`]
//!
//! Any decoding failure aborts the resolution; a requested name that no
//! source provides is reported through [`Resolution::missing`] instead.
//!
//! [`Read`]: std::io::Read

pub mod archive;
mod entry;
mod error;
pub mod records;
mod resolver;
mod version;

pub use archive::INDEX_MEMBER;
pub use entry::PackageEntry;
pub use error::{FieldError, IndexError};
pub use records::Records;
pub use resolver::{Resolution, Resolver, ScanStats, resolve};
pub use version::{Version, compare_versions};
