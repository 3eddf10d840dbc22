//! # apk-latest
//!
//! Find the latest version of Alpine packages across one or more
//! `APKINDEX.tar.gz` repository indexes.
//!
//! The [`index`] module holds the decoding and resolution pipeline and works
//! on any [`std::io::Read`]. The [`io`] module provides the local file and
//! HTTP sources used by the binary.
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! fn main() -> anyhow::Result<()> {
//!     let sources = [
//!         File::open("main/APKINDEX.tar.gz")?,
//!         File::open("community/APKINDEX.tar.gz")?,
//!     ];
//!     let resolution = apk_latest::resolve(sources, ["musl", "busybox"])?;
//!
//!     println!("{}", resolution.pins().join(" "));
//!     for name in resolution.missing() {
//!         eprintln!("missing: {name}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod index;
pub mod io;

pub use cli::Cli;
pub use index::{
    FieldError, IndexError, PackageEntry, Resolution, Resolver, Version, compare_versions, resolve,
};
pub use io::{FetchOptions, HttpIndexSource, IndexSource, LocalIndexSource, open_source};
