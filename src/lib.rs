//! Lookup of KCD-8 (Korean Standard Classification of Diseases) codes.
//!
//! The disease code master is a CP949-encoded CSV file. [Catalog] reads it once, on first
//! use, and answers substring lookups on Korean names and prefix lookups on codes.
//!
//! ```no_run
//! use kcd::{Catalog, DatasetSource};
//!
//! let catalog = Catalog::new(DatasetSource::new("local_data/kcd.csv"));
//! for result in catalog.search("척추관협착증", None)? {
//!     println!("{} - {}", result.code, result.name_ko);
//! }
//! # Ok::<(), kcd::CatalogError>(())
//! ```

pub mod error;
pub mod export;
pub mod files;
pub mod search;
pub mod server;

pub use error::{CatalogError, MalformedDataset};
pub use files::{DatasetSchema, DatasetSource, DiseaseCode};
pub use search::{Catalog, SearchResult};
