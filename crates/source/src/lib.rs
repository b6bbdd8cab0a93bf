//! # Refdoc Source
//!
//! Already-resolved type facts, one package at a time, as produced by an
//! external type information provider (compiler front-end, language server,
//! source indexer).
//!
//! ## Pipeline
//!
//! ```text
//! <source-path>/*.json  (one Package per file)
//!     │
//!     ├──> SourceSet::load_dir (walkdir + serde_json)
//!     │      └─> packages ordered by path
//!     │
//!     └──> TypeInfoProvider
//!            ├─ packages()
//!            ├─ package(path)
//!            └─ lookup_type(package, name)
//! ```

mod error;
mod facts;
mod provider;
mod raw;
mod tag;

pub use error::{Result, SourceError};
pub use facts::{ConstDecl, ConstExpr, Member, Package, TypeDecl};
pub use provider::{SourceSet, TypeInfoProvider};
pub use raw::RawType;
pub use tag::lookup_tag;
