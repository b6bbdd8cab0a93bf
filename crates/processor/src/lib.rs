//! # Refdoc Processor
//!
//! Turns resolved type facts into the cross-referenced type graph rendered as
//! API reference documentation.
//!
//! ## Pipeline
//!
//! ```text
//! TypeInfoProvider (packages, declarations, constants)
//!     │
//!     ├──> Discovery
//!     │      ├─ groupName / versionName package markers
//!     │      └─ exported declarations resolved at depth 0
//!     │
//!     ├──> Resolver (registry + reference graph + exclusion rules)
//!     │      ├─ named types pre-registered before expansion (cycle break)
//!     │      ├─ wrappers memoized by identity, maps detached
//!     │      ├─ record members collected at the record body's depth
//!     │      └─ anomalies degrade to Unknown / Unsupported + diagnostic
//!     │
//!     ├──> Inlining (bounded fixed point, dependency ordered)
//!     │
//!     ├──> Marker propagation (alias / pointer chains, then fields)
//!     │      └─ default + validation display strings
//!     │
//!     └──> Assembly
//!            ├─ back-references attached to nodes
//!            └─ GroupVersionDetails sorted by group, version
//! ```

mod compiled;
mod config;
mod docs;
mod error;
mod fields;
mod inline;
mod marker_registry;
mod markers;
mod processor;
mod references;
mod resolver;

pub use compiled::CompiledConfig;
pub use config::{
    CustomMarker, MarkerTarget, ProcessorConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INLINE_ITERATIONS,
};
pub use docs::{extract_doc, package_doc};
pub use error::{ProcessorError, Result};
pub use inline::{inline_types, InlineReport};
pub use marker_registry::{
    MarkerRegistry, DEFAULT_MARKER, GROUP_NAME_MARKER, OBJECT_ROOT_MARKER, VALIDATION_PREFIX,
    VERSION_NAME_MARKER,
};
pub use markers::{apply_markers, parse_markers, propagate_markers};
pub use processor::process;
pub use references::ReferenceGraph;
pub use resolver::Resolver;
