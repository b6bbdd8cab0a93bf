//! # Refdoc Model
//!
//! The navigable type graph produced for API reference documentation.
//!
//! ## Structure
//!
//! ```text
//! TypeRegistry (arena, owns every TypeNode)
//!     │
//!     ├──> identity index ("pkg.Foo", "*pkg.Foo", "[]pkg.Foo" → TypeId)
//!     │
//!     ├──> TypeNode
//!     │      ├─ kind (closed variant set, carries child TypeIds)
//!     │      ├─ fields (records only)
//!     │      └─ references (back-edges, TypeIds of containing types)
//!     │
//!     └──> ApiModel
//!            ├─ groups: GroupVersionDetails (sorted by group, version)
//!            └─ diagnostics collected while resolving
//! ```
//!
//! Cross-references are plain [`TypeId`] indices into the registry arena, so
//! cyclic type graphs never form ownership cycles.

mod diagnostics;
mod group_version;
mod kind;
mod markers;
mod registry;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use group_version::{ApiModel, GroupVersion, GroupVersionDetails, GroupVersionKind};
pub use kind::TypeKind;
pub use markers::{display_value, MarkerValues};
pub use registry::TypeRegistry;
pub use types::{EnumValue, Field, TypeId, TypeNode};
