//! # Salt2Type Model
//!
//! The class-oriented source model recovered from a Script# generated dump and its
//! Doxygen documentation export.
//!
//! ## Architecture
//!
//! ```text
//! ClassRegistry (arena)
//!     │
//!     ├──> ClassDefinition[]            (discovery order)
//!     │      ├─ MethodDefinition[]      (overloads share a name)
//!     │      │    └─ PropertyDefinition[] (positional parameters)
//!     │      ├─ PropertyDefinition[]
//!     │      └─ links / base_class / interfaces (soft identifiers)
//!     │
//!     └──> Secondary indexes
//!            ├─ qualified name  ("Ns.Sub.Class")
//!            ├─ variable id     ("$Ns_Sub_Class")
//!            └─ documentation id ("class_ns_1_1_sub_1_1_class")
//! ```
//!
//! Relations between classes are never object references. They are identifier strings
//! that [`ClassRegistry::resolve_link`] resolves on demand, so a link may be recorded
//! before the class it names has been discovered.

mod error;
mod registry;
mod types;

pub use error::{RegistryError, Result};
pub use registry::{ClassId, ClassRegistry};
pub use types::{
    split_qualified, ClassDefinition, ClassKind, MethodDefinition, PropertyDefinition,
    Protection, INDEXER_PREFIX,
};
