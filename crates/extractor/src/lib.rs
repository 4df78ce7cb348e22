//! # Salt2Type Extractor
//!
//! Recovers a typed class model from the JavaScript a Script# compiler emits, and fuses it
//! with the Doxygen XML export of the original C# sources.
//!
//! ## Philosophy
//!
//! The generated dump has no grammar of its own; it is one generator's fixed output. The
//! extractor is therefore a recognizer, not a parser:
//! - Every line fits one known shape or the run fails with that line
//! - Multi-line constructs are bounded by a forward scan for their terminator
//! - Documentation can only add types and descriptions, never structure
//!
//! ## Architecture
//!
//! ```text
//! dump.js ──> StructuralExtractor ──> ClassRegistry (+ globals, assembly)
//!                                          │
//! docs.xml ─> extract_docs ──> ClassRegistry
//!                                          │
//!                                   reconcile (resolver + vocabulary)
//!                                          │
//!                                          └──> ReconciledModel (JSON)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use salt2type_extractor::{ExtractorConfig, Pipeline};
//!
//! let dump = "\t// Ns.Widget\n\tvar $Ns_Widget = function() {\n\t};\n";
//! let model = Pipeline::new(ExtractorConfig::default()).run(dump, None).unwrap();
//!
//! assert_eq!(model.classes.len(), 1);
//! ```

mod config;
mod docs;
mod error;
mod pipeline;
mod reconcile;
mod resolver;
mod structural;
mod text;
mod vocabulary;

pub use config::{ExtractorConfig, IgnoreList};
pub use docs::extract_docs;
pub use error::{ExtractError, Result};
pub use pipeline::{Pipeline, ReconciledModel};
pub use reconcile::{reconcile, ReconcileStats};
pub use resolver::{
    find_method, find_method_index, find_property, lower_first, mangled, method_name_matches,
    property_matches, to_structural_name, CONSTRUCTOR_PREFIX, MANGLE_MARKER,
};
pub use structural::{
    classify, parse_params, ClassTrailer, InitializerLine, LineShape, Scope, StructuralExtractor,
    StructuralModel,
};
pub use text::{clean_line, find_terminator, to_body, LineCleaner};
pub use vocabulary::{normalize_type, rewrite_generic_calls, ABSENT_SUFFIX};
