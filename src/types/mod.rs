//! Argument types and their resolution
//!
//! - [`argument`]: the resolved [`ArgumentType`] descriptors
//! - [`registry`]: the [`ArgumentTypeParser`] trait and the ordered
//!   [`ArgumentTypeRegistry`]
//! - [`builtin`]: primitive types in the `builtin` namespace
//! - [`passthrough`]: verbatim resolver for caller-defined namespaces

pub mod argument;
pub mod builtin;
pub mod passthrough;
pub mod registry;

pub use argument::{ArgumentType, Bounds, CustomType, StringKind, BUILTIN_NAMESPACE};
pub use builtin::BuiltinArgumentTypeParser;
pub use passthrough::PassthroughArgumentTypeParser;
pub use registry::{ArgumentTypeParser, ArgumentTypeRegistry};
