//! Domain layer: variables, the layered environment, templates, and
//! the rules that govern them. No I/O happens here, everything that
//! touches a terminal, the filesystem, or a subprocess goes through
//! the ports in [`crate::application::ports`].

pub mod environment;
pub mod error;
pub mod sanitize;
pub mod template;
pub mod variables;

pub use environment::Environment;
pub use error::{DomainError, ErrorCategory};
pub use template::{ConfigNode, Sanitizer, StringTemplate, TemplateDict, TemplateList};
pub use variables::{Stage, VarKind, Variable, VariableSet};
