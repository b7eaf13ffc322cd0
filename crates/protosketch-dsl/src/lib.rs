//! # protosketch-dsl
//!
//! Translator from the sketch schema language to Protocol-Buffers-style
//! schema text.
//!
//! Sketch describes packages, messages, enums, and oneof groups with
//! whitespace indentation instead of braces. This crate provides:
//! - A character-driven scanner that turns source text into a lazy token
//!   stream, one token at a time
//! - A streaming translator that reconstructs nesting from indentation
//!   widths and emits schema text as it goes, with no intermediate tree
//! - A pure type-conversion rule (`[]T` to `repeated`, `map[K]V` to
//!   `map<,>`, bare types to `optional`)
//!
//! # Example
//!
//! ```
//! use protosketch_dsl::translate;
//!
//! let source = "package example\n\
//!               msg MyMessage\n\
//!               \x20\x20foo str 1\n\
//!               \x20\x20bar []int 3\n";
//!
//! let output = translate(source).expect("translation failed");
//! assert!(output.contains("message MyMessage {"));
//! assert!(output.contains("optional string foo = 1;"));
//! assert!(output.contains("repeated int bar = 3;"));
//! ```

pub mod convert;
pub mod error;
pub mod scanner;
pub mod token;
pub mod translate;

pub use convert::convert_type;
pub use error::{SketchError, Span};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
pub use translate::translate;
