use std::path::PathBuf;

use clap::Parser;

/// Translate sketch schema files into Protocol-Buffers-style schema text.
///
/// Sketch expresses packages, messages, enums, and oneof groups with
/// whitespace indentation instead of braces. The translated schema is
/// written to standard output.
#[derive(Parser)]
#[command(
    name = "protosketch",
    version,
    about = "Translate sketch schema files into Protocol-Buffers-style schema text"
)]
pub struct Cli {
    /// Path to the sketch file to translate
    pub input: PathBuf,
}
