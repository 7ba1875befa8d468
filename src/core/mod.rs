pub mod command;
pub mod discovery;
pub mod error;
pub mod pattern;
pub mod selection;

pub use command::{
    build_args, preview, shell_quote, CommandContext, FlagSet, OutputStyle, RunRequest,
    DEFAULT_OUTPUT_NAME, DEFAULT_OUTPUT_STEM, PROGRAM,
};
pub use discovery::discover_files;
pub use error::CoreError;
pub use pattern::{matches_any, normalize_pattern};
pub use selection::{SelectionModel, DEFAULT_IGNORED_NAMES};
