//! Layered configuration system.
//!
//! Resolves the effective configuration from three tiers, lowest to highest:
//! 1. **Defaults** - The built-in [`DefaultTable`]
//! 2. **File** - `config.yml` beside the executable, or the file named by `--config`
//! 3. **Command line** - Flags given for this invocation
//!
//! ## File layout
//! ```yaml
//! spotify-downloader:
//!   avconv: false
//!   folder: /opt/spotify-downloader/Music
//!   input-ext: .m4a
//!   log-level: INFO
//!   # ...
//! ```
//!
//! A missing file is created from the defaults on first use; an existing file
//! is never rewritten.

mod defaults;
mod files;
mod loader;
mod merge;
mod template;
mod types;

pub use defaults::DefaultTable;
pub use files::{load_or_create, parse_document, write_default_document};
pub use loader::{CONFIG_FILE_NAME, Resolver};
pub use merge::{ConfigMap, merge, merge_all};
pub use template::{FILE_FORMAT_TAGS, placeholders, unknown_placeholders};
pub use types::*;
