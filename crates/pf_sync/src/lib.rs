pub mod cli;
pub mod files;
pub mod job;
pub mod logging;

pub use cli::{handle_command, SyncArgs, SyncCommands};
pub use job::{FileOutcome, PendingArticle, SyncJob, SyncReport};
pub use logging::init_logging;
