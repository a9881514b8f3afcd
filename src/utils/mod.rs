pub mod background;
pub mod logger;

pub use background::BackgroundTasks;
pub use logger::{ErrorLogger, LogErrorLogger};
