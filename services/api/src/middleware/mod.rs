pub mod logging;

pub use logging::create_logger;
