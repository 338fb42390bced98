pub mod config;
pub mod error;
pub mod generator;
pub mod record;

pub use config::{EmitterConfig, Vocabulary};
pub use error::LoggenError;
pub use generator::{Clock, DefaultSource, RandomSource, RngSource, SystemClock, generate_record};
pub use record::LogRecord;
