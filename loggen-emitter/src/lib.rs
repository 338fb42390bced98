pub mod scheduler;
pub mod serializer;
pub mod writer;

pub use scheduler::{Emitter, IntervalTicker, Ticker};
pub use serializer::to_line;
pub use writer::AppendWriter;
