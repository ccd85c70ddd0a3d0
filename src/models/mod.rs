mod entry;

pub use entry::{Entry, SaveOutcome, Source};
