mod repository;
mod schema;

pub use repository::{exists, insert, save, CycleReport, Repository, DEFAULT_LIST_LIMIT};

#[cfg(test)]
pub(crate) use repository::tests as fixtures;
