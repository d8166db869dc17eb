#![forbid(unsafe_code)]

pub mod csv_store;
pub mod repository;

pub use csv_store::{CsvRepository, OutputEncoding};
pub use repository::{
    InMemoryRepository, QuestionRepository, QuestionRow, ResultsRepository, Storage, StorageError,
};
