pub mod answer_repository;
pub mod connection;
pub mod photo_repository;
pub mod profile_repository;
pub mod summary_repository;

#[cfg(test)]
pub mod test_utils;

pub use answer_repository::AnswerRepository;
pub use connection::JsonConnection;
pub use photo_repository::PhotoRepository;
pub use profile_repository::ProfileRepository;
pub use summary_repository::SummaryRepository;
