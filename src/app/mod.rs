pub mod feedback_repository;
