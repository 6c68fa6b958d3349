pub mod comment;
pub mod date;
pub mod error;
pub mod guard;
pub mod like;
pub mod masking;
pub mod models;
pub mod reply;
pub mod repository;
pub mod routes;
pub mod thread;
