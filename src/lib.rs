pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod models;
pub mod scheduler;
pub mod web;
