pub mod aggregator;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod measurements;
pub mod models;
pub mod repository;
pub mod service;
