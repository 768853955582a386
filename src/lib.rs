pub mod api_docs;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod entities;
pub mod extractor;
pub mod grading;
pub mod middleware;
pub mod reporting;
pub mod repositories;
pub mod routes;
pub mod static_service;
pub mod utils;
