// src/lib.rs
pub mod app;
pub mod backend;
pub mod banner;
pub mod catalog;
pub mod config;
pub mod download;
pub mod errors;
pub mod exam;
pub mod models;
pub mod session;
pub mod upload;
