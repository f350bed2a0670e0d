// ABOUTME: Library crate for DocKit panels exposing the panel session core and its collaborators

pub mod app;
pub mod config;
pub mod models;
pub mod registry;
pub mod session;
pub mod store;
