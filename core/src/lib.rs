//! Random Connector: after every completed generation, switch the host to a
//! randomly chosen connection profile from a user-selected pool.

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod extension;
pub mod host;
pub mod notify;
pub mod panel;
pub mod persistence;
pub mod rng;
pub mod selector;
pub mod settings;
pub mod store;
pub mod types;
