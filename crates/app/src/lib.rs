//! Platter application services, device storage and external adapters.

pub mod auth;
pub mod config;
pub mod context;
pub mod domain;
pub mod notifications;
pub mod observability;
pub mod storage;

#[cfg(test)]
mod test;
