//! Illumio PCE (policy controller) interaction.
//!
//! - [`controller`] - the [`PolicyController`] capability set used by the reconciler
//! - [`client`] - REST API v2 client
//! - [`wire`] - JSON request/response shapes and their mapping to models

mod client;
mod controller;
mod wire;

pub use client::PceClient;
pub use controller::PolicyController;
pub use wire::{IpListRecord, IpRangeRecord, ProvisionResponse};
