//! Async client for the farwatch management gateway
//!
//! The gateway exposes a REST API for the fleet of remote agents it tracks:
//! cluster inventory and health, installable capabilities, bootstrap tokens,
//! RBAC roles and bindings, serving certificates and the gateway's own
//! configuration. This crate wraps that API in typed calls and builds the
//! view models the CLI renders.
//!
//! The one piece of real logic lives in [`cluster::fetch_clusters`]: listing
//! the fleet fans out one health request per cluster, tolerates individual
//! failures, and merges the outcomes so a single unreachable agent never
//! takes down the whole fleet view.

pub mod capability;
pub mod client;
pub mod cluster;
pub mod config;

pub use capability::{capabilities_for, Capability, CapabilityState};
pub use client::{ApiClient, Error, Result};
pub use cluster::{fetch_clusters, Cluster, ClusterSource};
pub use config::ConfigDocument;
