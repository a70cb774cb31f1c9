//! pmk — provision and manage Kubernetes clusters on Proxmox VMs.
//!
//! The heart of the crate is the [`draft`] module: the in-memory cluster
//! draft edited by the creation wizard and the allocator that derives a new
//! node's VM id, name and IP address from the existing node set. The rest is
//! the plumbing a front-end tool needs around that core: REST wrappers for
//! the catalog and provisioning services, plus draft persistence between
//! invocations.

pub mod api;
pub mod config;
pub mod draft;
pub mod models;
pub mod services;
pub mod util;
