//! Shared types between the ERP backend and its console clients

pub mod dashboards;
pub mod domain;
pub mod enums;
pub mod shared;
pub mod system;
