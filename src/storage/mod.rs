//! Persistence collaborators for the trust layer
//!
//! Custom role definitions and audit records live outside the core; the
//! traits here are the seams, with in-memory implementations for tests and
//! single-process deployments.

pub mod audit;
pub mod roles;

pub use audit::{
    AuditActionType, AuditEntry, AuditSink, MemoryAuditSink, TracingAuditSink, emit,
};
pub use roles::{MemoryRoleStore, RoleStore};
