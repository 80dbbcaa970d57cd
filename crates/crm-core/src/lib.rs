//! # crm-core
//!
//! Core types shared across the agency CRM plan metadata crates.
//!
//! This crate provides:
//! - The raw, authored schema document model (`SchemaDocument` and friends)
//! - Field type, render mode, facet and notification level enums
//! - Contact roles as an exhaustive sum type with per-role field schemas
//! - A bounded notification log for transient UI messages
//! - Cross-cutting error types

pub mod document;
pub mod enums;
pub mod errors;
pub mod notifications;
pub mod roles;
