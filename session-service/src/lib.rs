//! session-service: HTTP CRUD API for opaque JSON session documents.
//!
//! Clients persist arbitrary JSON payloads and get back a store-assigned
//! id; the service never interprets the payload beyond requiring it to be
//! a non-empty JSON object.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
