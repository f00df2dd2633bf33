//! Enroll Assist — enrollment wizard core for a training-management system.

pub mod config;
pub mod controller;
pub mod error;
pub mod ports;
pub mod schema;
pub mod submit;
pub mod wizard;
