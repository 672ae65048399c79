//! Servizor Infrastructure Layer
pub mod keystone;
