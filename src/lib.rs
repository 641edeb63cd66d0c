//! Partners site: a marketing front-end that renders block-editor content
//! fetched from a headless CMS.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
