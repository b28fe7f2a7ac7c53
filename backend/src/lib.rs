//! # Equipment Analytics Backend
//!
//! Parameter analytics for chemical process equipment.
//!
//! Operators upload CSV files listing equipment (name, type, flowrate,
//! pressure, temperature). The backend stores each upload as a dataset and
//! derives from it descriptive statistics, IQR outlier flags, the type
//! distribution, a Pearson correlation matrix, per-type peer benchmarks and
//! scatter-plot points. A REST API built on Axum serves the results to the
//! dashboards.
//!
//! ## Architecture
//!
//! - [`algorithms`]: The pure analytics engine and its statistics helpers
//! - [`models`]: Equipment records and persisted dataset entities
//! - [`parsing`]: CSV upload parsing
//! - [`db`]: Repository pattern and the in-memory store
//! - [`services`]: Ingestion, dataset analytics and reports
//! - [`config`]: TOML and environment configuration
//! - [`api`]: Identifier types and the public data types
//! - [`http`]: Axum-based HTTP server and request handlers

// RepositoryError carries a structured context
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
