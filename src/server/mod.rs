//! Bot runtime and dashboard backend.
//!
//! # Architecture
//!
//! - **Bot** (`bot/`) - Gateway event handlers, the command registry and dispatcher, component routing
//! - **Controller Layer** (`controller/`) - Dashboard HTTP handlers and DTO conversion
//! - **Service Layer** (`service/`) - Ticket, poll, moderation, settings and presence logic
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Discord** (`discord/`) - The connector trait the workflows use for Discord REST calls, plus embed helpers
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Dashboard token guard
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based configuration
//! - **Logging** (`logging/`) - Subscriber setup, webhook forwarding and the panic hook
//! - **State** (`state`) - Shared application state
//! - **Startup** (`startup`) - Database connection and shutdown signals
//! - **Router** (`router`) - Axum routes and the OpenAPI document
//! - **Scheduler** (`scheduler/`) - Status rotation and dashboard stats push

pub mod bot;
pub mod config;
pub mod controller;
pub mod data;
pub mod discord;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
