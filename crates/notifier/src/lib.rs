//! Dialout Notifier - phone metadata and order SMS notifications.
//!
//! This crate is the library half of a commerce-platform extension. The host
//! platform owns form rendering, permissions, and order records; this crate
//! owns three phone-number metadata fields (customer account, product
//! listing, checkout order) and the dispatch routine that texts up to three
//! recipients when an order completes.
//!
//! # Architecture
//!
//! The host is modeled as the caller of named extension points:
//!
//! - [`hooks::LifecycleHooks`] is the contract the host invokes (render/save
//!   callbacks for each phone field, plus the order-completion event).
//! - [`store::MetadataStore`] is the host's generic key-value metadata layer.
//! - [`orders::OrderLookup`] resolves completed orders.
//! - [`notify::SmsSender`] is the outbound SMS transport, implemented for
//!   real by [`twilio::TwilioClient`].
//!
//! [`hooks::PhoneManager`] wires these together. Everything behind a trait
//! has an in-memory implementation for tests and dry runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod forms;
pub mod hooks;
pub mod notify;
pub mod orders;
pub mod store;
pub mod twilio;

pub use config::{ConfigError, NotifierConfig, TwilioConfig};
pub use hooks::{HookError, LifecycleHooks, NotifyPolicy, PhoneManager};
pub use notify::{DispatchError, DispatchReport, Dispatcher, SendError, SmsSender};
