//! Synchronous typed clients for the IoT platform's v3 REST API.
//!
//! # Overview
//! One client per resource family (`EventClient` for core-data,
//! `DeviceProfileClient` for core-metadata, `TransmissionClient` for
//! support-notifications). Each method builds a request path from route
//! constants and escaped parameters, performs exactly one HTTP call through a
//! [`Transport`] and returns the deserialized payload or an [`ApiError`].
//!
//! # Design
//! - The round-trip sits behind the `Transport` trait, so tests script
//!   responses and production code plugs in [`UreqTransport`].
//! - `RoutePath` and `QueryParams` are the single builder every "by X with
//!   offset/limit" method goes through.
//! - The only state is `DeviceProfileClient`'s device-resource cache, an
//!   explicit [`ResourceCache`] owned by the client instance.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use std::sync::Arc;
//! use iot_client::{ClientConfig, UreqTransport};
//!
//! let config = ClientConfig::from_env()?;
//! let transport = Arc::new(UreqTransport::new(config.timeout()));
//! let profiles = config.device_profile_client(transport);
//! let resource = profiles.device_resource_by_profile_name_and_resource_name("Thermostat", "Temperature")?;
//! println!("{}", resource.resource.properties.value_type);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod clients;
pub mod config;
pub mod dtos;
pub mod error;
pub mod http;
pub mod request;
pub mod routes;
#[cfg(feature = "blocking")]
pub mod transport;

#[cfg(test)]
mod test_support;

pub use cache::ResourceCache;
pub use clients::{DeviceProfileClient, EventClient, TransmissionClient};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ErrorKind};
pub use http::{AuthInjector, BearerToken, HttpMethod, HttpRequest, HttpResponse, NoAuth, Transport};
pub use request::{QueryParams, RoutePath};
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
