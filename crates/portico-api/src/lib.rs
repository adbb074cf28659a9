//! The game service contract for Portico clients.
//!
//! This crate defines what the client says to the game service and what
//! it hears back:
//!
//! - **Types** ([`Identity`], [`Credential`], [`LoginResponse`],
//!   [`PlayerStatus`], ...): the records that cross the wire.
//! - **[`RemoteApi`]**: register, login, and player status, the three
//!   calls the client core makes.
//! - **Errors** ([`ApiError`]): the failure taxonomy every call shares.
//! - **Codec** ([`Codec`], [`JsonCodec`]): how records are turned into
//!   bytes for local persistence.
//!
//! # Feature flags
//!
//! - `http` (default): [`HttpApi`], a `reqwest` client for the real service
//! - `memory`: [`InMemoryApi`], an in-process stand-in for demos and tests

mod codec;
mod error;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "memory")]
mod memory;
mod remote;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::{ApiError, CodecError};
#[cfg(feature = "http")]
pub use http::HttpApi;
#[cfg(feature = "memory")]
pub use memory::{CallCounts, InMemoryApi};
pub use remote::RemoteApi;
pub use types::{
    Credential, Identity, LoginRequest, LoginResponse, PlayerStatus, RegisterRequest, UserId,
};
