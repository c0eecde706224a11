// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod resolve;
pub mod secrets;
pub mod tecopos;

pub use secrets::SecretCodec;
pub use tecopos::TecoposClient;
