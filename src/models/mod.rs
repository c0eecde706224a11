// SPDX-License-Identifier: MIT

//! Data models for storage and API responses.

pub mod conciliation;
pub mod credential;
pub mod inventory;
pub mod sale;
pub mod user;

pub use conciliation::Conciliation;
pub use credential::TecoposCredential;
pub use inventory::InventorySnapshot;
pub use sale::Sale;
pub use user::User;
