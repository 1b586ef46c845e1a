// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Aleteo Vault
//!
//! Cached access to secrets held in AWS Systems Manager Parameter Store.
//!
//! A [`Vault`](vault::Vault) wraps a single named parameter whose value is a
//! JSON object. Reads go through a single-slot [`TtlCache`](cache::TtlCache);
//! writes merge a partial object onto the current value and commit the result
//! back to the store before updating the cache.
//!
//! ```text
//! Secrets (bot / cookie keys)
//!    |
//!    +-> Vault<T> -> TtlCache<T>
//!           |
//!           +-> ParameterStore (SSM, in-memory)
//!    +-> PasswordGenerator (Secrets Manager, local)
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: single-value time-to-live cell
//! - [`constants`]: parameter names, cache lifetimes and rotation defaults
//! - [`errors`]: [`VaultError`](errors::VaultError)
//! - [`generator`]: random password collaborator and fallback
//! - [`models`]: bot credential and cookie key payloads
//! - [`secrets`]: the named accessors, including cookie key rotation
//! - [`ssm`]: Parameter Store backed [`ParameterStore`](store::ParameterStore)
//! - [`store`]: the store trait and an in-memory implementation
//! - [`utils`]: hashing and random value helpers
//! - [`vault`]: the read-through / write-through vault

pub mod cache;
pub mod constants;
pub mod errors;
pub mod generator;
pub mod models;
pub mod secrets;
pub mod ssm;
pub mod store;
pub mod utils;
pub mod vault;
