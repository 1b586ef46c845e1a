// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("failure to load parameter {id}: {message}")]
    RemoteFetch { id: String, message: String },
    #[error("failure to commit parameter {id}: {message}")]
    RemoteWrite { id: String, message: String },
    #[error("parameter {0} value is empty")]
    MissingParameter(String),
    #[error("parameter {id} is malformed: {message}")]
    Serialization { id: String, message: String },
    #[error("password generation failed: {0}")]
    Generator(String),
}

impl VaultError {
    pub(crate) fn serialization(id: &str, source: impl std::fmt::Display) -> Self {
        Self::Serialization {
            id: id.to_string(),
            message: source.to_string(),
        }
    }
}
