// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use zeroize::ZeroizeOnDrop;

/// Telegram bot credentials, stored under the bot parameter.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct BotParam {
    pub token: String,
    pub token_hash: String,
    pub webhook_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub info: Option<BotInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub guardrail: Option<Guardrail>,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for BotParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotParam")
            .field("token", &"[REDACTED]")
            .field("token_hash", &"[REDACTED]")
            .field("webhook_hash", &"[REDACTED]")
            .field("info", &self.info)
            .field("guardrail", &self.guardrail)
            .finish()
    }
}

/// The bot's own `getMe` identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardrail {
    pub id: String,
    pub version: String,
}

/// Partial update for [`BotParam`]; `None` fields are left untouched.
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotParamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<BotInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail: Option<Guardrail>,
}

impl fmt::Debug for BotParamPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotParamPatch")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_hash", &self.token_hash.as_ref().map(|_| "[REDACTED]"))
            .field("webhook_hash", &self.webhook_hash.as_ref().map(|_| "[REDACTED]"))
            .field("info", &self.info)
            .field("guardrail", &self.guardrail)
            .finish()
    }
}

/// Cookie signing keys, newest first, and the time of the last rotation.
///
/// Decoding is lenient: a non-numeric `ts` reads as `0`, a non-array `keys`
/// reads as empty, and entries that are not non-empty strings are dropped.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, ZeroizeOnDrop)]
pub struct CookieParam {
    /// unix epoch milliseconds
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: i64,
    #[serde(default, deserialize_with = "lenient_keys")]
    pub keys: Vec<String>,
}

impl fmt::Debug for CookieParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieParam")
            .field("ts", &self.ts)
            .field("keys", &format_args!("[{} REDACTED]", self.keys.len()))
            .finish()
    }
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    })
}

fn lenient_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(key) if !key.is_empty() => Some(key),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
