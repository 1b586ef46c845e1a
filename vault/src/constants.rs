// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

pub const BOT_PARAM_NAME: &str = "/aleteo/bot";
pub const COOKIES_PARAM_NAME: &str = "/aleteo/cookies";

pub const PARAMS_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
pub const COOKIE_KEYS_TTL: Duration = Duration::from_secs(12 * 3600); // rotate every 12 hours

/// newest key plus the two that preceded it
pub const MAX_COOKIE_KEYS: usize = 3;

/// Characters Secrets Manager must leave out of generated passwords
pub const PASSWORD_EXCLUDED_CHARACTERS: &str = "\"{}[]()',";
pub const LOCAL_PASSWORD_LENGTH: usize = 32;
