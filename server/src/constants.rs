// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7000;
pub const DEFAULT_REGION: &str = "eu-west-1";

pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MiB
/// Set by CloudFront origin access control on Lambda function URL requests
pub const HASH_HEADER_NAME: &str = "X-Amz-Content-SHA256";

pub const WEBHOOK_PATH: &str = "/webhook/{token}";
