// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Single-slot time-to-live cache.
//!
//! [`TtlCache`] memoizes one value. A value stored with a positive TTL is
//! considered stale once the TTL has elapsed since the last [`set`]; a zero
//! TTL disables expiry entirely.
//!
//! Reads come in two flavours so that mutation is never hidden behind a
//! shared borrow:
//!
//! - [`peek`] is pure and reports a stale value as absent without clearing it
//! - [`get`] first calls [`invalidate_if_expired`], then returns the slot
//!
//! [`set`]: TtlCache::set
//! [`peek`]: TtlCache::peek
//! [`get`]: TtlCache::get
//! [`invalidate_if_expired`]: TtlCache::invalidate_if_expired

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct TtlCache<T> {
    data: Option<T>,
    /// `None` while empty or when the TTL is zero
    expires_at: Option<Instant>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: None,
            expires_at: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Returns the stored value if it is still fresh. Never mutates.
    pub fn peek(&self) -> Option<&T> {
        if self.is_expired() {
            None
        } else {
            self.data.as_ref()
        }
    }

    /// Drops a stale value. Returns true if something was dropped.
    pub fn invalidate_if_expired(&mut self) -> bool {
        if self.data.is_some() && self.is_expired() {
            self.data = None;
            self.expires_at = None;
            return true;
        }
        false
    }

    pub fn get(&mut self) -> Option<&T> {
        self.invalidate_if_expired();
        self.data.as_ref()
    }

    /// Stores `value` and restarts the TTL.
    pub fn set(&mut self, value: T) -> &T {
        self.expires_at = if self.ttl.is_zero() {
            None
        } else {
            // an unrepresentable deadline behaves like no deadline
            Instant::now().checked_add(self.ttl)
        };
        self.data.insert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_new_cache_is_empty() {
        let mut cache: TtlCache<String> = TtlCache::new(TTL);
        assert!(cache.peek().is_none());
        assert!(cache.get().is_none());
        assert!(cache.expires_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get_returns_value() {
        let mut cache = TtlCache::new(TTL);
        cache.set("token".to_string());
        assert_eq!(cache.get().map(String::as_str), Some("token"));
        assert_eq!(cache.peek().map(String::as_str), Some("token"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_is_fresh_until_ttl_elapses() {
        let mut cache = TtlCache::new(TTL);
        cache.set(1u32);

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert_eq!(cache.get(), Some(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_value_is_cleared_once() {
        let mut cache = TtlCache::new(TTL);
        cache.set(1u32);

        tokio::time::advance(TTL + Duration::from_millis(1)).await;

        assert!(cache.invalidate_if_expired());
        assert!(!cache.invalidate_if_expired());
        assert_eq!(cache.get(), None);
        assert_eq!(cache.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_peek_does_not_clear_stale_value() {
        let mut cache = TtlCache::new(TTL);
        cache.set(7u32);

        tokio::time::advance(TTL * 2).await;

        assert_eq!(cache.peek(), None);
        // still held until an explicit invalidation
        assert!(cache.invalidate_if_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restarts_ttl() {
        let mut cache = TtlCache::new(TTL);
        cache.set(1u32);
        tokio::time::advance(TTL - Duration::from_secs(1)).await;

        cache.set(2u32);
        tokio::time::advance(TTL - Duration::from_secs(1)).await;

        assert_eq!(cache.get(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_after_expiry_repopulates() {
        let mut cache = TtlCache::new(TTL);
        cache.set(1u32);
        tokio::time::advance(TTL * 2).await;
        assert_eq!(cache.get(), None);

        cache.set(3u32);
        assert_eq!(cache.get(), Some(&3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_expires() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.set("forever");

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;

        assert!(!cache.is_expired());
        assert_eq!(cache.get(), Some(&"forever"));
        assert!(cache.expires_at().is_none());
    }
}
