//! Velocity Counter (component A).
//!
//! Sliding-window counts and distinct-set counts over
//! `(entity_type, entity_id, metric)`, backed by Redis sorted sets: the
//! member is the score's key and the timestamp (ms) is the sorted-set
//! score, which gives both TTL-bounded recency queries (`ZCOUNT`) and
//! natural dedup on `member` (`ZADD` on an existing member just updates
//! its score).

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Card,
    Device,
    Ip,
    User,
    Service,
}

impl EntityType {
    fn as_str(&self) -> &'static str {
        match self {
            EntityType::Card => "card",
            EntityType::Device => "device",
            EntityType::Ip => "ip",
            EntityType::User => "user",
            EntityType::Service => "service",
        }
    }
}

/// Standard sliding windows, in seconds.
pub mod windows {
    pub const TEN_MIN: u64 = 600;
    pub const ONE_HOUR: u64 = 3_600;
    pub const ONE_DAY: u64 = 86_400;
    pub const SEVEN_DAYS: u64 = 604_800;
    pub const THIRTY_DAYS: u64 = 2_592_000;
}

#[async_trait]
pub trait VelocityStore: Send + Sync {
    async fn increment(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        event_id: &str,
        ts_ms: i64,
        ttl_secs: u64,
    ) -> Result<u64>;

    async fn count(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64>;

    async fn add_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        ts_ms: i64,
        ttl_secs: u64,
    ) -> Result<()>;

    async fn count_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64>;

    async fn has_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        window_s: u64,
    ) -> Result<bool>;

    async fn cleanup_expired(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        max_age_s: u64,
    ) -> Result<u64>;

    /// Accumulates a plain rolling-window sum (e.g. amount spent), stored
    /// next to the sorted-set structure as a simple counter with a
    /// refreshed TTL. Not part of spec §4.1's operation list, but the
    /// same physical store.
    async fn increment_amount(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        amount: i64,
        ttl_secs: u64,
    ) -> Result<()>;

    async fn get_amount(&self, entity_type: EntityType, entity_id: &str, metric: &str) -> Result<i64>;

    /// Liveness probe for the health endpoint (spec §6.2).
    async fn health_check(&self) -> bool;
}

#[derive(Clone)]
pub struct RedisVelocityStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisVelocityStore {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn, key_prefix: key_prefix.to_string() })
    }

    fn key(&self, entity_type: EntityType, entity_id: &str, metric: &str) -> String {
        format!("{}:{}:{}:{}", self.key_prefix, entity_type.as_str(), entity_id, metric)
    }
}

#[async_trait]
impl VelocityStore for RedisVelocityStore {
    async fn increment(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        event_id: &str,
        ts_ms: i64,
        ttl_secs: u64,
    ) -> Result<u64> {
        let key = self.key(entity_type, entity_id, metric);
        let mut conn = self.conn.clone();
        let added: i64 = conn.zadd(&key, event_id, ts_ms).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;
        Ok(added.max(0) as u64)
    }

    async fn count(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64> {
        let key = self.key(entity_type, entity_id, metric);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let floor = now_ms - (window_s as i64) * 1000;
        let mut conn = self.conn.clone();
        let count: u64 = conn.zcount(&key, floor, now_ms).await?;
        Ok(count)
    }

    async fn add_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        ts_ms: i64,
        ttl_secs: u64,
    ) -> Result<()> {
        let key = self.key(entity_type, entity_id, metric);
        let mut conn = self.conn.clone();
        let _: i64 = conn.zadd(&key, value, ts_ms).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;
        Ok(())
    }

    async fn count_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64> {
        self.count(entity_type, entity_id, metric, window_s).await
    }

    async fn has_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        window_s: u64,
    ) -> Result<bool> {
        let key = self.key(entity_type, entity_id, metric);
        let mut conn = self.conn.clone();
        let score: Option<i64> = conn.zscore(&key, value).await?;
        match score {
            Some(ts_ms) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                Ok(ts_ms >= now_ms - (window_s as i64) * 1000)
            }
            None => Ok(false),
        }
    }

    async fn cleanup_expired(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        max_age_s: u64,
    ) -> Result<u64> {
        let key = self.key(entity_type, entity_id, metric);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let floor = now_ms - (max_age_s as i64) * 1000;
        let mut conn = self.conn.clone();
        let removed: u64 = conn.zrembyscore(&key, i64::MIN, floor).await?;
        Ok(removed)
    }

    async fn increment_amount(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        amount: i64,
        ttl_secs: u64,
    ) -> Result<()> {
        let key = format!("{}:amount:{}", self.key_prefix, self.key(entity_type, entity_id, metric));
        let mut conn = self.conn.clone();
        let _: i64 = conn.incr(&key, amount).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;
        Ok(())
    }

    async fn get_amount(&self, entity_type: EntityType, entity_id: &str, metric: &str) -> Result<i64> {
        let key = format!("{}:amount:{}", self.key_prefix, self.key(entity_type, entity_id, metric));
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn.get(&key).await?;
        Ok(value.unwrap_or(0))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await.is_ok()
    }
}

/// In-memory velocity store used by pipeline unit tests and as a
/// degradation fallback; never shared across process restarts.
#[derive(Default)]
pub struct InMemoryVelocityStore {
    sets: dashmap::DashMap<String, Vec<(String, i64)>>,
    amounts: dashmap::DashMap<String, i64>,
}

impl InMemoryVelocityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(entity_type: EntityType, entity_id: &str, metric: &str) -> String {
        format!("{}:{}:{}", entity_type.as_str(), entity_id, metric)
    }
}

#[async_trait]
impl VelocityStore for InMemoryVelocityStore {
    async fn increment(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        event_id: &str,
        ts_ms: i64,
        _ttl_secs: u64,
    ) -> Result<u64> {
        let key = Self::key(entity_type, entity_id, metric);
        let mut entry = self.sets.entry(key).or_default();
        if let Some(pair) = entry.iter_mut().find(|(m, _)| m == event_id) {
            pair.1 = ts_ms;
            Ok(0)
        } else {
            entry.push((event_id.to_string(), ts_ms));
            Ok(1)
        }
    }

    async fn count(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64> {
        let key = Self::key(entity_type, entity_id, metric);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let floor = now_ms - (window_s as i64) * 1000;
        Ok(self
            .sets
            .get(&key)
            .map(|v| v.iter().filter(|(_, ts)| *ts >= floor && *ts <= now_ms).count() as u64)
            .unwrap_or(0))
    }

    async fn add_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        ts_ms: i64,
        _ttl_secs: u64,
    ) -> Result<()> {
        let key = Self::key(entity_type, entity_id, metric);
        let mut entry = self.sets.entry(key).or_default();
        if let Some(pair) = entry.iter_mut().find(|(m, _)| m == value) {
            pair.1 = ts_ms;
        } else {
            entry.push((value.to_string(), ts_ms));
        }
        Ok(())
    }

    async fn count_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        window_s: u64,
    ) -> Result<u64> {
        self.count(entity_type, entity_id, metric, window_s).await
    }

    async fn has_distinct(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        value: &str,
        window_s: u64,
    ) -> Result<bool> {
        let key = Self::key(entity_type, entity_id, metric);
        let now_ms = chrono::Utc::now().timestamp_millis();
        Ok(self.sets.get(&key).map_or(false, |v| {
            v.iter().any(|(m, ts)| m == value && *ts >= now_ms - (window_s as i64) * 1000)
        }))
    }

    async fn cleanup_expired(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        max_age_s: u64,
    ) -> Result<u64> {
        let key = Self::key(entity_type, entity_id, metric);
        let now_ms = chrono::Utc::now().timestamp_millis();
        let floor = now_ms - (max_age_s as i64) * 1000;
        if let Some(mut entry) = self.sets.get_mut(&key) {
            let before = entry.len();
            entry.retain(|(_, ts)| *ts >= floor);
            Ok((before - entry.len()) as u64)
        } else {
            Ok(0)
        }
    }

    async fn increment_amount(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        metric: &str,
        amount: i64,
        _ttl_secs: u64,
    ) -> Result<()> {
        let key = Self::key(entity_type, entity_id, metric);
        *self.amounts.entry(key).or_insert(0) += amount;
        Ok(())
    }

    async fn get_amount(&self, entity_type: EntityType, entity_id: &str, metric: &str) -> Result<i64> {
        let key = Self::key(entity_type, entity_id, metric);
        Ok(self.amounts.get(&key).map(|v| *v).unwrap_or(0))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn increment_dedups_same_event() {
        let store = InMemoryVelocityStore::new();
        let now = chrono::Utc::now().timestamp_millis();
        let added = store
            .increment(EntityType::Card, "C1", "attempts", "ev1", now, 600)
            .await
            .unwrap();
        assert_eq!(added, 1);
        let added_again = store
            .increment(EntityType::Card, "C1", "attempts", "ev1", now, 600)
            .await
            .unwrap();
        assert_eq!(added_again, 0);
        let count = store.count(EntityType::Card, "C1", "attempts", 600).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn count_distinct_never_exceeds_count() {
        let store = InMemoryVelocityStore::new();
        let now = chrono::Utc::now().timestamp_millis();
        for i in 0..5 {
            store
                .increment(EntityType::Card, "C2", "attempts", &format!("ev{i}"), now, 600)
                .await
                .unwrap();
            store
                .add_distinct(EntityType::Card, "C2", "distinct_devices", &format!("d{i}"), now, 600)
                .await
                .unwrap();
        }
        let count = store.count(EntityType::Card, "C2", "attempts", 600).await.unwrap();
        let distinct = store.count_distinct(EntityType::Card, "C2", "distinct_devices", 600).await.unwrap();
        assert!(distinct <= count);
    }

    #[tokio::test]
    async fn has_distinct_respects_window() {
        let store = InMemoryVelocityStore::new();
        let old_ts = chrono::Utc::now().timestamp_millis() - 10_000_000;
        store.add_distinct(EntityType::Device, "D1", "distinct_cards", "C1", old_ts, 600).await.unwrap();
        let present = store.has_distinct(EntityType::Device, "D1", "distinct_cards", "C1", 600).await.unwrap();
        assert!(!present);
    }

    #[tokio::test]
    async fn cleanup_removes_old_entries() {
        let store = InMemoryVelocityStore::new();
        let old_ts = chrono::Utc::now().timestamp_millis() - 100_000_000;
        store.increment(EntityType::Ip, "I1", "attempts", "ev_old", old_ts, 600).await.unwrap();
        let removed = store.cleanup_expired(EntityType::Ip, "I1", "attempts", 600).await.unwrap();
        assert_eq!(removed, 1);
    }
}
