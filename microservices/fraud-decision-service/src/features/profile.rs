//! Entity Profile Store (spec §3.2): long-lived per-entity records backed
//! by a flat Redis hash, keyed `{prefix}:profile:{entity_type}:{entity_id}`.

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::Result;
use crate::types::{CardProfile, DeviceProfile, IpProfile, ServiceProfile, UserProfile};
use crate::velocity::EntityType;

const CARD_RETENTION_SECS: i64 = 90 * 86_400;
const DEFAULT_RETENTION_SECS: i64 = 30 * 86_400;

fn retention_for(entity_type: EntityType) -> i64 {
    match entity_type {
        EntityType::Card => CARD_RETENTION_SECS,
        _ => DEFAULT_RETENTION_SECS,
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_card(&self, card_token: &str) -> Result<CardProfile>;
    async fn get_device(&self, device_id: &str) -> Result<DeviceProfile>;
    async fn get_ip(&self, ip_address: &str) -> Result<IpProfile>;
    async fn get_user(&self, user_id: &str) -> Result<UserProfile>;
    async fn get_service(&self, service_id: &str) -> Result<ServiceProfile>;

    async fn put_card(&self, card_token: &str, profile: &CardProfile) -> Result<()>;
    async fn put_device(&self, device_id: &str, profile: &DeviceProfile) -> Result<()>;
    async fn put_ip(&self, ip_address: &str, profile: &IpProfile) -> Result<()>;
    async fn put_user(&self, user_id: &str, profile: &UserProfile) -> Result<()>;
    async fn put_service(&self, service_id: &str, profile: &ServiceProfile) -> Result<()>;
}

#[derive(Clone)]
pub struct RedisProfileStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisProfileStore {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn, key_prefix: key_prefix.to_string() })
    }

    fn key(&self, entity_type: EntityType, entity_id: &str) -> String {
        let kind = match entity_type {
            EntityType::Card => "card",
            EntityType::Device => "device",
            EntityType::Ip => "ip",
            EntityType::User => "user",
            EntityType::Service => "service",
        };
        format!("{}:profile:{}:{}", self.key_prefix, kind, entity_id)
    }

    async fn read<T: Default + serde::de::DeserializeOwned>(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<T> {
        let key = self.key(entity_type, entity_id);
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&key).await?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            None => Ok(T::default()),
        }
    }

    async fn write<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        value: &T,
    ) -> Result<()> {
        let key = self.key(entity_type, entity_id);
        let json = serde_json::to_string(value)
            .map_err(|e| crate::error::FraudError::Internal(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(&key, json, retention_for(entity_type) as u64).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    async fn get_card(&self, card_token: &str) -> Result<CardProfile> {
        self.read(EntityType::Card, card_token).await
    }
    async fn get_device(&self, device_id: &str) -> Result<DeviceProfile> {
        self.read(EntityType::Device, device_id).await
    }
    async fn get_ip(&self, ip_address: &str) -> Result<IpProfile> {
        self.read(EntityType::Ip, ip_address).await
    }
    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.read(EntityType::User, user_id).await
    }
    async fn get_service(&self, service_id: &str) -> Result<ServiceProfile> {
        self.read(EntityType::Service, service_id).await
    }

    async fn put_card(&self, card_token: &str, profile: &CardProfile) -> Result<()> {
        self.write(EntityType::Card, card_token, profile).await
    }
    async fn put_device(&self, device_id: &str, profile: &DeviceProfile) -> Result<()> {
        self.write(EntityType::Device, device_id, profile).await
    }
    async fn put_ip(&self, ip_address: &str, profile: &IpProfile) -> Result<()> {
        self.write(EntityType::Ip, ip_address, profile).await
    }
    async fn put_user(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        self.write(EntityType::User, user_id, profile).await
    }
    async fn put_service(&self, service_id: &str, profile: &ServiceProfile) -> Result<()> {
        self.write(EntityType::Service, service_id, profile).await
    }
}

/// In-memory profile store for tests and degraded-mode fallback.
#[derive(Default)]
pub struct InMemoryProfileStore {
    cards: dashmap::DashMap<String, CardProfile>,
    devices: dashmap::DashMap<String, DeviceProfile>,
    ips: dashmap::DashMap<String, IpProfile>,
    users: dashmap::DashMap<String, UserProfile>,
    services: dashmap::DashMap<String, ServiceProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_card(&self, card_token: &str) -> Result<CardProfile> {
        Ok(self.cards.get(card_token).map(|v| v.clone()).unwrap_or_default())
    }
    async fn get_device(&self, device_id: &str) -> Result<DeviceProfile> {
        Ok(self.devices.get(device_id).map(|v| v.clone()).unwrap_or_default())
    }
    async fn get_ip(&self, ip_address: &str) -> Result<IpProfile> {
        Ok(self.ips.get(ip_address).map(|v| v.clone()).unwrap_or_default())
    }
    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        Ok(self.users.get(user_id).map(|v| v.clone()).unwrap_or_default())
    }
    async fn get_service(&self, service_id: &str) -> Result<ServiceProfile> {
        Ok(self.services.get(service_id).map(|v| v.clone()).unwrap_or_default())
    }

    async fn put_card(&self, card_token: &str, profile: &CardProfile) -> Result<()> {
        self.cards.insert(card_token.to_string(), profile.clone());
        Ok(())
    }
    async fn put_device(&self, device_id: &str, profile: &DeviceProfile) -> Result<()> {
        self.devices.insert(device_id.to_string(), profile.clone());
        Ok(())
    }
    async fn put_ip(&self, ip_address: &str, profile: &IpProfile) -> Result<()> {
        self.ips.insert(ip_address.to_string(), profile.clone());
        Ok(())
    }
    async fn put_user(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        self.users.insert(user_id.to_string(), profile.clone());
        Ok(())
    }
    async fn put_service(&self, service_id: &str, profile: &ServiceProfile) -> Result<()> {
        self.services.insert(service_id.to_string(), profile.clone());
        Ok(())
    }
}

/// Marks `first_seen` if unset and refreshes `last_seen`, matching the
/// common update every profile kind performs in `update_entity_profiles`.
pub(crate) fn touch(common: &mut crate::types::ProfileCommon) {
    let now = Utc::now();
    if common.first_seen.is_none() {
        common.first_seen = Some(now);
    }
    common.last_seen = Some(now);
    common.total_transactions += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_card_returns_default_profile() {
        let store = InMemoryProfileStore::new();
        let profile = store.get_card("unseen").await.unwrap();
        assert_eq!(profile.common.total_transactions, 0);
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = InMemoryProfileStore::new();
        let mut profile = CardProfile::default();
        touch(&mut profile.common);
        store.put_card("C1", &profile).await.unwrap();
        let reloaded = store.get_card("C1").await.unwrap();
        assert_eq!(reloaded.common.total_transactions, 1);
    }
}
