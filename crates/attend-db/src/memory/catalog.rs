//! Unit, role mapping and configuration tables

use std::collections::HashMap;

use async_trait::async_trait;

use attend_core::entities::{RoleUnitMapping, Unit};
use attend_core::traits::{RepoResult, RoleMappingRepository, SystemConfigRepository, UnitRepository};

use super::MemoryDatabase;

#[derive(Clone, Debug)]
pub struct MemoryUnitRepository {
    db: MemoryDatabase,
}

impl MemoryUnitRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitRepository for MemoryUnitRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Unit>> {
        Ok(self.db.tables.units.get(id).map(|u| u.clone()))
    }

    async fn upsert(&self, unit: &Unit) -> RepoResult<()> {
        self.db
            .tables
            .units
            .entry(unit.id.clone())
            .and_modify(|existing| {
                existing.name.clone_from(&unit.name);
                existing.icon_url.clone_from(&unit.icon_url);
                existing.is_attendance_target = unit.is_attendance_target;
                existing.is_operations_unit = unit.is_operations_unit;
                existing.updated_at = unit.updated_at;
            })
            .or_insert_with(|| unit.clone());
        Ok(())
    }

    async fn find_targets(&self) -> RepoResult<Vec<Unit>> {
        let mut units: Vec<Unit> = self
            .db
            .tables
            .units
            .iter()
            .filter(|u| u.is_attendance_target)
            .map(|u| u.clone())
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(units)
    }
}

#[derive(Clone, Debug)]
pub struct MemoryRoleMappingRepository {
    db: MemoryDatabase,
}

impl MemoryRoleMappingRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleMappingRepository for MemoryRoleMappingRepository {
    async fn find_by_role(&self, role_id: &str) -> RepoResult<Option<RoleUnitMapping>> {
        Ok(self.db.tables.role_mappings.get(role_id).map(|m| m.clone()))
    }

    async fn find_by_roles(&self, role_ids: &[String]) -> RepoResult<Vec<RoleUnitMapping>> {
        Ok(role_ids
            .iter()
            .filter_map(|id| self.db.tables.role_mappings.get(id).map(|m| m.clone()))
            .collect())
    }

    async fn upsert(&self, mapping: &RoleUnitMapping) -> RepoResult<()> {
        self.db
            .tables
            .role_mappings
            .insert(mapping.role_id.clone(), mapping.clone());
        Ok(())
    }

    async fn delete(&self, role_id: &str) -> RepoResult<()> {
        self.db.tables.role_mappings.remove(role_id);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MemorySystemConfigRepository {
    db: MemoryDatabase,
}

impl MemorySystemConfigRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SystemConfigRepository for MemorySystemConfigRepository {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.db.tables.config.read().get(key).cloned())
    }

    async fn get_all(&self) -> RepoResult<HashMap<String, String>> {
        Ok(self.db.tables.config.read().clone())
    }

    async fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.db
            .tables
            .config
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unit_upsert_refreshes_flags() {
        let repo = MemoryUnitRepository::new(MemoryDatabase::new());
        repo.upsert(&Unit::new("g1", "One")).await.unwrap();
        let color = repo.find_by_id("g1").await.unwrap().unwrap().color;

        repo.upsert(&Unit::new("g1", "Renamed").with_flags(false, true))
            .await
            .unwrap();
        let unit = repo.find_by_id("g1").await.unwrap().unwrap();
        assert_eq!(unit.name, "Renamed");
        assert!(unit.is_operations_unit);
        assert_eq!(unit.color, color);
        assert!(repo.find_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_mappings_follow_request_order() {
        let repo = MemoryRoleMappingRepository::new(MemoryDatabase::new());
        repo.upsert(&RoleUnitMapping::new("r1", "g1")).await.unwrap();
        repo.upsert(&RoleUnitMapping::new("r2", "g2")).await.unwrap();

        let found = repo
            .find_by_roles(&["r2".to_string(), "missing".to_string(), "r1".to_string()])
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|m| m.role_id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let repo = MemorySystemConfigRepository::new(MemoryDatabase::new());
        repo.set("staff_role_ids", "a,b").await.unwrap();
        assert_eq!(repo.get("staff_role_ids").await.unwrap().as_deref(), Some("a,b"));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }
}
