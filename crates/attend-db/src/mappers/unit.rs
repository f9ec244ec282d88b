//! Unit entity <-> model mapper

use attend_core::entities::{RoleUnitMapping, Unit};

use crate::models::{RoleMappingModel, UnitModel};

impl From<UnitModel> for Unit {
    fn from(model: UnitModel) -> Self {
        Unit {
            id: model.id,
            name: model.name,
            icon_url: model.icon_url,
            color: model.color,
            is_attendance_target: model.is_attendance_target,
            is_operations_unit: model.is_operations_unit,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RoleMappingModel> for RoleUnitMapping {
    fn from(model: RoleMappingModel) -> Self {
        RoleUnitMapping {
            role_id: model.role_id,
            target_unit_ids: model.target_unit_ids,
        }
    }
}
