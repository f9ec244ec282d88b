//! Membership views <-> model mapper

use attend_core::entities::{MembershipInfo, TargetMember};
use attend_core::error::DomainError;

use super::parse_attribute;
use crate::models::{MembershipInfoModel, TargetMemberModel};

impl From<MembershipInfoModel> for MembershipInfo {
    fn from(model: MembershipInfoModel) -> Self {
        MembershipInfo {
            unit_id: model.unit_id,
            unit_name: model.unit_name,
            is_attendance_target: model.is_attendance_target,
            is_operations_unit: model.is_operations_unit,
            nickname: model.nickname,
            role_ids: model.role_ids,
        }
    }
}

impl TryFrom<TargetMemberModel> for TargetMember {
    type Error = DomainError;

    fn try_from(model: TargetMemberModel) -> Result<Self, Self::Error> {
        Ok(TargetMember {
            attribute: parse_attribute(&model.attribute)?,
            participant_id: model.participant_id,
            display_name: model.display_name,
            nickname: model.nickname,
            unit_id: model.unit_id,
            unit_name: model.unit_name,
        })
    }
}
