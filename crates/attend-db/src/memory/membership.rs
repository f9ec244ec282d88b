use async_trait::async_trait;

use attend_core::entities::{MembershipInfo, TargetMember, UnitMembership};
use attend_core::traits::{MemberQuery, MembershipRepository, RepoResult};

use super::MemoryDatabase;

#[derive(Clone, Debug)]
pub struct MemoryMembershipRepository {
    db: MemoryDatabase,
}

impl MemoryMembershipRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }

    fn target_members(&self, query: &MemberQuery) -> Vec<TargetMember> {
        let tables = &self.db.tables;
        let memberships = tables.memberships.read();

        let mut members: Vec<(usize, TargetMember)> = memberships
            .iter()
            .enumerate()
            .filter(|(_, m)| query.unit_ids.is_empty() || query.unit_ids.contains(&m.unit_id))
            .filter_map(|(seq, m)| {
                let unit = tables.units.get(&m.unit_id)?;
                if !unit.is_attendance_target {
                    return None;
                }
                let participant = tables.participants.get(&m.participant_id)?;
                if query.attribute.is_some_and(|a| a != participant.attribute) {
                    return None;
                }
                Some((
                    seq,
                    TargetMember {
                        participant_id: m.participant_id.clone(),
                        display_name: participant.display_name.clone(),
                        nickname: m.nickname.clone(),
                        attribute: participant.attribute,
                        unit_id: unit.id.clone(),
                        unit_name: unit.name.clone(),
                    },
                ))
            })
            .collect();

        members.sort_by(|(a_seq, a), (b_seq, b)| {
            a.unit_name.cmp(&b.unit_name).then(a_seq.cmp(b_seq))
        });
        members.into_iter().map(|(_, m)| m).collect()
    }
}

#[async_trait]
impl MembershipRepository for MemoryMembershipRepository {
    async fn upsert(&self, membership: &UnitMembership) -> RepoResult<()> {
        let mut memberships = self.db.tables.memberships.write();
        match memberships.iter_mut().find(|m| {
            m.participant_id == membership.participant_id && m.unit_id == membership.unit_id
        }) {
            Some(existing) => *existing = membership.clone(),
            None => memberships.push(membership.clone()),
        }
        Ok(())
    }

    async fn delete(&self, participant_id: &str, unit_id: &str) -> RepoResult<bool> {
        let mut memberships = self.db.tables.memberships.write();
        let before = memberships.len();
        memberships.retain(|m| !(m.participant_id == participant_id && m.unit_id == unit_id));
        Ok(memberships.len() != before)
    }

    async fn find_by_participant(&self, participant_id: &str) -> RepoResult<Vec<MembershipInfo>> {
        let tables = &self.db.tables;
        let memberships = tables.memberships.read();

        Ok(memberships
            .iter()
            .filter(|m| m.participant_id == participant_id)
            .filter_map(|m| {
                let unit = tables.units.get(&m.unit_id)?;
                Some(MembershipInfo::from_parts(m, &unit))
            })
            .collect())
    }

    async fn find_target_members(&self, query: &MemberQuery) -> RepoResult<Vec<TargetMember>> {
        Ok(self.target_members(query))
    }
}
