//! Attribute resolution from group-role ids

use std::collections::HashSet;

use super::ResolverSettings;
use crate::entities::MembershipInfo;
use crate::value_objects::Attribute;

/// Union of role ids over every membership.
///
/// A role held in any unit counts, so a staff role in the operations unit
/// promotes the participant everywhere. Malformed snapshots contribute nothing.
pub fn collect_role_ids(memberships: &[MembershipInfo]) -> HashSet<String> {
    memberships
        .iter()
        .flat_map(MembershipInfo::role_id_list)
        .collect()
}

/// Staff beats organizer beats participant
pub fn determine_attribute<'a, I>(role_ids: I, settings: &ResolverSettings) -> Attribute
where
    I: IntoIterator<Item = &'a String>,
{
    let mut attribute = Attribute::Participant;
    for role_id in role_ids {
        if settings.staff_ids.contains(role_id) {
            return Attribute::Staff;
        }
        if settings.organizer_ids.contains(role_id) {
            attribute = Attribute::Organizer;
        }
    }
    attribute
}
