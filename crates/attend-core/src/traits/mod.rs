mod repositories;

pub use repositories::{
    AttendanceQuery, AttendanceRepository, MemberQuery, MembershipRepository,
    ParticipantRepository, RepoResult, RoleMappingRepository, SystemConfigRepository,
    UnitRepository,
};
