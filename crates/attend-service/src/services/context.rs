//! Service context - dependency container for services
//!
//! Holds the repositories, token codecs, calendar and clock needed by services.

use std::sync::Arc;

use attend_common::auth::{SessionService, TicketCodec};
use attend_core::traits::{
    AttendanceRepository, MembershipRepository, ParticipantRepository, RoleMappingRepository,
    SystemConfigRepository, UnitRepository,
};
use attend_core::value_objects::{CivilCalendar, CivilDate, Clock, SystemClock};
use attend_core::ResolverSettings;
use attend_db::{
    MemoryAttendanceRepository, MemoryDatabase, MemoryMembershipRepository,
    MemoryParticipantRepository, MemoryRoleMappingRepository, MemorySystemConfigRepository,
    MemoryUnitRepository, PgAttendanceRepository, PgMembershipRepository, PgParticipantRepository,
    PgPool, PgRoleMappingRepository, PgSystemConfigRepository, PgUnitRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Storage repositories (PostgreSQL or in-memory)
/// - Ticket and session codecs
/// - The civil calendar and clock used to date check-ins
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    participant_repo: Arc<dyn ParticipantRepository>,
    unit_repo: Arc<dyn UnitRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    attendance_repo: Arc<dyn AttendanceRepository>,
    role_mapping_repo: Arc<dyn RoleMappingRepository>,
    config_repo: Arc<dyn SystemConfigRepository>,

    // Codecs
    ticket_codec: Arc<TicketCodec>,
    session_service: Arc<SessionService>,

    // Time
    calendar: CivilCalendar,
    clock: Arc<dyn Clock>,

    export_api_key: Option<String>,
}

impl ServiceContext {
    // === Repositories ===

    pub fn participant_repo(&self) -> &dyn ParticipantRepository {
        self.participant_repo.as_ref()
    }

    pub fn unit_repo(&self) -> &dyn UnitRepository {
        self.unit_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    pub fn attendance_repo(&self) -> &dyn AttendanceRepository {
        self.attendance_repo.as_ref()
    }

    pub fn role_mapping_repo(&self) -> &dyn RoleMappingRepository {
        self.role_mapping_repo.as_ref()
    }

    pub fn config_repo(&self) -> &dyn SystemConfigRepository {
        self.config_repo.as_ref()
    }

    // === Codecs ===

    pub fn ticket_codec(&self) -> &TicketCodec {
        self.ticket_codec.as_ref()
    }

    pub fn session_service(&self) -> &SessionService {
        self.session_service.as_ref()
    }

    // === Time ===

    pub fn calendar(&self) -> &CivilCalendar {
        &self.calendar
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Civil date at the venue right now
    pub fn today(&self) -> CivilDate {
        self.calendar.date_of(self.clock.now())
    }

    /// Role and unit settings as currently stored
    pub async fn resolver_settings(&self) -> ServiceResult<ResolverSettings> {
        let values = self.config_repo.get_all().await?;
        Ok(ResolverSettings::from_map(&values))
    }

    /// Key expected by the export endpoints, if configured
    pub fn export_api_key(&self) -> Option<&str> {
        self.export_api_key.as_deref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("calendar", &self.calendar)
            .field("clock", &self.clock)
            .field("export_api_key", &self.export_api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    participant_repo: Option<Arc<dyn ParticipantRepository>>,
    unit_repo: Option<Arc<dyn UnitRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    attendance_repo: Option<Arc<dyn AttendanceRepository>>,
    role_mapping_repo: Option<Arc<dyn RoleMappingRepository>>,
    config_repo: Option<Arc<dyn SystemConfigRepository>>,
    ticket_codec: Option<Arc<TicketCodec>>,
    session_service: Option<Arc<SessionService>>,
    calendar: Option<CivilCalendar>,
    clock: Option<Arc<dyn Clock>>,
    export_api_key: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use PostgreSQL repositories over one pool
    pub fn postgres(self, pool: PgPool) -> Self {
        self.participant_repo(Arc::new(PgParticipantRepository::new(pool.clone())))
            .unit_repo(Arc::new(PgUnitRepository::new(pool.clone())))
            .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
            .attendance_repo(Arc::new(PgAttendanceRepository::new(pool.clone())))
            .role_mapping_repo(Arc::new(PgRoleMappingRepository::new(pool.clone())))
            .config_repo(Arc::new(PgSystemConfigRepository::new(pool)))
    }

    /// Use in-memory repositories sharing the tables of `db`
    pub fn memory(self, db: &MemoryDatabase) -> Self {
        self.participant_repo(Arc::new(MemoryParticipantRepository::new(db.clone())))
            .unit_repo(Arc::new(MemoryUnitRepository::new(db.clone())))
            .membership_repo(Arc::new(MemoryMembershipRepository::new(db.clone())))
            .attendance_repo(Arc::new(MemoryAttendanceRepository::new(db.clone())))
            .role_mapping_repo(Arc::new(MemoryRoleMappingRepository::new(db.clone())))
            .config_repo(Arc::new(MemorySystemConfigRepository::new(db.clone())))
    }

    pub fn participant_repo(mut self, repo: Arc<dyn ParticipantRepository>) -> Self {
        self.participant_repo = Some(repo);
        self
    }

    pub fn unit_repo(mut self, repo: Arc<dyn UnitRepository>) -> Self {
        self.unit_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn attendance_repo(mut self, repo: Arc<dyn AttendanceRepository>) -> Self {
        self.attendance_repo = Some(repo);
        self
    }

    pub fn role_mapping_repo(mut self, repo: Arc<dyn RoleMappingRepository>) -> Self {
        self.role_mapping_repo = Some(repo);
        self
    }

    pub fn config_repo(mut self, repo: Arc<dyn SystemConfigRepository>) -> Self {
        self.config_repo = Some(repo);
        self
    }

    pub fn ticket_codec(mut self, codec: TicketCodec) -> Self {
        self.ticket_codec = Some(Arc::new(codec));
        self
    }

    pub fn session_service(mut self, service: SessionService) -> Self {
        self.session_service = Some(Arc::new(service));
        self
    }

    pub fn calendar(mut self, calendar: CivilCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn export_api_key(mut self, key: Option<String>) -> Self {
        self.export_api_key = key.filter(|k| !k.is_empty());
        self
    }

    /// Build the ServiceContext
    ///
    /// Calendar defaults to UTC+09:00 and the clock to the wall clock.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            participant_repo: self.participant_repo.ok_or_else(|| ServiceError::validation("participant_repo is required"))?,
            unit_repo: self.unit_repo.ok_or_else(|| ServiceError::validation("unit_repo is required"))?,
            membership_repo: self.membership_repo.ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            attendance_repo: self.attendance_repo.ok_or_else(|| ServiceError::validation("attendance_repo is required"))?,
            role_mapping_repo: self.role_mapping_repo.ok_or_else(|| ServiceError::validation("role_mapping_repo is required"))?,
            config_repo: self.config_repo.ok_or_else(|| ServiceError::validation("config_repo is required"))?,
            ticket_codec: self.ticket_codec.ok_or_else(|| ServiceError::validation("ticket_codec is required"))?,
            session_service: self.session_service.ok_or_else(|| ServiceError::validation("session_service is required"))?,
            calendar: self.calendar.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            export_api_key: self.export_api_key,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Context over in-memory tables with a controllable clock

    use std::sync::Arc;

    use attend_common::auth::{LegacyWindow, SessionService, TicketCodec};
    use attend_core::value_objects::ManualClock;
    use attend_db::MemoryDatabase;
    use chrono::{DateTime, TimeZone, Utc};

    use super::{ServiceContext, ServiceContextBuilder};

    pub const TICKET_SECRET: &str = "test-ticket-secret";
    pub const SESSION_SECRET: &str = "test-session-secret";
    pub const EXPORT_KEY: &str = "export-key";

    /// 2026-03-01 12:00 at UTC+09:00
    pub fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 3, 0, 0).unwrap()
    }

    pub struct Fixture {
        pub clock: Arc<ManualClock>,
        pub ctx: ServiceContext,
    }

    pub fn fixture() -> Fixture {
        let db = MemoryDatabase::new();
        let clock = Arc::new(ManualClock::new(noon()));
        let ctx = ServiceContextBuilder::new()
            .memory(&db)
            .ticket_codec(TicketCodec::new(TICKET_SECRET, LegacyWindow::closed()).unwrap())
            .session_service(SessionService::new(SESSION_SECRET, 3600, LegacyWindow::closed()).unwrap())
            .clock(clock.clone())
            .export_api_key(Some(EXPORT_KEY.to_string()))
            .build()
            .unwrap();
        Fixture { clock, ctx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_repositories() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("participant_repo"));
    }

    #[test]
    fn test_today_uses_calendar() {
        let fixture = testing::fixture();
        assert_eq!(fixture.ctx.today().to_string(), "2026-03-01");

        fixture.clock.set(
            chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 3, 1, 15, 1, 0).unwrap(),
        );
        assert_eq!(fixture.ctx.today().to_string(), "2026-03-02");
    }

    #[test]
    fn test_empty_export_key_is_unset() {
        let db = MemoryDatabase::new();
        let builder = ServiceContextBuilder::new().memory(&db).export_api_key(Some(String::new()));
        assert!(builder.export_api_key.is_none());
    }
}
