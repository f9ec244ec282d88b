//! # attend-db
//!
//! Storage layer implementing the repository traits of `attend-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx (connection pool, `FromRow` models,
//!   entity ↔ model mappers, bundled migrations)
//! - In-memory repositories sharing one [`memory::MemoryDatabase`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attend_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use attend_db::repositories::PgAttendanceRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let attendance = PgAttendanceRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{
    MemoryAttendanceRepository, MemoryDatabase, MemoryMembershipRepository,
    MemoryParticipantRepository, MemoryRoleMappingRepository, MemorySystemConfigRepository,
    MemoryUnitRepository,
};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAttendanceRepository, PgMembershipRepository, PgParticipantRepository,
    PgRoleMappingRepository, PgSystemConfigRepository, PgUnitRepository,
};
