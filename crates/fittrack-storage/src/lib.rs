//! FitTrack SQLite 저장소 크레이트.
//!
//! `fittrack-core`의 저장소 포트(`UserStore`, `ActivityStore`)를
//! rusqlite 기반으로 구현한다. 스키마는 버전 기반 마이그레이션으로 관리.

pub mod migration;
pub mod sqlite;

pub use sqlite::SqliteStorage;
