pub mod dashboard;
pub mod error;
pub mod roles;
pub mod roster;
pub mod session;
pub mod store;

pub use dashboard::Dashboard;
pub use error::StoreError;
pub use roles::CapabilityTier;
pub use roster::{filter_pets, stat_percentage, stat_value, PopulationStats};
pub use session::{
    LogoutReason, Navigator, NoopNavigator, Session, SessionEvent, SessionManager,
    SessionSnapshot, SessionState,
};
pub use store::{CredentialStore, FileKv, KeyValueStore, KvCredentialStore, MemoryKv};
