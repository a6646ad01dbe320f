// Service wiring shared by every entry point

use std::sync::Arc;
use tracing::info;

use super::clock::{Clock, SystemClock};
use super::config::LibraryConfig;
use crate::auth::{AuthService, PasswordRecovery};
use crate::borrowing::BorrowService;
use crate::dashboard::DashboardService;
use crate::members::MemberService;
use crate::storage::{JsonFileStore, KeyValueStore};

/// Store, clock and services built from one configuration
#[derive(Clone)]
pub struct LibraryState {
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub members: MemberService,
    pub borrowing: BorrowService,
    pub auth: AuthService,
}

impl LibraryState {
    /// File-backed state at `config.storage_path`, on the system clock
    pub fn open(config: &LibraryConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.storage_path));
        info!(path = %config.storage_path.display(), "Opening library storage");
        Self::with_store(store, Arc::new(SystemClock), config)
    }

    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &LibraryConfig,
    ) -> Self {
        let members =
            MemberService::new(store.clone(), clock.clone()).with_min_age(config.min_member_age);
        let mut borrowing = BorrowService::new(store.clone(), members.clone(), clock.clone())
            .with_policy(config.borrow_policy);
        if config.demo_members {
            borrowing = borrowing.with_demo_members();
        }
        let auth = AuthService::new(store.clone(), members.clone(), clock.clone());

        Self {
            store,
            clock,
            members,
            borrowing,
            auth,
        }
    }

    /// A dashboard following this state's session
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.auth.clone(), self.borrowing.clone())
    }

    pub fn password_recovery(&self) -> PasswordRecovery {
        PasswordRecovery::new(self.members.clone())
    }
}
