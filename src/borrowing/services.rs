// src/borrowing/services.rs

use std::sync::Arc;
use tracing::{debug, info};

use super::accounting::{compute_borrow_history, compute_borrow_info, compute_borrow_standing};
use super::catalog::{demo_borrow_info, BookCatalog};
use super::models::*;
use crate::common::{Clock, LibraryResult};
use crate::members::MemberService;
use crate::storage::{load_collection_skipping_invalid, KeyValueStore, BORROW_RECORDS_KEY};

/// Reads borrow records from storage and runs the accounting for a member.
/// Read-only: nothing here writes to the store.
#[derive(Clone)]
pub struct BorrowService {
    store: Arc<dyn KeyValueStore>,
    members: MemberService,
    clock: Arc<dyn Clock>,
    policy: BorrowPolicy,
    catalog: Arc<BookCatalog>,
    demo_members: Arc<Vec<BorrowInfo>>,
}

impl BorrowService {
    pub fn new(store: Arc<dyn KeyValueStore>, members: MemberService, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            members,
            clock,
            policy: BorrowPolicy::default(),
            catalog: Arc::new(BookCatalog::default()),
            demo_members: Arc::new(Vec::new()),
        }
    }

    pub fn with_policy(mut self, policy: BorrowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_catalog(mut self, catalog: BookCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Answer for the demo accounts when their ids are not registered
    pub fn with_demo_members(mut self) -> Self {
        self.demo_members = Arc::new(demo_borrow_info());
        self
    }

    pub fn policy(&self) -> &BorrowPolicy {
        &self.policy
    }

    /// Stored records; entries that are not records at all are skipped
    pub fn borrow_records(&self) -> LibraryResult<Vec<BorrowRecord>> {
        load_collection_skipping_invalid(self.store.as_ref(), BORROW_RECORDS_KEY)
    }

    /// Borrowing figures only, for ids that may not be registered
    pub fn standing(&self, member_id: &str) -> LibraryResult<BorrowStanding> {
        let records = self.borrow_records()?;
        Ok(compute_borrow_standing(
            member_id,
            &records,
            self.clock.now(),
            &self.policy,
        ))
    }

    /// `None` when no member (or enabled demo account) has this id
    pub fn user_borrow_info(&self, member_id: &str) -> LibraryResult<Option<BorrowInfo>> {
        let member = match self.members.find_user_by_id(member_id)? {
            Some(member) => member,
            None => {
                let demo = self
                    .demo_members
                    .iter()
                    .find(|info| info.library_id == member_id)
                    .cloned();
                debug!(
                    member_id = %member_id,
                    demo = demo.is_some(),
                    "Borrow info requested for unregistered member"
                );
                return Ok(demo);
            }
        };

        let records = self.borrow_records()?;
        let info = compute_borrow_info(&member, &records, self.clock.now(), &self.policy);
        info!(
            member_id = %member_id,
            borrowed = info.current_borrowed_count,
            overdue = info.overdue_books,
            fines = info.fines,
            eligible = info.is_eligible,
            "Computed borrow info"
        );
        Ok(Some(info))
    }

    pub fn user_borrow_history(&self, member_id: &str) -> LibraryResult<Vec<HistoryEntry>> {
        let records = self.borrow_records()?;
        let history = compute_borrow_history(
            member_id,
            &records,
            self.clock.now(),
            &self.catalog,
            &self.policy,
        );
        debug!(member_id = %member_id, entries = history.len(), "Computed borrow history");
        Ok(history)
    }
}
