//! Process-local store implementing every repository port.
//!
//! All collections sit behind one mutex, so multi-record writes (settlement,
//! rider approval) are applied as a unit exactly like the database
//! transactions in `persistence`. Used by tests and by `in_memory` runs.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    ParcelRepository, ParcelRepositoryError, PaymentRepository, PaymentRepositoryError,
    RiderRepository, RiderRepositoryError, RiderStatusChange, RiderStatusWrite, SettlementWrite,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    DeleteOutcome, EmailAddress, InsertOutcome, Parcel, ParcelId, Payment, Rider, RiderStatus,
    TransactionId, UpdateOutcome, User, UserRole,
};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    parcels: Vec<Parcel>,
    payments: Vec<Payment>,
    riders: Vec<Rider>,
}

/// In-memory implementation of the parcel, payment, user and rider ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first; among equal keys the later insert wins.
fn newest_first<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

#[async_trait]
impl ParcelRepository for InMemoryStore {
    async fn insert(&self, parcel: &Parcel) -> Result<InsertOutcome, ParcelRepositoryError> {
        self.lock().parcels.push(parcel.clone());
        Ok(InsertOutcome::new(parcel.id()))
    }

    async fn find_by_id(&self, id: &ParcelId) -> Result<Option<Parcel>, ParcelRepositoryError> {
        Ok(self
            .lock()
            .parcels
            .iter()
            .find(|parcel| parcel.id() == *id)
            .cloned())
    }

    async fn list(
        &self,
        sender: Option<EmailAddress>,
    ) -> Result<Vec<Parcel>, ParcelRepositoryError> {
        let guard = self.lock();
        let matching: Vec<Parcel> = guard
            .parcels
            .iter()
            .filter(|parcel| sender.as_ref().is_none_or(|s| parcel.sender_email() == s))
            .cloned()
            .collect();
        Ok(newest_first(&matching, Parcel::created_at))
    }

    async fn delete(&self, id: &ParcelId) -> Result<DeleteOutcome, ParcelRepositoryError> {
        let mut guard = self.lock();
        let before = guard.parcels.len();
        guard.parcels.retain(|parcel| parcel.id() != *id);
        Ok(DeleteOutcome {
            deleted_count: (before - guard.parcels.len()) as u64,
        })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        Ok(self
            .lock()
            .payments
            .iter()
            .find(|payment| payment.transaction_id == *transaction_id)
            .cloned())
    }

    async fn record_settlement(
        &self,
        payment: &Payment,
    ) -> Result<SettlementWrite, PaymentRepositoryError> {
        let mut guard = self.lock();
        if guard
            .payments
            .iter()
            .any(|stored| stored.transaction_id == payment.transaction_id)
        {
            return Err(PaymentRepositoryError::duplicate_transaction(
                payment.transaction_id.to_string(),
            ));
        }

        let (parcel_update, tracking_id) = match guard
            .parcels
            .iter_mut()
            .find(|parcel| parcel.id() == payment.parcel_id)
        {
            Some(parcel) => {
                let modified = parcel.mark_paid(&payment.tracking_id);
                let tracking_id = parcel
                    .tracking_id()
                    .cloned()
                    .unwrap_or_else(|| payment.tracking_id.clone());
                (UpdateOutcome::matched(modified), tracking_id)
            }
            None => (UpdateOutcome::UNMATCHED, payment.tracking_id.clone()),
        };

        let stored = payment.clone().with_tracking_id(tracking_id);
        guard.payments.push(stored.clone());
        Ok(SettlementWrite {
            parcel_update,
            payment_insert: InsertOutcome::new(stored.id),
            payment: stored,
        })
    }

    async fn list(
        &self,
        customer: Option<EmailAddress>,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let guard = self.lock();
        let matching: Vec<Payment> = guard
            .payments
            .iter()
            .filter(|payment| {
                customer
                    .as_ref()
                    .is_none_or(|c| payment.customer_email.as_ref() == Some(c))
            })
            .cloned()
            .collect();
        Ok(newest_first(&matching, |payment| payment.paid_at))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<InsertOutcome, UserPersistenceError> {
        let mut guard = self.lock();
        if guard.users.iter().any(|stored| stored.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().to_string()));
        }
        guard.users.push(user.clone());
        Ok(InsertOutcome::new(user.id()))
    }
}

#[async_trait]
impl RiderRepository for InMemoryStore {
    async fn insert(&self, rider: &Rider) -> Result<InsertOutcome, RiderRepositoryError> {
        self.lock().riders.push(rider.clone());
        Ok(InsertOutcome::new(rider.id()))
    }

    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError> {
        let guard = self.lock();
        let matching: Vec<Rider> = guard
            .riders
            .iter()
            .filter(|rider| status.is_none_or(|s| rider.status() == s))
            .cloned()
            .collect();
        Ok(newest_first(&matching, Rider::created_at))
    }

    async fn apply_status(
        &self,
        change: &RiderStatusChange,
    ) -> Result<RiderStatusWrite, RiderRepositoryError> {
        let mut guard = self.lock();
        let Some(rider) = guard
            .riders
            .iter_mut()
            .find(|rider| rider.id() == change.rider_id)
        else {
            return Ok(RiderStatusWrite {
                rider_update: UpdateOutcome::UNMATCHED,
                promotion: None,
            });
        };
        if !rider.status().allows_transition_to(change.status) {
            return Err(RiderRepositoryError::invalid_transition(
                rider.status().as_str(),
                change.status.as_str(),
            ));
        }
        let rider_update = UpdateOutcome::matched(rider.set_status(change.status));

        let promotion = change.promote.as_ref().map(|email| {
            guard
                .users
                .iter_mut()
                .find(|user| user.email() == email)
                .map_or(UpdateOutcome::UNMATCHED, |user| {
                    UpdateOutcome::matched(user.set_role(UserRole::Rider))
                })
        });
        Ok(RiderStatusWrite {
            rider_update,
            promotion,
        })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
