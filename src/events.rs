use std::sync::mpsc::{channel, Receiver, Sender};
use uuid::Uuid;

use crate::models::MonthStartDay;

/// Something a displayed summary may need to refresh for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    TransactionSaved(Uuid),
    TransactionDeleted(Uuid),
    CategorySaved(Uuid),
    CategoryDeleted(Uuid),
    MonthStartDayChanged(MonthStartDay),
}

/// Fans change events out to every subscriber.
#[derive(Default)]
pub struct ChangeBus {
    subscribers: Vec<Sender<Change>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<Change> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Never blocks; subscribers whose receiver is gone are dropped.
    pub fn publish(&mut self, change: Change) {
        tracing::trace!(?change, subscribers = self.subscribers.len(), "publishing change");
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
