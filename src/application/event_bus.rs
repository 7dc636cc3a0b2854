//! Typed subscription table owned by the coordinator.
//!
//! Producers hand events straight to the coordinator; nothing is queued.
//! The bus only decides whether a kind is routed and counts deliveries.

use crate::domain::EventKind;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("{0} is already subscribed")]
    AlreadySubscribed(EventKind),
}

#[derive(Debug, Default)]
pub struct EventBus {
    /// Subscribed kinds and the number of events delivered for each.
    deliveries: BTreeMap<EventKind, u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind) -> Result<(), SubscriptionError> {
        if self.deliveries.contains_key(&kind) {
            return Err(SubscriptionError::AlreadySubscribed(kind));
        }
        self.deliveries.insert(kind, 0);
        Ok(())
    }

    /// Subscribes every kind at once; fails without changes if any is taken.
    pub fn subscribe_all(&mut self, kinds: &[EventKind]) -> Result<(), SubscriptionError> {
        if let Some(kind) = kinds.iter().find(|kind| self.is_subscribed(**kind)) {
            return Err(SubscriptionError::AlreadySubscribed(*kind));
        }
        for kind in kinds {
            self.subscribe(*kind)?;
        }
        Ok(())
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.deliveries.contains_key(&kind)
    }

    /// Records a delivery; returns false when nobody listens for `kind`.
    pub fn record_delivery(&mut self, kind: EventKind) -> bool {
        match self.deliveries.get_mut(&kind) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn delivered(&self, kind: EventKind) -> u64 {
        self.deliveries.get(&kind).copied().unwrap_or(0)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.deliveries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribed_kind_is_not_delivered() {
        let mut bus = EventBus::new();
        assert!(!bus.record_delivery(EventKind::Navigate));
        assert_eq!(bus.delivered(EventKind::Navigate), 0);
    }

    #[test]
    fn test_deliveries_are_counted_per_kind() {
        let mut bus = EventBus::new();
        bus.subscribe_all(&EventKind::ALL).unwrap();
        assert!(bus.record_delivery(EventKind::AddToCart));
        assert!(bus.record_delivery(EventKind::AddToCart));
        assert!(bus.record_delivery(EventKind::ClearCart));

        assert_eq!(bus.delivered(EventKind::AddToCart), 2);
        assert_eq!(bus.delivered(EventKind::ClearCart), 1);
        assert_eq!(bus.delivered(EventKind::Navigate), 0);
        assert_eq!(bus.subscriptions().count(), 5);
    }

    #[test]
    fn test_subscription_is_one_time() {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::ClearCart).unwrap();
        assert_eq!(
            bus.subscribe_all(&EventKind::ALL),
            Err(SubscriptionError::AlreadySubscribed(EventKind::ClearCart))
        );
        // Nothing else was registered by the failed call.
        assert!(!bus.is_subscribed(EventKind::Navigate));
    }
}
