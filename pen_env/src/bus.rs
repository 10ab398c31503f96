//! Event bus wiring the engine to its external collaborators.
//!
//! All channels are unbounded: the foreground loop never blocks on a send,
//! and the scheduler is the only component that waits.
//!
//! ```text
//! Options / Scheduler ──notify──────────► display subsystem
//! Eat option ──────────consumed─────────► Scheduler
//! Eat option ──────────gain_resource────► player resource pool
//! Feed/Pickup/... ─────carry────────────► inventory subsystem
//! ```

use crate::error::EnvError;
use crate::types::{ItemTag, Notification, PenId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Sending half of every engine channel.
///
/// Cheap to clone; hand one to each producer.
#[derive(Debug, Clone)]
pub struct EventBus {
    notifications: UnboundedSender<Notification>,
    consumed: UnboundedSender<PenId>,
    resources: UnboundedSender<u32>,
    carried: UnboundedSender<ItemTag>,
}

/// Receiving half of every engine channel.
///
/// Fields are public so each receiver can be moved to its consumer.
#[derive(Debug)]
pub struct BusReceivers {
    /// Popup messages
    pub notifications: UnboundedReceiver<Notification>,
    
    /// Pens a human was eaten from (consumed by the scheduler)
    pub consumed: UnboundedReceiver<PenId>,
    
    /// Resource gains for the player pool
    pub resources: UnboundedReceiver<u32>,
    
    /// Carried-item changes for the inventory
    pub carried: UnboundedReceiver<ItemTag>,
}

impl EventBus {
    /// Creates a connected bus and its receivers.
    pub fn channel() -> (Self, BusReceivers) {
        let (notifications_tx, notifications_rx) = mpsc::unbounded_channel();
        let (consumed_tx, consumed_rx) = mpsc::unbounded_channel();
        let (resources_tx, resources_rx) = mpsc::unbounded_channel();
        let (carried_tx, carried_rx) = mpsc::unbounded_channel();
        
        let bus = Self {
            notifications: notifications_tx,
            consumed: consumed_tx,
            resources: resources_tx,
            carried: carried_tx,
        };
        let receivers = BusReceivers {
            notifications: notifications_rx,
            consumed: consumed_rx,
            resources: resources_rx,
            carried: carried_rx,
        };
        (bus, receivers)
    }
    
    /// Queues a popup message.
    pub fn notify(&self, text: impl Into<String>) -> Result<(), EnvError> {
        self.notifications
            .send(Notification::new(text))
            .map_err(|_| EnvError::closed("notifications"))
    }
    
    /// Reports that a human was eaten from `pen`.
    pub fn consumed(&self, pen: PenId) -> Result<(), EnvError> {
        self.consumed
            .send(pen)
            .map_err(|_| EnvError::closed("consumed"))
    }
    
    /// Credits the player's resource pool.
    pub fn gain_resource(&self, amount: u32) -> Result<(), EnvError> {
        self.resources
            .send(amount)
            .map_err(|_| EnvError::closed("resources"))
    }
    
    /// Announces a carried-item change.
    pub fn carry(&self, tag: ItemTag) -> Result<(), EnvError> {
        self.carried
            .send(tag)
            .map_err(|_| EnvError::closed("carried"))
    }
}

impl BusReceivers {
    /// Takes the consumption receiver for the scheduler.
    ///
    /// The field is left holding an already-closed receiver.
    pub fn take_consumed(&mut self) -> UnboundedReceiver<PenId> {
        let (_, closed) = mpsc::unbounded_channel();
        std::mem::replace(&mut self.consumed, closed)
    }
    
    /// Drains every notification currently queued.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }
    
    /// Drains every resource gain currently queued.
    pub fn drain_resources(&mut self) -> Vec<u32> {
        let mut out = Vec::new();
        while let Ok(amount) = self.resources.try_recv() {
            out.push(amount);
        }
        out
    }
    
    /// Drains every carried-item change currently queued.
    pub fn drain_carried(&mut self) -> Vec<ItemTag> {
        let mut out = Vec::new();
        while let Ok(tag) = self.carried.try_recv() {
            out.push(tag);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_bus_delivers_in_order() {
        let (bus, mut rx) = EventBus::channel();
        
        bus.notify("first").unwrap();
        bus.notify("second").unwrap();
        bus.gain_resource(50).unwrap();
        bus.carry(ItemTag::new("human")).unwrap();
        bus.carry(ItemTag::cleared()).unwrap();
        
        let texts: Vec<String> = rx.drain_notifications().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(rx.drain_resources(), vec![50]);
        assert_eq!(rx.drain_carried(), vec![ItemTag::new("human"), ItemTag::cleared()]);
    }
    
    #[test]
    fn test_bus_consumed_channel() {
        let (bus, mut rx) = EventBus::channel();
        bus.consumed(PenId::from("Pen A")).unwrap();
        
        assert_eq!(rx.consumed.try_recv().unwrap(), PenId::from("Pen A"));
    }
    
    #[test]
    fn test_take_consumed() {
        let (bus, mut rx) = EventBus::channel();
        let mut consumed = rx.take_consumed();
        bus.consumed(PenId::from("Pen B")).unwrap();
        
        assert_eq!(consumed.try_recv().unwrap(), PenId::from("Pen B"));
        assert!(rx.consumed.try_recv().is_err());
    }
    
    #[test]
    fn test_send_after_receiver_dropped() {
        let (bus, rx) = EventBus::channel();
        drop(rx);
        
        assert_eq!(bus.notify("lost"), Err(EnvError::ChannelClosed("notifications")));
        assert_eq!(bus.consumed(PenId::from("x")), Err(EnvError::ChannelClosed("consumed")));
    }
}
