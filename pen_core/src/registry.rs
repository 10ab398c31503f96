//! The pen registry and per-pen handles.
//!
//! The registry is built once at startup and never gains or loses pens.
//! Each pen lives behind its own mutex inside a `PenHandle`; the scheduler
//! and the foreground option layer both go through the handle, so every
//! change to a pen's population is serialized on that pen's lock.

use crate::config::PensConfig;
use crate::enclosure::Enclosure;
use crate::error::PenError;
use pen_env::{EventBus, PenContext, PenId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Shared, lock-protected access to one enclosure.
#[derive(Debug, Clone)]
pub struct PenHandle {
    id: PenId,
    inner: Arc<Mutex<Enclosure>>,
}

impl PenHandle {
    /// Wraps an enclosure.
    pub fn new(enclosure: Enclosure) -> Self {
        Self {
            id: enclosure.id().clone(),
            inner: Arc::new(Mutex::new(enclosure)),
        }
    }

    /// Returns the pen identifier without locking.
    pub fn id(&self) -> &PenId {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, Enclosure> {
        // A panic while holding the lock cannot leave the counters
        // half-written, so a poisoned pen is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the enclosure.
    ///
    /// Keep `f` short and synchronous; never `.await` inside it.
    pub fn with<R>(&self, f: impl FnOnce(&mut Enclosure) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn population(&self) -> usize {
        self.lock().population()
    }

    pub fn food(&self) -> u32 {
        self.lock().food()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    pub fn set_active(&self, active: bool) {
        self.lock().set_active(active);
    }

    /// Returns a copy of the enclosure's current state.
    pub fn snapshot(&self) -> Enclosure {
        self.lock().clone()
    }

    /// Per-frame update driven by the render loop.
    ///
    /// Ages the humans and rolls for breeding; a birth is announced on the bus.
    /// Returns `true` if a human was born.
    pub fn update<C: PenContext + ?Sized>(
        &self,
        dt: f64,
        ctx: &C,
        breeding_odds: u32,
        bus: &EventBus,
    ) -> bool {
        let bred = self.with(|pen| pen.update(dt, ctx, breeding_odds));
        if bred {
            info!(pen = %self.id, "humans bred");
            if let Err(e) = bus.notify(format!("Humans in {} have made a baby", self.id)) {
                warn!("dropped breeding notification: {e}");
            }
        }
        bred
    }
}

/// The fixed set of pens, keyed by title.
///
/// Cloning is cheap and every clone sees the same pens.
#[derive(Debug, Clone)]
pub struct Registry {
    pens: Arc<BTreeMap<PenId, PenHandle>>,
}

impl Registry {
    /// Builds a registry from enclosures.
    ///
    /// # Errors
    /// `PenError::DuplicatePen` if two enclosures share a title.
    pub fn new(enclosures: impl IntoIterator<Item = Enclosure>) -> Result<Self, PenError> {
        let mut pens = BTreeMap::new();
        for enclosure in enclosures {
            let handle = PenHandle::new(enclosure);
            let id = handle.id().clone();
            if pens.insert(id.clone(), handle).is_some() {
                return Err(PenError::DuplicatePen(id));
            }
        }
        Ok(Self {
            pens: Arc::new(pens),
        })
    }

    /// Builds the registry described by a configuration.
    pub fn from_config(config: &PensConfig) -> Result<Self, PenError> {
        config.validate()?;
        Self::new(config.pens.iter().map(|spec| spec.build()))
    }

    /// Looks up a pen.
    pub fn get(&self, id: &PenId) -> Result<&PenHandle, PenError> {
        self.pens
            .get(id)
            .ok_or_else(|| PenError::UnknownPen(id.clone()))
    }

    /// Iterates pens in title order.
    pub fn iter(&self) -> impl Iterator<Item = &PenHandle> {
        self.pens.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PenId> {
        self.pens.keys()
    }

    pub fn len(&self) -> usize {
        self.pens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pens.is_empty()
    }

    /// Sum of every pen's population.
    ///
    /// Pens are locked one at a time, so under concurrent mutation this is
    /// a best-effort total.
    pub fn total_population(&self) -> usize {
        self.iter().map(PenHandle::population).sum()
    }

    /// The pen the player is interacting with, if any.
    pub fn active_pen(&self) -> Option<&PenHandle> {
        self.iter().find(|pen| pen.is_active())
    }

    /// Makes `id` the only active pen.
    pub fn activate(&self, id: &PenId) -> Result<&PenHandle, PenError> {
        let target = self.get(id)?;
        for pen in self.iter() {
            pen.set_active(pen.id() == id);
        }
        Ok(target)
    }

    /// Clears the active flag on every pen.
    pub fn deactivate_all(&self) {
        for pen in self.iter() {
            pen.set_active(false);
        }
    }

    /// Runs the per-frame update on every pen. Returns the number of births.
    pub fn update_all<C: PenContext + ?Sized>(
        &self,
        dt: f64,
        ctx: &C,
        breeding_odds: u32,
        bus: &EventBus,
    ) -> usize {
        self.iter()
            .filter(|pen| pen.update(dt, ctx, breeding_odds, bus))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enclosure::Rect;
    use pen_env::SimContext;

    fn registry() -> Registry {
        Registry::new(vec![
            Enclosure::stocked("Pen B", Rect::default(), 2, 0),
            Enclosure::stocked("Pen A", Rect::default(), 3, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_registry_lookup() {
        let reg = registry();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(&PenId::from("Pen A")).unwrap().population(), 3);
        assert!(matches!(
            reg.get(&PenId::from("Pen Z")),
            Err(PenError::UnknownPen(_))
        ));
    }

    #[test]
    fn test_registry_iterates_in_title_order() {
        let reg = registry();
        let ids: Vec<&str> = reg.ids().map(PenId::as_str).collect();
        assert_eq!(ids, vec!["Pen A", "Pen B"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = Registry::new(vec![
            Enclosure::new("Same", Rect::default()),
            Enclosure::new("Same", Rect::default()),
        ])
        .unwrap_err();
        assert!(matches!(err, PenError::DuplicatePen(_)));
    }

    #[test]
    fn test_clones_share_pens() {
        let reg = registry();
        let other = reg.clone();
        other
            .get(&PenId::from("Pen A"))
            .unwrap()
            .with(|pen| {
                pen.add_human();
            });

        assert_eq!(reg.total_population(), 6);
    }

    #[test]
    fn test_activation_is_exclusive() {
        let reg = registry();
        assert!(reg.active_pen().is_none());

        reg.activate(&PenId::from("Pen A")).unwrap();
        reg.activate(&PenId::from("Pen B")).unwrap();
        let active: Vec<&PenId> = reg.iter().filter(|p| p.is_active()).map(|p| p.id()).collect();
        assert_eq!(active, vec![&PenId::from("Pen B")]);

        reg.deactivate_all();
        assert!(reg.active_pen().is_none());
        assert!(reg.activate(&PenId::from("nope")).is_err());
    }

    #[test]
    fn test_from_default_config() {
        let reg = Registry::from_config(&PensConfig::default()).unwrap();
        assert_eq!(reg.total_population(), 5);
    }

    #[test]
    fn test_update_all_announces_births() {
        let reg = registry();
        let ctx = SimContext::new(3);
        let (bus, mut rx) = EventBus::channel();

        let births = reg.update_all(0.016, &ctx, 1, &bus);
        assert_eq!(births, 2);
        assert_eq!(reg.total_population(), 7);

        let texts: Vec<String> = rx.drain_notifications().into_iter().map(|n| n.text).collect();
        assert_eq!(
            texts,
            vec!["Humans in Pen A have made a baby", "Humans in Pen B have made a baby"]
        );
    }
}
