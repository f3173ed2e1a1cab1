use crate::handle::ButtonHandle;
use crate::types::PinId;
use heapless::Vec;

/// Fixed-capacity map from pin to [`ButtonHandle`].
///
/// At most one handle per pin. Lookup is a linear scan, which is the
/// fastest option for the handful of buttons a board carries.
///
/// # Type Parameters
/// * `'a` - Lifetime of the observers referenced by the stored configs
/// * `N` - Maximum number of buttons
pub struct Registry<'a, const N: usize> {
    handles: Vec<ButtonHandle<'a>, N>,
}

impl<'a, const N: usize> Registry<'a, N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Inserts a handle.
    ///
    /// The handle is returned unchanged if its pin is already present or the
    /// registry is full; an existing entry is never overwritten.
    pub fn insert(&mut self, handle: ButtonHandle<'a>) -> Result<(), ButtonHandle<'a>> {
        if self.contains(handle.pin()) {
            return Err(handle);
        }
        self.handles.push(handle)
    }

    /// Removes and returns the handle for `pin`.
    pub fn remove(&mut self, pin: PinId) -> Option<ButtonHandle<'a>> {
        let idx = self.position(pin)?;
        Some(self.handles.swap_remove(idx))
    }

    pub fn get(&self, pin: PinId) -> Option<&ButtonHandle<'a>> {
        self.handles.iter().find(|h| h.pin() == pin)
    }

    pub fn get_mut(&mut self, pin: PinId) -> Option<&mut ButtonHandle<'a>> {
        self.handles.iter_mut().find(|h| h.pin() == pin)
    }

    pub fn contains(&self, pin: PinId) -> bool {
        self.position(pin).is_some()
    }

    /// Iterates over the registered handles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ButtonHandle<'a>> {
        self.handles.iter()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.handles.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    fn position(&self, pin: PinId) -> Option<usize> {
        self.handles.iter().position(|h| h.pin() == pin)
    }
}

impl<const N: usize> Default for Registry<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonConfig;
    use crate::time::Tick;
    use crate::types::{ButtonEvent, Level};

    fn ignore(_pin: PinId, _event: ButtonEvent) {}

    fn handle(pin: u8) -> ButtonHandle<'static> {
        ButtonHandle::new(ButtonConfig::new(PinId(pin), &ignore))
    }

    #[test]
    fn can_insert_and_look_up() {
        let mut registry = Registry::<4>::new();
        assert!(registry.is_empty());

        registry.insert(handle(0)).unwrap();
        registry.insert(handle(12)).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(PinId(0)));
        assert!(registry.contains(PinId(12)));
        assert!(!registry.contains(PinId(1)));
        assert_eq!(registry.get(PinId(12)).map(|h| h.pin()), Some(PinId(12)));
    }

    #[test]
    fn rejects_duplicate_pin_without_overwriting() {
        let mut registry = Registry::<4>::new();
        registry.insert(handle(7)).unwrap();
        registry
            .get_mut(PinId(7))
            .unwrap()
            .record_edge(Tick(42));

        let rejected = registry.insert(handle(7));
        assert!(rejected.is_err());

        let kept = registry.get(PinId(7)).unwrap();
        assert_eq!(kept.press_timestamp(), Some(Tick(42)));
        assert_eq!(kept.current_trigger(), Level::High);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_insert_when_full() {
        let mut registry = Registry::<2>::new();
        registry.insert(handle(0)).unwrap();
        registry.insert(handle(1)).unwrap();
        assert!(registry.is_full());
        assert!(registry.insert(handle(2)).is_err());
    }

    #[test]
    fn remove_leaves_other_pins_alone() {
        let mut registry = Registry::<4>::new();
        registry.insert(handle(0)).unwrap();
        registry.insert(handle(1)).unwrap();
        registry.insert(handle(2)).unwrap();

        assert!(registry.remove(PinId(0)).is_some());
        assert!(registry.remove(PinId(0)).is_none());
        assert!(registry.contains(PinId(1)));
        assert!(registry.contains(PinId(2)));
        assert_eq!(registry.len(), 2);
    }
}
