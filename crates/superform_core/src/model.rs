//! The shape parameter model
//!
//! `ShapeModel` exclusively owns the two parameter sets, the morph
//! coefficients and the rendering state. External editors mutate it only
//! through [`ShapeModel::set`]; readers either take a [`ShapeSnapshot`] copy
//! each frame or subscribe for change notifications.
//!
//! Subscriptions follow a prime-then-notify contract: a new listener is
//! called once immediately with the current snapshot, then once after every
//! successful mutation. Notifications are synchronous and never debounced.

use crate::fields::{self, FieldKind, FieldValue, FIELDS};
use crate::params::FieldSlot;
use crate::{DrawMode, ModelError, ShapeSnapshot};

/// Handle returned by [`ShapeModel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ShapeSnapshot)>;

/// Owned parameter model with change subscriptions
pub struct ShapeModel {
    snapshot: ShapeSnapshot,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Default for ShapeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeModel {
    /// Create a model holding the default parameters
    pub fn new() -> Self {
        Self {
            snapshot: ShapeSnapshot::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a model seeded from `initial`.
    ///
    /// Every field goes through the same clamping as [`ShapeModel::set`].
    pub fn from_snapshot(initial: &ShapeSnapshot) -> Result<Self, ModelError> {
        let mut model = Self::new();
        model.apply(initial)?;
        Ok(model)
    }

    /// Create a model and register `listener`, which is primed with the
    /// initial snapshot before this returns.
    pub fn with_listener<F>(initial: &ShapeSnapshot, listener: F) -> Result<Self, ModelError>
    where
        F: FnMut(&ShapeSnapshot) + 'static,
    {
        let mut model = Self::from_snapshot(initial)?;
        model.subscribe(listener);
        Ok(model)
    }

    /// Current values
    #[inline]
    pub fn snapshot(&self) -> &ShapeSnapshot {
        &self.snapshot
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.snapshot.rendering.draw_mode
    }

    #[inline]
    pub fn auto_rotate(&self) -> bool {
        self.snapshot.rendering.auto_rotate
    }

    /// Read a field by dotted path
    pub fn get(&self, path: &str) -> Result<FieldValue, ModelError> {
        self.snapshot
            .get(path)
            .ok_or_else(|| ModelError::UnknownField(path.to_string()))
    }

    /// Write a field by dotted path and notify subscribers.
    ///
    /// Numeric input is clamped to the field's declared range rather than
    /// rejected. Returns the value actually stored.
    ///
    /// # Errors
    /// Unknown paths, values of the wrong kind, non-finite numbers and
    /// unknown draw modes. The model is unchanged on error.
    pub fn set(
        &mut self,
        path: &str,
        value: impl Into<FieldValue>,
    ) -> Result<FieldValue, ModelError> {
        let stored = write_field(&mut self.snapshot, path, value.into())?;
        log::debug!("{} = {}", path, stored);
        self.notify();
        Ok(stored)
    }

    /// Overwrite every field from `source` as a single mutation.
    ///
    /// Either all fields are written or none are; subscribers are notified
    /// once.
    pub fn apply(&mut self, source: &ShapeSnapshot) -> Result<(), ModelError> {
        let mut next = self.snapshot;
        for spec in FIELDS {
            let value = source
                .get(spec.path)
                .ok_or_else(|| ModelError::UnknownField(spec.path.to_string()))?;
            write_field(&mut next, spec.path, value)?;
        }
        self.snapshot = next;
        self.notify();
        Ok(())
    }

    /// Register a change listener.
    ///
    /// The listener is invoked immediately with the current snapshot, then
    /// after every successful mutation.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&ShapeSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        listener(&self.snapshot);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.snapshot);
        }
    }
}

/// Validate, clamp and store one field. Nothing is written on error.
fn write_field(
    snapshot: &mut ShapeSnapshot,
    path: &str,
    value: FieldValue,
) -> Result<FieldValue, ModelError> {
    let spec = fields::field(path).ok_or_else(|| ModelError::UnknownField(path.to_string()))?;
    let slot = snapshot
        .slot(path)
        .ok_or_else(|| ModelError::UnknownField(path.to_string()))?;

    let mismatch = || ModelError::TypeMismatch {
        path: path.to_string(),
        expected: spec.kind.expected(),
    };
    let non_finite = || ModelError::NonFinite {
        path: path.to_string(),
    };

    match (slot, value) {
        (FieldSlot::Bool(target), FieldValue::Bool(v)) => {
            *target = v;
            Ok(FieldValue::Bool(v))
        }
        (FieldSlot::Number(target), FieldValue::Number(v)) => {
            if !v.is_finite() {
                return Err(non_finite());
            }
            let clamped = spec.kind.clamp(v);
            *target = clamped;
            Ok(FieldValue::Number(clamped))
        }
        (FieldSlot::Color(target), FieldValue::Color(rgb)) => {
            if rgb.iter().any(|c| !c.is_finite()) {
                return Err(non_finite());
            }
            let clamped = FieldKind::Color.clamp_color(rgb);
            *target = clamped;
            Ok(FieldValue::Color(clamped))
        }
        (FieldSlot::Mode(target), FieldValue::Choice(name)) => {
            let mode: DrawMode = name.parse()?;
            *target = mode;
            Ok(FieldValue::from(mode))
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_primes_listener() {
        let mut model = ShapeModel::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        model.subscribe(move |s| sink.borrow_mut().push(s.shape_a.m));
        assert_eq!(*calls.borrow(), vec![3.0]);
    }

    #[test]
    fn test_with_listener_primes_once() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let model = ShapeModel::with_listener(&ShapeSnapshot::default(), move |_| {
            *sink.borrow_mut() += 1;
        })
        .unwrap();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(model.listener_count(), 1);
    }

    #[test]
    fn test_set_notifies_after_write() {
        let mut model = ShapeModel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        model.subscribe(move |s| sink.borrow_mut().push(s.shape_b.n1));

        model.set("shape_b.n1", 12.0f32).unwrap();
        model.set("shape_b.n1", 13.0f32).unwrap();
        assert_eq!(*seen.borrow(), vec![1.0, 12.0, 13.0]);
    }

    #[test]
    fn test_failed_set_does_not_notify() {
        let mut model = ShapeModel::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        model.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(model.set("rendering.draw_mode", "quads").is_err());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut model = ShapeModel::new();
        let id = model.subscribe(|_| {});
        assert!(model.unsubscribe(id));
        assert!(!model.unsubscribe(id));
        assert_eq!(model.listener_count(), 0);
    }

    #[test]
    fn test_set_returns_stored_value() {
        let mut model = ShapeModel::new();
        assert_eq!(model.set("shape_a.m", 7.4f32).unwrap(), FieldValue::Number(7.0));
        assert_eq!(
            model.set("rendering.draw_mode", "Line strip").unwrap(),
            FieldValue::Choice("line_strip".to_string())
        );
        assert_eq!(model.draw_mode(), DrawMode::LineStrip);
    }

    #[test]
    fn test_type_mismatch() {
        let mut model = ShapeModel::new();
        let err = model.set("rendering.auto_rotate", 1.0f32).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
        assert!(model.auto_rotate());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut model = ShapeModel::new();
        assert!(matches!(
            model.set("shape_a.n2", f32::NAN),
            Err(ModelError::NonFinite { .. })
        ));
        assert!(model.set("rendering.color", [f32::INFINITY, 0.0, 0.0]).is_err());
        assert_eq!(model.snapshot().shape_a.n2, 18.0);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut model = ShapeModel::new();
        let mut source = ShapeSnapshot::default();
        source.shape_a.m = 9.0;
        source.shape_b.n1 = f32::NAN;

        assert!(model.apply(&source).is_err());
        assert_eq!(model.snapshot().shape_a.m, 3.0);
    }

    #[test]
    fn test_from_snapshot_clamps() {
        let mut source = ShapeSnapshot::default();
        source.shape_a.scale = 9.0;
        source.morph.shape = -1.0;
        source.rendering.background = [300.0, -5.0, 10.0];

        let model = ShapeModel::from_snapshot(&source).unwrap();
        assert_eq!(model.snapshot().shape_a.scale, 2.0);
        assert_eq!(model.snapshot().morph.shape, 0.0);
        assert_eq!(model.snapshot().rendering.background, [255.0, 0.0, 10.0]);
    }
}
