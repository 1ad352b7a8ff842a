use std::fmt;

use crate::events::{Emitter, Listener};

/// Identifies a segment for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(usize);

impl SegmentId {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The contribution of a segment to the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub name: String,
    pub value: String,
}

impl QueryPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentEventKind {
    Append,
    Remove,
    Update,
    NameFocus,
    NameBlur,
    Enter,
}

/// State transitions a segment reports to its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentEvent {
    /// Attached to the visible list
    Append,
    /// Detached from the visible list
    Remove,
    /// Name or value edited; carries the new `get_value()`
    Update(Option<QueryPair>),
    NameFocus,
    NameBlur,
    /// Enter pressed in the name or value field
    Enter,
}

impl SegmentEvent {
    pub fn kind(&self) -> SegmentEventKind {
        match self {
            SegmentEvent::Append => SegmentEventKind::Append,
            SegmentEvent::Remove => SegmentEventKind::Remove,
            SegmentEvent::Update(_) => SegmentEventKind::Update,
            SegmentEvent::NameFocus => SegmentEventKind::NameFocus,
            SegmentEvent::NameBlur => SegmentEventKind::NameBlur,
            SegmentEvent::Enter => SegmentEventKind::Enter,
        }
    }
}

/// Display order of the attached segments.
#[derive(Debug, Clone, Default)]
pub struct SegmentList {
    order: Vec<SegmentId>,
}

impl SegmentList {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&mut self, id: SegmentId) {
        self.detach(id);
        self.order.push(id);
    }

    fn detach(&mut self, id: SegmentId) {
        self.order.retain(|existing| *existing != id);
    }

    #[cfg(test)]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.order.contains(&id)
    }

    pub fn ids(&self) -> &[SegmentId] {
        &self.order
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub struct Segment {
    id: SegmentId,
    name: String,
    value: String,
    active: bool,
    highlighted: bool,
    events: Emitter<SegmentEventKind, SegmentEvent>,
}

impl Segment {
    pub fn new(id: SegmentId) -> Self {
        Self {
            id,
            name: String::new(),
            value: String::new(),
            active: false,
            highlighted: false,
            events: Emitter::new(),
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn on(&mut self, kind: SegmentEventKind, callback: Listener<SegmentEvent>) -> bool {
        self.events.on(kind, callback)
    }

    #[allow(dead_code)]
    pub fn off(&mut self, kind: SegmentEventKind, callback: Option<&Listener<SegmentEvent>>) {
        self.events.off(&kind, callback);
    }

    /// Subscribe one callback to every kind of event.
    pub fn on_any(&mut self, callback: Listener<SegmentEvent>) {
        for kind in [
            SegmentEventKind::Append,
            SegmentEventKind::Remove,
            SegmentEventKind::Update,
            SegmentEventKind::NameFocus,
            SegmentEventKind::NameBlur,
            SegmentEventKind::Enter,
        ] {
            self.on(kind, callback.clone());
        }
    }

    fn emit(&self, event: SegmentEvent) {
        self.events.emit(&event.kind(), &event);
    }

    /// The pair this segment contributes, or `None` when inactive or unnamed.
    pub fn get_value(&self) -> Option<QueryPair> {
        if self.active && !self.name.is_empty() {
            Some(QueryPair::new(self.name.clone(), self.value.clone()))
        } else {
            None
        }
    }

    pub fn append_to(&mut self, list: &mut SegmentList) {
        list.attach(self.id);
        self.active = true;
        self.emit(SegmentEvent::Append);
    }

    /// Detach from `list`. Removing an inactive segment does nothing.
    pub fn remove(&mut self, list: &mut SegmentList) {
        if !self.active {
            return;
        }
        list.detach(self.id);
        self.active = false;
        self.emit(SegmentEvent::Remove);
    }

    /// Typing in the name field also re-runs the duplicate check.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.emit(SegmentEvent::Update(self.get_value()));
        self.emit(SegmentEvent::NameFocus);
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.emit(SegmentEvent::Update(self.get_value()));
    }

    /// Fill both fields without notifying observers.
    pub fn prefill(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.name = name.into();
        self.value = value.into();
    }

    pub fn focus_name(&self) {
        self.emit(SegmentEvent::NameFocus);
    }

    pub fn blur_name(&self) {
        self.emit(SegmentEvent::NameBlur);
    }

    pub fn press_enter(&self) {
        self.emit(SegmentEvent::Enter);
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("value", &self.value)
            .field("active", &self.active)
            .field("highlighted", &self.highlighted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(segment: &mut Segment) -> Rc<RefCell<Vec<SegmentEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        segment.on_any(Rc::new(move |event: &SegmentEvent| {
            sink.borrow_mut().push(event.clone())
        }));
        log
    }

    #[test]
    fn test_get_value_requires_active_and_name() {
        let mut list = SegmentList::new();
        let mut segment = Segment::new(SegmentId::new(1));
        segment.prefill("a", "1");
        assert_eq!(segment.get_value(), None);

        segment.append_to(&mut list);
        assert_eq!(segment.get_value(), Some(QueryPair::new("a", "1")));

        segment.prefill("", "1");
        assert_eq!(segment.get_value(), None);
    }

    #[test]
    fn test_append_and_remove_emit_and_track_list() {
        let mut list = SegmentList::new();
        let mut segment = Segment::new(SegmentId::new(3));
        let log = recording(&mut segment);

        segment.append_to(&mut list);
        assert!(segment.is_active());
        assert!(list.contains(SegmentId::new(3)));

        segment.remove(&mut list);
        assert!(!segment.is_active());
        assert!(list.is_empty());

        assert_eq!(*log.borrow(), vec![SegmentEvent::Append, SegmentEvent::Remove]);
    }

    #[test]
    fn test_remove_inactive_is_noop() {
        let mut list = SegmentList::new();
        let mut segment = Segment::new(SegmentId::new(1));
        let log = recording(&mut segment);

        segment.remove(&mut list);
        segment.append_to(&mut list);
        segment.remove(&mut list);
        segment.remove(&mut list);

        assert_eq!(*log.borrow(), vec![SegmentEvent::Append, SegmentEvent::Remove]);
    }

    #[test]
    fn test_append_twice_keeps_single_entry() {
        let mut list = SegmentList::new();
        let mut first = Segment::new(SegmentId::new(1));
        let mut second = Segment::new(SegmentId::new(2));
        first.append_to(&mut list);
        second.append_to(&mut list);
        first.append_to(&mut list);

        assert_eq!(list.ids(), &[SegmentId::new(2), SegmentId::new(1)]);
    }

    #[test]
    fn test_set_name_emits_update_then_focus() {
        let mut list = SegmentList::new();
        let mut segment = Segment::new(SegmentId::new(1));
        segment.append_to(&mut list);
        let log = recording(&mut segment);

        segment.set_name("q");
        segment.set_value("rust");

        assert_eq!(
            *log.borrow(),
            vec![
                SegmentEvent::Update(Some(QueryPair::new("q", ""))),
                SegmentEvent::NameFocus,
                SegmentEvent::Update(Some(QueryPair::new("q", "rust"))),
            ]
        );
    }

    #[test]
    fn test_prefill_is_silent() {
        let mut segment = Segment::new(SegmentId::new(1));
        let log = recording(&mut segment);
        segment.prefill("a", "b");
        assert!(log.borrow().is_empty());
        assert_eq!(segment.name(), "a");
        assert_eq!(segment.value(), "b");
    }

    #[test]
    fn test_off_stops_delivery() {
        let mut segment = Segment::new(SegmentId::new(1));
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let callback: Listener<SegmentEvent> =
            Rc::new(move |_: &SegmentEvent| *counter.borrow_mut() += 1);
        segment.on(SegmentEventKind::Enter, callback.clone());

        segment.press_enter();
        segment.off(SegmentEventKind::Enter, Some(&callback));
        segment.press_enter();

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_focus_blur_enter_events() {
        let mut segment = Segment::new(SegmentId::new(1));
        let log = recording(&mut segment);
        segment.focus_name();
        segment.blur_name();
        segment.press_enter();
        assert_eq!(
            *log.borrow(),
            vec![SegmentEvent::NameFocus, SegmentEvent::NameBlur, SegmentEvent::Enter]
        );
    }
}
