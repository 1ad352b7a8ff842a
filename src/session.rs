//! The builder session: owns every piece of builder state and keeps the
//! computed result in step with it.
//!
//! Segment operations emit [`SegmentEvent`]s into a mailbox shared with the
//! session. After each operation the session drains the mailbox and reacts:
//! collection membership, duplicate highlighting, removal of unnamed
//! segments on blur, Enter-to-add, and recomputing the display.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::collection::SegmentCollection;
use crate::config::Config;
use crate::display::{compute_result, ComputedResult};
use crate::location::PageAddress;
use crate::parser::decompose;
use crate::segment::{QueryPair, Segment, SegmentEvent, SegmentId, SegmentList};

type Mailbox = Rc<RefCell<VecDeque<(SegmentId, SegmentEvent)>>>;

pub struct BuilderSession {
    base: String,
    segments: HashMap<SegmentId, Segment>,
    list: SegmentList,
    collection: SegmentCollection,
    next_id: usize,
    result: ComputedResult,
    address: PageAddress,
    mailbox: Mailbox,
    focus_request: Option<SegmentId>,
}

impl BuilderSession {
    /// An empty session. The address is only written, never read.
    pub fn new(address: PageAddress) -> Self {
        Self {
            base: String::new(),
            segments: HashMap::new(),
            list: SegmentList::new(),
            collection: SegmentCollection::new(),
            next_id: 0,
            result: ComputedResult::Blank,
            address,
            mailbox: Rc::new(RefCell::new(VecDeque::new())),
            focus_request: None,
        }
    }

    /// Build the startup session: load the deep link (or the configured
    /// base) and decompose it once.
    pub fn from_config(config: &Config) -> Self {
        let address = PageAddress::parse_or_default(&config.page_address);
        let base = address.deep_link().or_else(|| config.initial_base.clone());

        let mut session = Self::new(address);
        if let Some(base) = base {
            log::info!("Loading initial base: {}", base);
            session.base = base;
        }
        session.parse_base();
        session
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = base.into();
        self.update_display();
    }

    pub fn result(&self) -> &ComputedResult {
        &self.result
    }

    pub fn page_address(&self) -> &PageAddress {
        &self.address
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    /// Attached segments in display order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.list.ids().iter().filter_map(|id| self.segments.get(id))
    }

    /// The segment whose name field should receive focus, if one was just created.
    pub fn take_focus_request(&mut self) -> Option<SegmentId> {
        self.focus_request.take()
    }

    pub fn add_segment(&mut self) -> SegmentId {
        let id = self.create_segment();
        self.dispatch();
        id
    }

    pub fn set_segment_name(&mut self, id: SegmentId, name: impl Into<String>) {
        if let Some(segment) = self.segments.get_mut(&id) {
            segment.set_name(name);
        }
        self.dispatch();
    }

    pub fn set_segment_value(&mut self, id: SegmentId, value: impl Into<String>) {
        if let Some(segment) = self.segments.get_mut(&id) {
            segment.set_value(value);
        }
        self.dispatch();
    }

    pub fn focus_segment_name(&mut self, id: SegmentId) {
        if let Some(segment) = self.segments.get(&id) {
            segment.focus_name();
        }
        self.dispatch();
    }

    pub fn blur_segment_name(&mut self, id: SegmentId) {
        if let Some(segment) = self.segments.get(&id) {
            segment.blur_name();
        }
        self.dispatch();
    }

    pub fn press_enter(&mut self, id: SegmentId) {
        if let Some(segment) = self.segments.get(&id) {
            segment.press_enter();
        }
        self.dispatch();
    }

    pub fn delete_segment(&mut self, id: SegmentId) {
        if let Some(segment) = self.segments.get_mut(&id) {
            segment.remove(&mut self.list);
        }
        self.dispatch();
    }

    /// Replace every segment with the pairs found in the base value.
    ///
    /// An absolute URL loses its query, which moves into segments. Focus
    /// passes to each new row in turn, so a row left without a name is
    /// dropped unless it is the last one.
    pub fn parse_base(&mut self) {
        let decomposed = decompose(&self.base);
        if let Some(stripped) = decomposed.stripped_base {
            self.base = stripped;
        }
        self.remove_all_segments();

        let mut previous: Option<SegmentId> = None;
        for pair in decomposed.pairs {
            if let Some(segment) = previous.and_then(|id| self.segments.get(&id)) {
                segment.blur_name();
            }
            let id = self.create_segment();
            if let Some(segment) = self.segments.get_mut(&id) {
                segment.prefill(pair.name, pair.value);
            }
            previous = Some(id);
        }
        self.dispatch();
        self.update_display();
    }

    /// Clear the base, every segment and the page address.
    pub fn reset(&mut self) {
        self.base.clear();
        self.remove_all_segments();
        self.dispatch();
        self.address.replace_state(None);
        self.update_display();
    }

    /// Recompute the result and mirror it into the page address.
    pub fn update_display(&mut self) {
        let pairs: Vec<QueryPair> = self
            .collection
            .iter()
            .filter_map(|id| self.segments.get(&id))
            .filter_map(Segment::get_value)
            .collect();

        self.result = compute_result(&self.base, pairs);
        self.address.replace_state(self.result.as_link_value());
    }

    fn create_segment(&mut self) -> SegmentId {
        let id = SegmentId::new(self.next_id);
        self.next_id += 1;

        let mut segment = Segment::new(id);
        let mailbox = self.mailbox.clone();
        segment.on_any(Rc::new(move |event: &SegmentEvent| {
            mailbox.borrow_mut().push_back((id, event.clone()));
        }));
        segment.append_to(&mut self.list);

        self.segments.insert(id, segment);
        self.focus_request = Some(id);
        log::debug!("Segment {} added", id);
        id
    }

    fn remove_all_segments(&mut self) {
        let ids = self.list.ids().to_vec();
        for id in ids {
            if let Some(segment) = self.segments.get_mut(&id) {
                segment.remove(&mut self.list);
            }
        }
    }

    fn dispatch(&mut self) {
        loop {
            let next = self.mailbox.borrow_mut().pop_front();
            let Some((id, event)) = next else {
                break;
            };
            self.handle_event(id, event);
        }
    }

    fn handle_event(&mut self, id: SegmentId, event: SegmentEvent) {
        match event {
            SegmentEvent::Append => {
                self.collection.insert(id);
            }
            SegmentEvent::Remove => {
                self.collection.remove(id);
                self.segments.remove(&id);
                if self.focus_request == Some(id) {
                    self.focus_request = None;
                }
                log::debug!("Segment {} removed", id);
            }
            SegmentEvent::Update(pair) => {
                log::trace!("Segment {} updated: {:?}", id, pair);
            }
            SegmentEvent::NameFocus => self.highlight_duplicates(id),
            SegmentEvent::NameBlur => {
                self.clear_highlights();
                if let Some(segment) = self.segments.get_mut(&id) {
                    if segment.get_value().is_none() {
                        segment.remove(&mut self.list);
                    }
                }
            }
            SegmentEvent::Enter => {
                let valid = self
                    .segments
                    .get(&id)
                    .is_some_and(|segment| segment.get_value().is_some());
                if valid {
                    self.create_segment();
                }
            }
        }
        self.update_display();
    }

    /// Mark every segment sharing the focused segment's name.
    fn highlight_duplicates(&mut self, focused: SegmentId) {
        let name = self
            .segments
            .get(&focused)
            .and_then(Segment::get_value)
            .map(|pair| pair.name);

        let mut any_duplicate = false;
        let ids: Vec<SegmentId> = self.collection.iter().collect();
        for id in ids {
            if id == focused {
                continue;
            }
            if let Some(other) = self.segments.get_mut(&id) {
                let duplicate = match (&name, other.get_value()) {
                    (Some(name), Some(pair)) => *name == pair.name,
                    _ => false,
                };
                other.set_highlighted(duplicate);
                any_duplicate |= duplicate;
            }
        }

        if let Some(segment) = self.segments.get_mut(&focused) {
            segment.set_highlighted(any_duplicate);
        }
    }

    fn clear_highlights(&mut self) {
        for segment in self.segments.values_mut() {
            segment.set_highlighted(false);
        }
    }
}
