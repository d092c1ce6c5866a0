//! In-memory calendar: events in file order, unique by id.

use std::collections::HashMap;

use crate::error::{VctError, VctResult};
use crate::event::Event;
use crate::identity::EventId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarDocument {
    events: Vec<Event>,
    index: HashMap<EventId, usize>,
}

impl CalendarDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from events in their persisted order.
    pub fn from_events(events: Vec<Event>) -> VctResult<Self> {
        let mut document = CalendarDocument::new();
        for event in events {
            if document.contains(&event.id) {
                return Err(VctError::CorruptDocument(format!(
                    "duplicate event id {}",
                    event.id
                )));
            }
            document.push(event);
        }
        Ok(document)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.index.get(id).map(|&i| &self.events[i])
    }

    pub(crate) fn get_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.index.get(id).map(|&i| &mut self.events[i])
    }

    /// Add events created in one pass. Existing events keep their positions;
    /// the new ones go after them ordered by start time, then id.
    pub(crate) fn append_new(&mut self, mut created: Vec<Event>) -> VctResult<()> {
        created.sort_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));

        for event in created {
            if self.contains(&event.id) {
                return Err(VctError::IdentityConflict {
                    id: event.id.to_string(),
                    detail: "event created twice".into(),
                });
            }
            self.push(event);
        }
        Ok(())
    }

    fn push(&mut self, event: Event) {
        self.index.insert(event.id.clone(), self.events.len());
        self.events.push(event);
    }
}

impl<'a> IntoIterator for &'a CalendarDocument {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
