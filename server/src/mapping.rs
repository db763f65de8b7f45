//! Conversions between request payloads, stored entities and response shapes.
//!
//! Everything here is pure: no storage access, no logging.

use uuid::Uuid;

use crate::models::{Event, EventInput, EventView, Speaker, SpeakerInput, SpeakerView};

impl EventInput {
    /// Converts the create request into a new event.
    ///
    /// The id is generated here and the deletion flag always starts false.
    /// Nested speakers are attached to the new event's id.
    pub fn into_event(self) -> Event {
        let mut event = Event::new(self.title, self.description, self.start_date, self.end_date);
        event.speakers = self
            .speakers
            .into_iter()
            .map(|speaker| speaker.into_speaker(event.id))
            .collect();
        event
    }

    /// Applies the editable fields to an existing event. Nested speakers are ignored.
    pub fn apply_to(self, event: &mut Event) {
        event.update(self.title, self.description, self.start_date, self.end_date);
    }
}

impl SpeakerInput {
    /// Converts the request into a speaker owned by `dev_event_id`.
    pub fn into_speaker(self, dev_event_id: Uuid) -> Speaker {
        Speaker {
            id: Uuid::new_v4(),
            name: self.name,
            talk_title: self.talk_title,
            talk_description: self.talk_description,
            linkedin_profile: self.linkedin_profile,
            dev_event_id,
        }
    }
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            speakers: event.speakers.into_iter().map(SpeakerView::from).collect(),
        }
    }
}

impl From<Speaker> for SpeakerView {
    fn from(speaker: Speaker) -> Self {
        Self {
            id: speaker.id,
            name: speaker.name,
            talk_title: speaker.talk_title,
            talk_description: speaker.talk_description,
            linkedin_profile: speaker.linkedin_profile,
            dev_event_id: speaker.dev_event_id,
        }
    }
}

/// Maps a list of entities into view models, preserving order.
pub fn to_views(events: Vec<Event>) -> Vec<EventView> {
    events.into_iter().map(EventView::from).collect()
}
