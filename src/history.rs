//! Medical-history derivations and the timeline screen.

use chrono::NaiveDate;

use crate::filter::search_matches;
use crate::models::{EventKind, MedicalEvent};
use crate::store::{RecordId, RecordStore, StoreError};
use crate::view::LoadState;

/// The type dropdown, with `All` disabling the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Kind(EventKind),
}

/// Events newest first, by date only; same-day events keep their fetched
/// order (events carry no time component).
pub fn medical_timeline(events: &[MedicalEvent]) -> Vec<MedicalEvent> {
    let mut timeline: Vec<MedicalEvent> = events.to_vec();
    timeline.sort_by(|a, b| b.date.cmp(&a.date));
    timeline
}

/// Type dropdown composed with search over title, provider, and description.
pub fn filter_events(
    events: &[MedicalEvent],
    filter: &EventFilter,
    term: &str,
) -> Vec<MedicalEvent> {
    events
        .iter()
        .filter(|e| match filter {
            EventFilter::All => true,
            EventFilter::Kind(kind) => e.kind == *kind,
        })
        .filter(|e| search_matches(term, &[&e.title, &e.provider, &e.description]))
        .cloned()
        .collect()
}

/// Form fields for a new medical event.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub kind: Option<EventKind>,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub provider: String,
    pub description: String,
    pub results: Option<String>,
}

impl EventDraft {
    pub fn into_record(self) -> Result<MedicalEvent, StoreError> {
        let kind = self.kind.ok_or_else(|| StoreError::InvalidField {
            field: "type".into(),
            value: "<missing>".into(),
        })?;
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidField {
                field: "title".into(),
                value: self.title.clone(),
            });
        }
        let date = self.date.ok_or_else(|| StoreError::InvalidField {
            field: "date".into(),
            value: "<missing>".into(),
        })?;
        let mut event = MedicalEvent::new(
            kind,
            self.title.trim(),
            date,
            self.provider.trim(),
            self.description.trim(),
        );
        event.results = self.results.filter(|r| !r.trim().is_empty());
        Ok(event)
    }
}

/// The history screen: the fetched timeline plus dropdown and search state.
pub struct HistoryView<S: RecordStore<MedicalEvent>> {
    store: S,
    records: Vec<MedicalEvent>,
    pub state: LoadState,
    pub filter: EventFilter,
    pub search: String,
}

impl<S: RecordStore<MedicalEvent>> HistoryView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            state: LoadState::default(),
            filter: EventFilter::All,
            search: String::new(),
        }
    }

    /// Fetches and orders the timeline in one step; the screen never shows
    /// events out of date order.
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        match self.store.get_all().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "medical history loaded");
                self.records = medical_timeline(&records);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load medical history");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn records(&self) -> &[MedicalEvent] {
        &self.records
    }

    pub fn visible(&self) -> Vec<MedicalEvent> {
        filter_events(&self.records, &self.filter, &self.search)
    }

    pub fn clear_filters(&mut self) {
        self.filter = EventFilter::All;
        self.search.clear();
    }

    pub async fn add_event(&mut self, draft: EventDraft) -> Result<MedicalEvent, StoreError> {
        let created = self.store.create(draft.into_record()?).await?;
        tracing::info!(id = created.id, kind = created.kind.as_str(), "medical event added");
        self.load().await;
        Ok(created)
    }

    pub async fn remove(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        tracing::info!(id, "medical event deleted");
        self.load().await;
        Ok(())
    }
}
