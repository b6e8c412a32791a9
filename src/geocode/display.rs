//! Per-map result lifecycle: pending/ready state and stale-result rejection.
//!
//! Each map view owns one [`AddressDisplay`]. A new input supersedes whatever
//! is in flight; results for a superseded request are dropped on commit.

use super::resolver::AddressResolver;
use super::types::{AddressInput, GeoCoordinate, ResolutionResult};
use serde::Serialize;

/// Zoom level the map view centers at.
pub const MAP_ZOOM: u8 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Pending,
    Ready(ResolutionResult),
}

/// Handle for one in-flight resolution. Consumed by [`AddressDisplay::commit`].
#[derive(Debug)]
#[must_use = "a ticket must be committed to leave the pending state"]
pub struct Ticket {
    generation: u64,
    input: AddressInput,
}

impl Ticket {
    pub fn input(&self) -> &AddressInput {
        &self.input
    }
}

/// What the map view renders: a centered marker with a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoCoordinate,
    pub zoom: u8,
    pub label: String,
    /// True when the center is the fallback point rather than a real match
    pub approximate: bool,
}

impl MapView {
    pub fn from_result(result: &ResolutionResult, label: &str, zoom: u8) -> Option<Self> {
        Some(Self {
            center: result.coordinate()?,
            zoom,
            label: label.to_string(),
            approximate: result.is_approximate(),
        })
    }
}

pub struct AddressDisplay {
    label: String,
    zoom: u8,
    generation: u64,
    state: DisplayState,
}

impl AddressDisplay {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            zoom: MAP_ZOOM,
            generation: 0,
            state: DisplayState::Pending,
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Start resolving a new input. Any earlier ticket becomes stale.
    pub fn begin(&mut self, input: AddressInput) -> Ticket {
        self.generation += 1;
        self.state = DisplayState::Pending;
        Ticket { generation: self.generation, input }
    }

    /// Apply a finished resolution. Returns `false` (and changes nothing)
    /// when a newer `begin` has superseded the ticket.
    pub fn commit(&mut self, ticket: Ticket, result: ResolutionResult) -> bool {
        if ticket.generation != self.generation {
            log::debug!("discarding stale result for {:?}", ticket.input);
            return false;
        }
        self.state = DisplayState::Ready(result);
        true
    }

    /// Begin, resolve and commit in one step.
    pub fn refresh(&mut self, resolver: &AddressResolver, input: AddressInput) -> &DisplayState {
        let ticket = self.begin(input);
        let result = resolver.resolve(ticket.input());
        self.commit(ticket, result);
        &self.state
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == DisplayState::Pending
    }

    /// Nothing while pending or when the outcome is "no map".
    pub fn map_view(&self) -> Option<MapView> {
        match &self.state {
            DisplayState::Pending => None,
            DisplayState::Ready(result) => MapView::from_result(result, &self.label, self.zoom),
        }
    }
}
