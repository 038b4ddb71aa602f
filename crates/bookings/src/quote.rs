//! Quote requests: non-committing booking drafts.
//!
//! A quote lists wanted items but never holds stock, so it is invisible to
//! the availability engine. Lines get the same row checks as bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{ClientId, DateRange, Entity, QuoteRequestId, UserId, ValidationErrors};

use crate::lifecycle::{optional_text, required_text, validate_period};
use crate::line::{ItemLookup, LineItem, LineRequest, prepare_lines};
use crate::reference::ReferenceNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub client: Option<ClientId>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub setup_installation_at: DateTime<Utc>,
    pub setup_removal_at: DateTime<Utc>,
    pub project_manager: Option<UserId>,
    pub subcontractors: Option<String>,
    pub delivery_note_signed_from: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    id: QuoteRequestId,
    reference: ReferenceNumber,
    client: Option<ClientId>,
    title: String,
    period: DateRange,
    setup_installation_at: DateTime<Utc>,
    setup_removal_at: DateTime<Utc>,
    project_manager: Option<UserId>,
    subcontractors: Option<String>,
    delivery_note_signed_from: Option<String>,
    notes: Option<String>,
    created_on: NaiveDate,
    lines: Vec<LineItem>,
}

struct CheckedQuote {
    title: String,
    period: DateRange,
    lines: Vec<LineItem>,
}

fn check(draft: &QuoteDraft, items: &impl ItemLookup) -> Result<CheckedQuote, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = required_text(&draft.title, "title", "Event title", 255, &mut errors);
    let period = validate_period(draft.start, draft.end, &mut errors);
    let lines = prepare_lines(&draft.lines, items, &mut errors)
        .into_iter()
        .map(|accepted| accepted.line)
        .collect();
    match period {
        Some(period) if errors.is_empty() => Ok(CheckedQuote {
            title,
            period,
            lines,
        }),
        _ => Err(errors),
    }
}

impl QuoteRequest {
    /// `created_on` is the local business date of creation.
    pub fn create(
        id: QuoteRequestId,
        reference: ReferenceNumber,
        draft: &QuoteDraft,
        items: &impl ItemLookup,
        created_on: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        let checked = check(draft, items)?;
        Ok(Self {
            id,
            reference,
            client: draft.client,
            title: checked.title,
            period: checked.period,
            setup_installation_at: draft.setup_installation_at,
            setup_removal_at: draft.setup_removal_at,
            project_manager: draft.project_manager,
            subcontractors: optional_text(&draft.subcontractors),
            delivery_note_signed_from: optional_text(&draft.delivery_note_signed_from),
            notes: optional_text(&draft.notes),
            created_on,
            lines: checked.lines,
        })
    }

    pub fn update(&mut self, draft: &QuoteDraft, items: &impl ItemLookup) -> Result<(), ValidationErrors> {
        let checked = check(draft, items)?;
        self.client = draft.client;
        self.title = checked.title;
        self.period = checked.period;
        self.setup_installation_at = draft.setup_installation_at;
        self.setup_removal_at = draft.setup_removal_at;
        self.project_manager = draft.project_manager;
        self.subcontractors = optional_text(&draft.subcontractors);
        self.delivery_note_signed_from = optional_text(&draft.delivery_note_signed_from);
        self.notes = optional_text(&draft.notes);
        self.lines = checked.lines;
        Ok(())
    }

    pub fn id_typed(&self) -> QuoteRequestId {
        self.id
    }

    pub fn reference(&self) -> &ReferenceNumber {
        &self.reference
    }

    pub fn client(&self) -> Option<ClientId> {
        self.client
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn period(&self) -> &DateRange {
        &self.period
    }

    pub fn setup_installation_at(&self) -> DateTime<Utc> {
        self.setup_installation_at
    }

    pub fn setup_removal_at(&self) -> DateTime<Utc> {
        self.setup_removal_at
    }

    pub fn project_manager(&self) -> Option<UserId> {
        self.project_manager
    }

    pub fn subcontractors(&self) -> Option<&str> {
        self.subcontractors.as_deref()
    }

    pub fn delivery_note_signed_from(&self) -> Option<&str> {
        self.delivery_note_signed_from.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Clear the project manager after the user is removed.
    pub fn detach_project_manager(&mut self) {
        self.project_manager = None;
    }
}

impl Entity for QuoteRequest {
    type Id = QuoteRequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for QuoteRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.title, self.reference)
    }
}
