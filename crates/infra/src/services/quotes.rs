use chrono::{FixedOffset, Utc};
use tracing::info;

use eventstock_bookings::{QuoteDraft, QuoteRequest};
use eventstock_core::{QuoteRequestId, local_date};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{Store, Tables, upsert};

/// Quote requests. Never touches stock.
pub struct QuoteService<S> {
    store: S,
    offset: FixedOffset,
}

impl<S: Store> QuoteService<S> {
    pub fn new(store: S, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    pub fn create_quote(&self, draft: QuoteDraft) -> ServiceResult<QuoteRequest> {
        self.store.transaction(|t| {
            check_refs(t, &draft)?;
            let now = Utc::now();
            let quote = QuoteRequest::create(
                QuoteRequestId::new(),
                t.next_quote_reference(now),
                &draft,
                &t.items,
                local_date(now, self.offset),
            )?;
            info!(quote_id = %quote.id_typed(), reference = %quote.reference(), "quote request created");
            upsert(&mut t.quotes, quote.clone());
            Ok(quote)
        })
    }

    pub fn update_quote(&self, id: QuoteRequestId, draft: QuoteDraft) -> ServiceResult<QuoteRequest> {
        self.store.transaction(|t| {
            check_refs(t, &draft)?;
            let mut quote = t
                .quotes
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("quote request", id))?;
            quote.update(&draft, &t.items)?;
            upsert(&mut t.quotes, quote.clone());
            Ok(quote)
        })
    }

    pub fn delete_quote(&self, id: QuoteRequestId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            t.quotes
                .remove(&id)
                .ok_or_else(|| ServiceError::not_found("quote request", id))?;
            info!(quote_id = %id, "quote request deleted");
            Ok(())
        })
    }

    pub fn quote(&self, id: QuoteRequestId) -> ServiceResult<QuoteRequest> {
        self.store
            .read(|t| t.quotes.get(&id).cloned())?
            .ok_or_else(|| ServiceError::not_found("quote request", id))
    }

    /// All quotes, newest first.
    pub fn list_quotes(&self) -> ServiceResult<Vec<QuoteRequest>> {
        let mut quotes = self.store.read(|t| t.quotes.values().cloned().collect::<Vec<_>>())?;
        quotes.sort_by(|a, b| b.created_on().cmp(&a.created_on()).then(b.id_typed().cmp(&a.id_typed())));
        Ok(quotes)
    }
}

fn check_refs(t: &Tables, draft: &QuoteDraft) -> ServiceResult<()> {
    if let Some(client) = draft.client.filter(|c| !t.clients.contains_key(c)) {
        return Err(ServiceError::not_found("client", client));
    }
    if let Some(user) = draft.project_manager.filter(|u| !t.users.contains_key(u)) {
        return Err(ServiceError::not_found("user", user));
    }
    Ok(())
}
