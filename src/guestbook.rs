pub(crate) mod store;
pub(crate) mod validate;

use crate::{
    TwibbonError, TwibbonResult,
    downloads::ClientIdentity,
    guestbook::{
        store::{MessageRecord, MessageStore, NewMessageRecord},
        validate::{FieldErrors, MessageForm, validate_message},
    },
};

/// Messages per guestbook page.
pub const PAGE_SIZE: u32 = 10;

/// One page of the message list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GuestbookPage {
    /// Messages on this page, newest first.
    pub messages: Vec<MessageRecord>,
    /// 0-based page number.
    pub page: u32,
    /// `ceil(count / PAGE_SIZE)`.
    pub total_pages: u32,
}

/// Result of submitting the message form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostOutcome {
    /// Stored.
    Posted(MessageRecord),
    /// Not stored; shown inline next to the form fields.
    Rejected(FieldErrors),
}

/// Guestbook service over a [`MessageStore`].
#[derive(Debug)]
pub struct Guestbook<S> {
    store: S,
}

impl<S: MessageStore> Guestbook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load page `page` (0-based). Page 0 always exists, even when empty.
    #[tracing::instrument(skip(self))]
    pub fn page(&self, page: u32) -> TwibbonResult<GuestbookPage> {
        let count = self.store.count()?;
        let total_pages = u32::try_from(count.div_ceil(u64::from(PAGE_SIZE)))
            .map_err(|_| TwibbonError::store("message count out of range"))?;
        if page > 0 && page >= total_pages {
            return Err(TwibbonError::not_found("page not found"));
        }
        let messages = self.store.list(page, PAGE_SIZE)?;
        Ok(GuestbookPage {
            messages,
            page,
            total_pages,
        })
    }

    /// Validate and store a message from `client`.
    pub fn post(
        &mut self,
        form: &MessageForm,
        client: &ClientIdentity,
    ) -> TwibbonResult<PostOutcome> {
        let valid = match validate_message(form) {
            Ok(v) => v,
            Err(errors) => {
                tracing::debug!(?errors, "guestbook post rejected");
                return Ok(PostOutcome::Rejected(errors));
            }
        };
        let record = self.store.insert(NewMessageRecord {
            name: valid.name,
            message: valid.message,
            sender_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        })?;
        tracing::info!(id = record.id, "guestbook message posted");
        Ok(PostOutcome::Posted(record))
    }
}
