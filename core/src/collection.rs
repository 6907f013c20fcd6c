//! Client-side cache of one CRUD resource.
//!
//! # Design
//! `CollectionStore` mirrors the server's operations one to one and keeps a
//! local copy of the list in a signal. Every action catches its failure and
//! returns an [`ActionError`] with a displayable message; the 401 case has
//! already been handled by [`HttpClient`] by the time it gets here.

use std::sync::Arc;

use tracing::debug;

use crate::api::HttpClient;
use crate::composables::Loading;
use crate::error::{ActionError, ActionResult, ApiError};
use crate::signal::Signal;
use crate::types::Entity;

pub struct CollectionStore<E: Entity> {
    http: Arc<HttpClient>,
    items: Signal<Vec<E>>,
    loading: Loading,
    error: Signal<Option<String>>,
}

impl<E: Entity> CollectionStore<E> {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            items: Signal::default(),
            loading: Loading::default(),
            error: Signal::default(),
        }
    }

    pub fn items(&self) -> Vec<E> {
        self.items.get()
    }

    pub fn items_signal(&self) -> &Signal<Vec<E>> {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    /// Message of the last failed [`fetch_all`](Self::fetch_all).
    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn error_signal(&self) -> &Signal<Option<String>> {
        &self.error
    }

    /// Replace the local list with the server's. The loading flag is raised
    /// for the duration of the call.
    pub fn fetch_all(&self) -> ActionResult<()> {
        let _loading = self.loading.guard();
        self.error.set(None);
        match self.http.list::<E>() {
            Ok(items) => {
                debug!(resource = E::RESOURCE, count = items.len(), "fetched collection");
                self.items.set(items);
                Ok(())
            }
            Err(error) => {
                let error = failure(&error, "cargar", E::PLURAL);
                self.error.set(Some(error.message.clone()));
                Err(error)
            }
        }
    }

    pub fn create(&self, input: &E::Draft) -> ActionResult<E> {
        let created = self
            .http
            .create::<E>(input)
            .map_err(|e| failure(&e, "crear", E::NOUN))?;
        self.items.update(|items| items.push(created.clone()));
        Ok(created)
    }

    /// Update the record and replace the local copy in place, keeping its
    /// position.
    pub fn update(&self, id: u64, patch: &E::Patch) -> ActionResult<E> {
        let updated = self
            .http
            .update::<E>(id, patch)
            .map_err(|e| failure(&e, "actualizar", E::NOUN))?;
        self.items.update(|items| {
            if let Some(slot) = items.iter_mut().find(|item| item.id() == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> ActionResult<E> {
        let removed = self
            .http
            .delete::<E>(id)
            .map_err(|e| failure(&e, "eliminar", E::NOUN))?;
        self.items.update(|items| items.retain(|item| item.id() != id));
        Ok(removed)
    }
}

fn failure(error: &ApiError, verb: &str, noun: &str) -> ActionError {
    debug!(%error, verb, noun, "collection action failed");
    ActionError::from_api(error, &format!("Error al {verb} {noun}"))
}
