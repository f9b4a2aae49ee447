use crate::error::AgendaError;
use crate::server::router::AgendaState;
use crate::utils::logging::debug_payload;
use agenda_schema::{Contact, MessageBody};
use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring matched against `first_name`, ignoring case.
    pub name: String,
}

pub fn router() -> Router<AgendaState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/search", get(search_contacts))
        .route(
            "/contacts/{id}",
            put(update_contact).delete(delete_contact),
        )
}

/// GET /contacts/search?name=...
pub(super) async fn search_contacts(
    State(state): State<AgendaState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, AgendaError> {
    let Query(SearchParams { name }) = params?;
    let found = state.contacts.find_by_name(name.clone()).await?;
    debug!(query = %name, matches = found.len(), "Contact search");
    Ok(Json(found))
}

/// GET /contacts
pub(super) async fn list_contacts(
    State(state): State<AgendaState>,
) -> Result<Json<Vec<Contact>>, AgendaError> {
    Ok(Json(state.contacts.list_all().await?))
}

/// POST /contacts
///
/// Appends the contact as-is; an existing id is not an error.
pub(super) async fn create_contact(
    State(state): State<AgendaState>,
    payload: Result<Json<Contact>, JsonRejection>,
) -> Result<Json<Contact>, AgendaError> {
    let Json(contact) = payload?;
    debug_payload("Create contact", &contact);

    let created = state.contacts.insert(contact).await?;
    info!(id = created.id, "Contact created");
    Ok(Json(created))
}

/// PUT /contacts/{id}
///
/// The path id selects the rows; the stored rows take every field, `id` included, from the body.
pub(super) async fn update_contact(
    State(state): State<AgendaState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Contact>, JsonRejection>,
) -> Result<Json<Contact>, AgendaError> {
    let Path(id) = id?;
    let Json(contact) = payload?;
    debug!(id, "Update contact");
    debug_payload("Update contact payload", &contact);

    let updated = state.contacts.update_by_id(id, contact).await?;
    info!(id, "Contact updated");
    Ok(Json(updated))
}

/// DELETE /contacts/{id}
pub(super) async fn delete_contact(
    State(state): State<AgendaState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageBody>, AgendaError> {
    let Path(id) = id?;
    let removed = state.contacts.delete_by_id(id).await?;
    info!(id, removed, "Contact deleted");
    Ok(Json(MessageBody::new("Contact deleted")))
}
