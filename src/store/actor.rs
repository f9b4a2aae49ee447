use crate::error::StoreError;
use crate::store::contacts_csv::ContactStore;
use agenda_schema::Contact;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub enum ContactStoreMessage {
    /// Contacts whose first name contains the query, ignoring case.
    FindByName(String, RpcReplyPort<Result<Vec<Contact>, StoreError>>),

    /// Every contact in file order.
    ListAll(RpcReplyPort<Result<Vec<Contact>, StoreError>>),

    /// Append a contact.
    Insert(Contact, RpcReplyPort<Result<Contact, StoreError>>),

    /// Replace every contact with the given id.
    UpdateById(i64, Contact, RpcReplyPort<Result<Contact, StoreError>>),

    /// Remove every contact with the given id; replies with the number removed.
    DeleteById(i64, RpcReplyPort<Result<usize, StoreError>>),
}

/// Cloneable front of the contact store actor.
///
/// The actor handles one message at a time and waits for each file operation to finish, so
/// concurrent update/delete requests cannot interleave their read-modify-write passes.
#[derive(Clone)]
pub struct ContactStoreHandle {
    actor: ActorRef<ContactStoreMessage>,
}

impl ContactStoreHandle {
    pub async fn find_by_name(&self, query: String) -> Result<Vec<Contact>, StoreError> {
        ractor::call!(self.actor, ContactStoreMessage::FindByName, query).map_err(|e| {
            StoreError::Task(format!("ContactStore FindByName RPC failed: {e}"))
        })?
    }

    pub async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        ractor::call!(self.actor, ContactStoreMessage::ListAll)
            .map_err(|e| StoreError::Task(format!("ContactStore ListAll RPC failed: {e}")))?
    }

    pub async fn insert(&self, contact: Contact) -> Result<Contact, StoreError> {
        ractor::call!(self.actor, ContactStoreMessage::Insert, contact)
            .map_err(|e| StoreError::Task(format!("ContactStore Insert RPC failed: {e}")))?
    }

    pub async fn update_by_id(&self, id: i64, contact: Contact) -> Result<Contact, StoreError> {
        ractor::call!(self.actor, ContactStoreMessage::UpdateById, id, contact).map_err(|e| {
            StoreError::Task(format!("ContactStore UpdateById RPC failed: {e}"))
        })?
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<usize, StoreError> {
        ractor::call!(self.actor, ContactStoreMessage::DeleteById, id).map_err(|e| {
            StoreError::Task(format!("ContactStore DeleteById RPC failed: {e}"))
        })?
    }
}

struct ContactStoreState {
    store: Arc<ContactStore>,
}

struct ContactStoreActor;

#[ractor::async_trait]
impl Actor for ContactStoreActor {
    type Msg = ContactStoreMessage;
    type State = ContactStoreState;
    type Arguments = ContactStore;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        store: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(path = %store.path().display(), "ContactStoreActor initialized");
        Ok(ContactStoreState {
            store: Arc::new(store),
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            ContactStoreMessage::FindByName(query, reply) => {
                let res = run_blocking(&state.store, move |s| s.find_by_name(&query)).await;
                let _ = reply.send(res);
            }
            ContactStoreMessage::ListAll(reply) => {
                let res = run_blocking(&state.store, ContactStore::list_all).await;
                let _ = reply.send(res);
            }
            ContactStoreMessage::Insert(contact, reply) => {
                let res = run_blocking(&state.store, move |s| s.insert(contact)).await;
                let _ = reply.send(res);
            }
            ContactStoreMessage::UpdateById(id, contact, reply) => {
                let res = run_blocking(&state.store, move |s| s.update_by_id(id, contact)).await;
                let _ = reply.send(res);
            }
            ContactStoreMessage::DeleteById(id, reply) => {
                let res = run_blocking(&state.store, move |s| s.delete_by_id(id)).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

/// Runs a file operation on the blocking pool; the actor awaits it before taking the next message.
async fn run_blocking<T, F>(store: &Arc<ContactStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&ContactStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| StoreError::Task(format!("blocking store task failed: {e}")))?
}

/// Open (or create) the CSV store at `path` and spawn its actor.
pub async fn spawn(path: impl Into<PathBuf>) -> Result<ContactStoreHandle, StoreError> {
    let path = path.into();
    let store = tokio::task::spawn_blocking(move || ContactStore::open(path))
        .await
        .map_err(|e| StoreError::Task(format!("blocking store task failed: {e}")))??;

    let (actor, _jh) = ractor::Actor::spawn(None, ContactStoreActor, store)
        .await
        .map_err(|e| StoreError::Task(format!("failed to spawn ContactStoreActor: {e}")))?;

    Ok(ContactStoreHandle { actor })
}
