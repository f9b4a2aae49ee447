pub mod router;
pub mod routes;

pub use router::{AgendaState, agenda_router};
