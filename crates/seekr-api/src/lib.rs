pub mod applications;
pub mod error;
pub mod export;
pub mod extract;
pub mod interviews;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, AppStateInner};
