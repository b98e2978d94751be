//! Application layer containing the doctor service and shared state.

pub mod service;
pub mod state;

pub use service::DoctorService;
pub use state::AppState;
