pub mod consultations;
pub mod events;
pub mod leads;
pub mod membership;
pub mod scheduling;
pub mod store;
