pub mod aggregate;

pub use aggregate::{Lead, LeadDto, LeadId, LeadStatus};
