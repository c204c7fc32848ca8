pub mod audit_record;
pub mod intent;
pub mod request;

pub use audit_record::AuditRecord;
pub use intent::{normalize, CabinPreference, HotelTypePreference, Intent, TripType, ValidationError};
pub use request::{InputValidationError, RawRequest};
