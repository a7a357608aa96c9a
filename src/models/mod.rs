pub mod setcard;
pub mod user;

pub use setcard::{Measurements, NewSetcard, SetcardInput, SetcardRecord};
pub use user::{Credentials, UserRecord};
