pub mod auth;
pub mod extract;
pub mod health;
pub mod setcards;

pub use auth::{guest_token, login_user, register_user, validate_token};
pub use extract::AppJson;
pub use health::{api_test, health_check};
pub use setcards::{create_setcard, list_setcards};
