pub mod access_control;
pub mod broker_links;
pub mod health;
pub mod password_reset;
