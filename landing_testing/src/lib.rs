pub mod email_api;
