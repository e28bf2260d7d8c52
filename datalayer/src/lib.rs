pub mod authentication;
pub mod conf;
pub mod error;
pub mod startup;
pub mod store;
pub mod trace;
pub mod validation;
