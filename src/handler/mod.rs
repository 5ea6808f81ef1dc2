pub mod admin;
pub mod auth;
pub mod gift_codes;
pub mod investments;
pub mod notifications;
pub mod packages;
pub mod users;
pub mod wallet;
