pub mod background_jobs;
pub mod commission;
pub mod deposit_service;
pub mod error;
pub mod gift_code_service;
pub mod investment_service;
pub mod notification_service;
pub mod referral;
pub mod withdrawal_service;
