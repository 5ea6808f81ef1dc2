pub mod giftcodemodel;
pub mod notificationmodel;
pub mod packagemodel;
pub mod requestmodels;
pub mod subscriptionmodels;
pub mod usermodel;
pub mod walletmodels;
