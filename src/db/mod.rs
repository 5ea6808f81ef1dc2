pub mod db;
pub mod giftcodedb;
pub mod notificationdb;
pub mod packagedb;
pub mod requestdb;
pub mod subscriptiondb;
pub mod userdb;
pub mod walletdb;
