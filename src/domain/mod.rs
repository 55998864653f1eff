pub mod account;
pub mod bill;
pub mod notification;
pub mod ports;
pub mod saga;
