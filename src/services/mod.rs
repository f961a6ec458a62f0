pub mod checkout;
pub mod payment;
