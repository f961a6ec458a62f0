pub mod booking;
pub mod customer;
pub mod service;
pub mod transaction;

pub use booking::{Booking, BookingPatch, NewBooking, DEFAULT_BOOKING_STATUS};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use service::{NewService, Service, ServicePatch};
pub use transaction::{
    CreateOrderRequest, OrderCreated, Transaction, TransactionStatusUpdate, PENDING_STATUS,
    UNKNOWN_PAYMENT_METHOD,
};

/// Trims `value`, treating an empty result as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
