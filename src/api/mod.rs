pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, BookingApi};
pub use error::ApiError;
pub use models::{Booking, BookingDate, BookingDraft, Credentials};
