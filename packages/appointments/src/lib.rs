// ABOUTME: Donation appointment booking and status transitions
// ABOUTME: Donors book PENDING slots; admins approve, reject, or complete them

pub mod storage;
pub mod types;

pub use storage::AppointmentStorage;
pub use types::{
    Appointment, AppointmentError, AppointmentStatus, AppointmentWithDonor, BookingInput,
};
