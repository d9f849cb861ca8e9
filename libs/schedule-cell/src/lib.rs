pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::availability::{classify_slot, is_slot_available};
pub use services::booking::{BookingFlow, BookingService};
pub use services::calendar::{rolling_week, time_slots};
pub use services::worktime::WorkTimeService;
