//! payagelib — кредиторская задолженность по срокам, напоминания об оплате
//! и сроки годности склада; чтение/запись в CSV, XML, JSON и текст.

pub mod error;
pub mod model;
pub mod traits;
pub mod aging;
pub mod resolve;
pub mod reminders;
pub mod expiry;

pub mod formats {
    pub mod csv;
    pub mod xml;
    pub mod json;
    pub mod text;
}

pub use aging::{summarize, AgingCalculator, BucketBounds};
