pub mod api;
pub mod dashboard;
pub mod fetch;
pub mod geocoder;
pub mod session;
pub mod weather;
