// Timegrid Library
// Headless layout engine for calendar timeline views

pub mod layout;
pub mod models;
pub mod services;
pub mod utils;
