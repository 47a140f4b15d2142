pub mod forecast;
pub mod location;
pub mod order;
pub mod priority;
