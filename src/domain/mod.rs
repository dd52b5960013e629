pub mod ai;
pub mod health;
pub mod itinerary;
pub mod prompt;
