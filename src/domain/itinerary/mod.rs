pub mod assembler;
pub mod dto;
pub mod extractor;
pub mod handler;
pub mod navigation;
pub mod prompt;
pub mod service;

pub use dto::{Activity, DayPlan, ItineraryRequest, ItineraryResult};
pub use service::ItineraryService;
