pub mod client;
pub mod retry;

pub use client::{AiClient, AiClientTrait, OpenAiClient};
