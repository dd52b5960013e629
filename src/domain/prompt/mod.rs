pub mod dto;
pub mod entity;
pub mod handler;
pub mod seed;
pub mod store;

pub use dto::{PromptPart, PromptPartRequest};
pub use store::{SeaOrmTemplateStore, SharedTemplateStore, TemplateStore};
