pub mod prompt_part;
