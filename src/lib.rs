pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod improve;
pub mod parser;
pub mod process;
pub mod prompts;
pub mod render;
pub mod report;
pub mod review;
pub mod tessl;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
