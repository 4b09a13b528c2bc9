#[cfg(test)]
pub mod common;
mod token_exchange;
