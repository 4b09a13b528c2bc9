pub mod registration;

pub use registration::TokenExchanger;
