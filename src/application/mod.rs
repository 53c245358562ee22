pub mod pagination;
pub mod ports;
pub mod tokens;
pub mod use_cases;
