pub mod defaults;
pub mod replay;
pub mod validate;
