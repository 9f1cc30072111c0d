pub mod resolver;
pub mod teams;
