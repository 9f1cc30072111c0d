pub mod grammar;
pub mod vocabulary;
