pub mod lex;
pub mod rds;
pub mod schema;
