pub mod ast;
pub mod declarations;
pub mod visitor;
