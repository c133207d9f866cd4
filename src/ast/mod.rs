//! Expression AST.
//!
//! Spatial elements lower into these nodes; the transpiler turns them
//! into SQL text plus bound parameters.

mod column;
mod expr;
mod values;

pub use column::Column;
pub use expr::{BinaryOp, Expr};
pub use values::Value;
