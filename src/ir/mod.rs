/*!
ir - Intermediate representation: expressions, statements, networks,
organization blocks, and the program they assemble into.

Submodules
==========
- expr: operand references, literals, and the recursive expression tree.
- stmt: statement variants, networks, organization blocks, and `Program`.
- validate: static validation not representable in the type system
  (tag/address syntax, operand resolvability).

This module owns the data shapes only; evaluating them is `eval`,
executing them is `exec`, and producing them from ladder source is
`compiler`.
*/

pub mod expr;
pub mod stmt;
pub mod validate;

pub use expr::{BinaryOp, EdgeKind, Expression, Literal, Operand, UnaryOp};
pub use stmt::{CoilHint, ElsifBlock, Network, ObKind, OrganizationBlock, Program, Statement};
pub use validate::validate_program;
