/*!
compiler - LAD-to-IR front end.

Submodules
==========
- lad: the LAD JSON wire format (`LadProgram` and friends).
- lower: `LadCompiler`, which applies the lowering rules to produce an
  IR `Program`.
*/

pub mod lad;
pub mod lower;

pub use lad::{CoilType, ContactType, LadElement, LadNetwork, LadProgram, LadRung};
pub use lower::LadCompiler;
