// Types shared across the formatter: token kinds, the parse table row, and
// the option structs that callers hand to the entry points.

mod kinds;
mod options;
mod token;

// Re-export all public symbols
pub use kinds::*;
pub use options::*;
pub use token::*;
