//! Symbol flags.

use bitflags::bitflags;

bitflags! {
    /// Per-symbol properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymFlags: u16 {
        /// Value cannot be reassigned after initialization.
        const CONSTANT = 1 << 0;
        /// Defined by the editor; cannot be undeclared by macro code.
        const SYSTEM = 1 << 1;
        /// Value is produced by a getter on every read.
        const COMPUTED = 1 << 2;
        /// Accepts values of any type; the declared type follows the last write.
        const POLY = 1 << 3;
        /// Alias of another symbol (reference parameter).
        const REFERENCE = 1 << 4;
    }
}
