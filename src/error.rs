//! Crate error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failure to execute one CPU step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// The fetched byte has no entry in the decode table. `pc` is the address
    /// the opcode was fetched from.
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}

/// Caller-side precondition violations reported by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image of {len} bytes at ${origin:04X} exceeds the {capacity} bytes available")]
    Overflow {
        origin: u16,
        len: usize,
        capacity: usize,
    },
    #[error("empty image at ${origin:04X}")]
    Empty { origin: u16 },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("step error: {0}")]
    Step(#[from] StepError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[cfg(feature = "screenshot")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offending_values() {
        let e = StepError::UnknownOpcode {
            opcode: 0x02,
            pc: 0xC123,
        };
        assert_eq!(e.to_string(), "unknown opcode $02 at $C123");

        let e: CoreError = LoadError::Empty { origin: 0x8000 }.into();
        assert_eq!(e.to_string(), "load error: empty image at $8000");
    }
}
