use std::io;

use thiserror::Error;

use crate::memory::Byte;

/// Conditions which stop the processor.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("invalid opcode: 0x{opcode:02X}")]
    UnknownOpcode { opcode: Byte },

    #[error("unsupported ALU operation: 0x{opcode:02X}")]
    UnsupportedAluOperation { opcode: Byte },

    #[error("division by zero: divisor register R{register} is 0")]
    DivisionByZero { register: Byte },

    #[error("invalid register index: {index} (valid range: 0-7)")]
    InvalidRegister { index: Byte },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
