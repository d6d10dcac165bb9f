use crate::memory::Byte;

/// Fields every opcode carries in its bits.
///
/// Format: | operands (2) | alu (1) | sets pc (1) | id (4) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoded {
    /// Number of operand bytes following the opcode
    pub operands: Byte,
    /// The opcode is handled by the ALU
    pub is_alu: bool,
    /// The handler sets the program counter itself
    pub sets_pc: bool,
}

impl Decoded {
    /// Decodes the fields of `opcode`. Any byte is decodable.
    #[inline(always)]
    pub fn from_opcode(opcode: Byte) -> Self {
        Self {
            operands: opcode >> 6,
            is_alu: (opcode >> 5) & 0b1 == 1,
            sets_pc: (opcode >> 4) & 0b1 == 1,
        }
    }

    /// Size of the whole instruction in bytes
    pub fn instruction_len(&self) -> Byte {
        1 + self.operands
    }
}
