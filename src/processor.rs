use std::io::Write;

use crate::memory::{Byte, Memory};
use color_eyre::eyre::{Result, WrapErr};
use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

mod alu;
mod decode;
mod fault;
mod handlers;

pub use decode::Decoded;
pub use fault::Fault;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Register holding the stack pointer
pub const SP: usize = 7;

/// Initial value of the stack pointer. The stack grows downwards from here.
pub const STACK_START: Byte = 0xF4;

/// Condition flags set by CMP. At most one flag is set at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(Byte);

impl Flags {
    pub const EQUAL: Flags = Flags(0b001);
    pub const GREATER: Flags = Flags(0b010);
    pub const LESS: Flags = Flags(0b100);

    pub fn bits(&self) -> Byte {
        self.0
    }

    pub fn is_equal(&self) -> bool {
        *self == Self::EQUAL
    }
}

/// Emulates a CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Processor {
    /// General purpose registers. R7 is the stack pointer
    pub registers: [Byte; REGISTER_COUNT],
    /// Program counter
    pub pc: Byte,
    /// Instruction register. Holds the opcode of the current instruction
    pub ir: Byte,
    /// Flags register
    pub fl: Flags,
    /// Set once the processor executed HLT or hit a division by zero
    pub halted: bool,
    /// Number of executed instructions
    pub cycles: u64,
}

impl Default for Processor {
    /// Initializes a new CPU
    fn default() -> Self {
        let mut registers = [0; REGISTER_COUNT];
        registers[SP] = STACK_START;

        Self {
            registers,
            pc: 0x00,
            ir: 0x00,
            fl: Flags::default(),
            halted: false,
            cycles: 0,
        }
    }
}

impl Processor {
    /// Initializes a new CPU
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the power-on state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reads register `index`
    pub fn reg(&self, index: Byte) -> Result<Byte, Fault> {
        self.registers
            .get(index as usize)
            .copied()
            .ok_or(Fault::InvalidRegister { index })
    }

    /// Writes `value` to register `index`
    pub fn set_reg(&mut self, index: Byte, value: Byte) -> Result<(), Fault> {
        let register = self
            .registers
            .get_mut(index as usize)
            .ok_or(Fault::InvalidRegister { index })?;
        *register = value;
        Ok(())
    }

    /// Executes a decoded instruction with its two operand bytes
    pub fn execute_instruction<W: Write>(
        &mut self,
        instruction: Instruction,
        operands: (Byte, Byte),
        memory: &mut Memory,
        out: &mut W,
    ) -> Result<(), Fault> {
        let (a, b) = operands;

        match instruction {
            Instruction::CALL => self.op_call(memory, a),
            Instruction::HLT => self.op_hlt(),
            Instruction::JEQ => self.op_jeq(a),
            Instruction::JMP => self.op_jmp(a),
            Instruction::JNE => self.op_jne(a),
            Instruction::LDI => self.op_ldi(a, b),
            Instruction::POP => self.op_pop(memory, a),
            Instruction::PRN => self.op_prn(out, a),
            Instruction::PUSH => self.op_push(memory, a),
            Instruction::RET => self.op_ret(memory),
            _ => self.alu(instruction.into(), a, b),
        }
    }

    /// Runs one execution step. Does nothing once halted.
    pub fn execute<W: Write>(&mut self, memory: &mut Memory, out: &mut W) -> Result<()> {
        if self.halted {
            return Ok(());
        }

        let pc = self.pc;
        let opcode = memory.read_byte(pc); // Read opcode where PC is
        let decoded = Decoded::from_opcode(opcode);
        let operands = (
            memory.read_byte(pc.wrapping_add(1)),
            memory.read_byte(pc.wrapping_add(2)),
        );
        self.ir = opcode;
        self.cycles += 1;

        let res = if decoded.is_alu {
            self.alu(opcode, operands.0, operands.1)
        } else {
            Instruction::try_from(opcode)
                .map_err(|_| Fault::UnknownOpcode { opcode })
                .and_then(|instruction| {
                    self.execute_instruction(instruction, operands, memory, out)
                })
        };
        res.wrap_err_with(|| format!("Fault at 0x{:02X} (opcode 0x{:02X})", pc, opcode))?;

        if !decoded.sets_pc && !self.halted {
            self.pc = self.pc.wrapping_add(decoded.instruction_len());
        }

        Ok(())
    }

    /// Run program until the processor halts
    pub fn execute_until_halt<W: Write>(&mut self, memory: &mut Memory, out: &mut W) -> Result<()> {
        while !self.halted {
            self.execute(memory, out)?;
        }

        info!(
            "Program halted at 0x{:02X} after {} cycles",
            self.pc, self.cycles
        );

        Ok(())
    }
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// Defines the instructions
        ///
        /// Opcode format: | operands (2) | alu (1) | sets pc (1) | id (4) |
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// Add register b to register a
    ADD = 0b10100000,
    /// Bitwise-AND register a with register b
    AND = 0b10101000,
    /// Call the subroutine at the address in register a
    CALL = 0b01010000,
    /// Compare register a with register b and set the flags
    CMP = 0b10100111,
    /// Halt the processor
    HLT = 0b00000001,
    /// Jump to the address in register a if equal
    JEQ = 0b01010101,
    /// Jump to the address in register a
    JMP = 0b01010100,
    /// Jump to the address in register a if not equal
    JNE = 0b01010110,
    /// Load an immediate value into register a
    /// @param value The value to load
    LDI = 0b10000010,
    /// Store register a modulo register b in register a
    MOD = 0b10100100,
    /// Multiply register a by register b
    MUL = 0b10100010,
    /// Bitwise-NOT register a
    NOT = 0b01101001,
    /// Bitwise-OR register a with register b
    OR = 0b10101010,
    /// Pop the top of the stack into register a
    POP = 0b01000110,
    /// Print register a as a decimal number
    PRN = 0b01000111,
    /// Push register a onto the stack
    PUSH = 0b01000101,
    /// Return from a subroutine
    RET = 0b00010001,
    /// Shift register a left by register b
    SHL = 0b10101100,
    /// Shift register a right by register b
    SHR = 0b10101101,
    /// Bitwise-XOR register a with register b
    XOR = 0b10101011,
}

impl Instruction {
    /// Whether the instruction is executed by the ALU
    pub fn is_alu(&self) -> bool {
        use Instruction::*;

        matches!(
            self,
            ADD | AND | CMP | MOD | MUL | NOT | OR | SHL | SHR | XOR
        )
    }
}
