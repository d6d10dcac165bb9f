use std::io::Write;

use log::*;

use super::{Fault, Processor, SP};
use crate::memory::{Byte, Memory};

impl Processor {
    /// CALL: Call subroutine
    ///
    /// Pushes the address of the next instruction and jumps to the address
    /// stored in register `a`.
    pub(super) fn op_call(&mut self, memory: &mut Memory, a: Byte) -> Result<(), Fault> {
        let target = self.reg(a)?;
        let ret = self.pc.wrapping_add(2);

        self.registers[SP] = self.registers[SP].wrapping_sub(1);
        memory.write_byte(self.registers[SP], ret);
        self.pc = target;

        debug!("CALL R{} 0x{:02X} (return 0x{:02X})", a, target, ret);
        Ok(())
    }

    /// HLT: Halt the processor
    pub(super) fn op_hlt(&mut self) -> Result<(), Fault> {
        self.halted = true;

        debug!("HLT");
        Ok(())
    }

    /// JEQ: Jump to the address in register `a` if the equal flag is set
    pub(super) fn op_jeq(&mut self, a: Byte) -> Result<(), Fault> {
        let equal = self.fl.is_equal();
        self.jump_if(equal, a)?;

        debug!("JEQ R{} ({}): 0x{:02X}", a, equal, self.pc);
        Ok(())
    }

    /// JMP: Jump to the address in register `a`
    pub(super) fn op_jmp(&mut self, a: Byte) -> Result<(), Fault> {
        self.pc = self.reg(a)?;

        debug!("JMP R{}: 0x{:02X}", a, self.pc);
        Ok(())
    }

    /// JNE: Jump to the address in register `a` if the equal flag is clear
    pub(super) fn op_jne(&mut self, a: Byte) -> Result<(), Fault> {
        let not_equal = !self.fl.is_equal();
        self.jump_if(not_equal, a)?;

        debug!("JNE R{} ({}): 0x{:02X}", a, not_equal, self.pc);
        Ok(())
    }

    /// LDI: Load immediate `value` into register `a`
    pub(super) fn op_ldi(&mut self, a: Byte, value: Byte) -> Result<(), Fault> {
        self.set_reg(a, value)?;

        debug!("LDI R{} {}", a, value);
        Ok(())
    }

    /// POP: Pop the top of the stack into register `a`
    pub(super) fn op_pop(&mut self, memory: &Memory, a: Byte) -> Result<(), Fault> {
        let value = memory.read_byte(self.registers[SP]);
        self.set_reg(a, value)?;
        self.registers[SP] = self.registers[SP].wrapping_add(1);

        debug!("POP R{}: {}", a, value);
        Ok(())
    }

    /// PRN: Print the value of register `a` as a decimal number
    pub(super) fn op_prn<W: Write>(&self, out: &mut W, a: Byte) -> Result<(), Fault> {
        let value = self.reg(a)?;
        writeln!(out, "{}", value)?;

        debug!("PRN R{}: {}", a, value);
        Ok(())
    }

    /// PUSH: Push the value of register `a` onto the stack
    pub(super) fn op_push(&mut self, memory: &mut Memory, a: Byte) -> Result<(), Fault> {
        let value = self.reg(a)?;
        self.registers[SP] = self.registers[SP].wrapping_sub(1);
        memory.write_byte(self.registers[SP], value);

        debug!("PUSH R{}: {}", a, value);
        Ok(())
    }

    /// RET: Return from subroutine
    ///
    /// Reads the return address from the top of the stack. The stack pointer
    /// is left where CALL put it, so every CALL/RET pair moves it down by one.
    pub(super) fn op_ret(&mut self, memory: &Memory) -> Result<(), Fault> {
        self.pc = memory.read_byte(self.registers[SP]);

        debug!("RET: 0x{:02X}", self.pc);
        Ok(())
    }

    /// Jumps to the address in register `a` when `condition` holds,
    /// otherwise skips the instruction.
    fn jump_if(&mut self, condition: bool, a: Byte) -> Result<(), Fault> {
        if condition {
            self.pc = self.reg(a)?;
        } else {
            self.pc = self.pc.wrapping_add(2);
        }

        Ok(())
    }
}
