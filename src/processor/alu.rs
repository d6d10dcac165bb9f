use std::cmp::Ordering;

use log::*;

use super::{Fault, Flags, Instruction, Processor};
use crate::memory::Byte;

impl Processor {
    /// Runs an ALU operation on registers `a` and `b`. The result is stored in `a`.
    pub(super) fn alu(&mut self, opcode: Byte, a: Byte, b: Byte) -> Result<(), Fault> {
        let instruction = Instruction::try_from(opcode)
            .ok()
            .filter(Instruction::is_alu)
            .ok_or(Fault::UnsupportedAluOperation { opcode })?;

        // NOT only has a single operand
        if instruction == Instruction::NOT {
            let value = self.reg(a)?;
            let result = !value;
            self.set_reg(a, result)?;

            debug!("NOT R{} {}: {}", a, value, result);
            return Ok(());
        }

        let x = self.reg(a)?;
        let y = self.reg(b)?;

        let result = match instruction {
            Instruction::ADD => x.wrapping_add(y),
            Instruction::AND => x & y,
            Instruction::OR => x | y,
            Instruction::XOR => x ^ y,
            Instruction::SHL => x.checked_shl(y.into()).unwrap_or(0),
            Instruction::SHR => x.checked_shr(y.into()).unwrap_or(0),
            Instruction::MUL => x.wrapping_mul(y),
            Instruction::MOD => {
                if y == 0 {
                    self.halted = true;
                    error!("MOD R{} R{}: division by zero", a, b);
                    return Err(Fault::DivisionByZero { register: b });
                }
                x % y
            }
            Instruction::CMP => {
                self.fl = Flags::from_ordering(x.cmp(&y));

                debug!("CMP R{} R{} {} {}: {:?}", a, b, x, y, self.fl);
                return Ok(());
            }
            _ => return Err(Fault::UnsupportedAluOperation { opcode }),
        };

        self.set_reg(a, result)?;

        debug!("{} R{} R{} {} {}: {}", instruction.name(), a, b, x, y, result);
        Ok(())
    }
}

impl Flags {
    /// The flag matching the outcome of a comparison
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Flags::LESS,
            Ordering::Greater => Flags::GREATER,
            Ordering::Equal => Flags::EQUAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    /// Every register pair with a spread of values, including both bounds
    const VALUES: [Byte; 8] = [0, 1, 2, 7, 8, 127, 128, 255];

    fn loaded(x: Byte, y: Byte) -> Processor {
        let mut cpu = Processor::default();
        cpu.registers[0] = x;
        cpu.registers[1] = y;
        cpu.registers[2] = 0x5A;
        cpu
    }

    fn check_binary(instruction: Instruction, expected: impl Fn(Byte, Byte) -> Byte) -> Result<()> {
        for &x in VALUES.iter() {
            for &y in VALUES.iter() {
                let mut cpu = loaded(x, y);
                cpu.alu(instruction.into(), 0, 1)?;

                let mut cpu2 = loaded(x, y);
                cpu2.registers[0] = expected(x, y);
                assert_eq!(cpu, cpu2, "{} {} {}", instruction, x, y);
            }
        }

        Ok(())
    }

    #[test]
    fn test_add() -> Result<()> {
        check_binary(Instruction::ADD, |x, y| ((x as u16 + y as u16) % 256) as Byte)
    }

    #[test]
    fn test_mul() -> Result<()> {
        check_binary(Instruction::MUL, |x, y| ((x as u16 * y as u16) % 256) as Byte)
    }

    #[test]
    fn test_bitwise() -> Result<()> {
        check_binary(Instruction::AND, |x, y| x & y)?;
        check_binary(Instruction::OR, |x, y| x | y)?;
        check_binary(Instruction::XOR, |x, y| x ^ y)
    }

    #[test]
    fn test_shifts() -> Result<()> {
        check_binary(Instruction::SHL, |x, y| ((x as u32) << y.min(8)) as Byte)?;
        check_binary(Instruction::SHR, |x, y| ((x as u32) >> y.min(8)) as Byte)
    }

    #[test]
    fn test_shift_right_is_logical() -> Result<()> {
        let mut cpu = loaded(0b1000_0000, 7);
        cpu.alu(Instruction::SHR.into(), 0, 1)?;
        assert_eq!(cpu.registers[0], 1);

        Ok(())
    }

    #[test]
    fn test_mod() -> Result<()> {
        for &x in VALUES.iter() {
            for &y in VALUES.iter().filter(|y| **y != 0) {
                let mut cpu = loaded(x, y);
                cpu.alu(Instruction::MOD.into(), 0, 1)?;
                assert_eq!(cpu.registers[0], x % y);
                assert!(!cpu.halted);
            }
        }

        Ok(())
    }

    #[test]
    fn test_mod_by_zero_halts() {
        let mut cpu = loaded(42, 0);
        let err = cpu.alu(Instruction::MOD.into(), 0, 1).unwrap_err();

        assert!(matches!(err, Fault::DivisionByZero { register: 1 }));
        assert!(cpu.halted);
        assert_eq!(cpu.registers[0], 42);
    }

    #[test]
    fn test_not() -> Result<()> {
        let mut cpu = loaded(0b1010_0101, 3);
        cpu.alu(Instruction::NOT.into(), 0, 9)?;

        assert_eq!(cpu.registers[0], 0b0101_1010);
        assert_eq!(cpu.registers[1], 3);

        Ok(())
    }

    #[test]
    fn test_compare_sets_exactly_one_flag() -> Result<()> {
        for x in 0..=Byte::MAX {
            for y in 0..=Byte::MAX {
                let mut cpu = loaded(x, y);
                cpu.alu(Instruction::CMP.into(), 0, 1)?;

                let expected = if x < y {
                    Flags::LESS
                } else if x > y {
                    Flags::GREATER
                } else {
                    Flags::EQUAL
                };
                assert_eq!(cpu.fl, expected);
                assert_eq!(cpu.fl.bits().count_ones(), 1);
                assert_eq!(cpu.registers, loaded(x, y).registers);
            }
        }

        Ok(())
    }

    #[test]
    fn test_compare_overwrites_previous_flag() -> Result<()> {
        let mut cpu = loaded(0, 255);
        cpu.alu(Instruction::CMP.into(), 0, 1)?;
        assert_eq!(cpu.fl, Flags::LESS);

        cpu.alu(Instruction::CMP.into(), 1, 0)?;
        assert_eq!(cpu.fl, Flags::GREATER);

        cpu.alu(Instruction::CMP.into(), 1, 1)?;
        assert_eq!(cpu.fl, Flags::EQUAL);

        Ok(())
    }

    #[test]
    fn test_unsupported_operation() {
        let mut cpu = Processor::default();

        let err = cpu.alu(0b1010_1111, 0, 1).unwrap_err();
        assert!(matches!(err, Fault::UnsupportedAluOperation { opcode: 0xAF }));

        let err = cpu.alu(Instruction::LDI.into(), 0, 1).unwrap_err();
        assert!(matches!(err, Fault::UnsupportedAluOperation { opcode: 0x82 }));
    }

    #[test]
    fn test_invalid_register() {
        let mut cpu = Processor::default();

        let err = cpu.alu(Instruction::ADD.into(), 0, 8).unwrap_err();
        assert!(matches!(err, Fault::InvalidRegister { index: 8 }));
        assert_eq!(cpu, Processor::default());
    }
}
