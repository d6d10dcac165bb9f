use std::fs;
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{Result, WrapErr};

pub mod parse;

pub type Byte = u8; // 1 byte

/// Number of addressable cells. Every `Byte` is a valid address.
pub const MEMORY_SIZE: usize = 256;

/// Default memory
pub type StdMem = Memory;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory {
    /// The actual data of the memory
    pub data: [Byte; MEMORY_SIZE],
}

impl Default for Memory {
    /// Initializes the memory
    fn default() -> Self {
        Memory {
            data: [0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Byte) -> Byte {
        self.data[position as usize]
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Byte, value: Byte) {
        self.data[position as usize] = value;
    }

    /// Writes an array of bytes to the memory, wrapping around at the end
    pub fn write_array(&mut self, position: Byte, data: &[Byte]) {
        for (offset, byte) in data.iter().enumerate() {
            let address = position.wrapping_add(offset as Byte);
            self.write_byte(address, *byte);
        }
    }

    /// Loads a program image from `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read program `{}`", path.display()))?;

        data.parse()
            .wrap_err_with(|| format!("failed to load program `{}`", path.display()))
    }

    /// Logs the non-empty rows of the memory, 16 bytes per row
    pub fn dump(&self) {
        for (row, chunk) in self.data.chunks(16).enumerate() {
            if chunk.iter().all(|byte| *byte == 0) {
                continue;
            }

            let bytes = chunk
                .iter()
                .map(|byte| format!("{:02X}", byte))
                .collect::<Vec<_>>()
                .join(" ");
            log::info!("0x{:02X}: {}", row * 16, bytes);
        }
    }
}

impl FromStr for Memory {
    type Err = parse::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::Parser::new(s, Memory::default()).parse()
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_instructions {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ]);
    };
}
