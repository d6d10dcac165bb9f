//! Emulator for the LS-8, an 8 bit machine with eight registers and 256 bytes
//! of memory.
//!
//! ```
//! use ls8::memory::StdMem;
//! use ls8::processor::Processor;
//!
//! let mut mem: StdMem = "10000010\n00000000\n00101010\n01000111\n00000000\n00000001"
//!     .parse()
//!     .unwrap();
//! let mut cpu = Processor::new();
//! let mut out = Vec::new();
//!
//! cpu.execute_until_halt(&mut mem, &mut out).unwrap();
//! assert_eq!(out, b"42\n");
//! ```

pub mod memory;
pub mod processor;
