use crate::PROGRAM_START;

/// Number of general-purpose data registers (`V0..VF`).
pub const REGISTER_COUNT: usize = 16;

/// Data register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    VF = 0xF,
}

impl Register {
    /// Carry/borrow/collision flag register.
    pub const FLAG: Self = Self::VF;

    /// Ordered list of all data registers.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::VA,
        Self::VB,
        Self::VC,
        Self::VD,
        Self::VE,
        Self::VF,
    ];

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes the low 4 bits of `bits` into a register.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Registers `V0` through `self`, inclusive.
    #[must_use]
    pub fn through(self) -> &'static [Self] {
        let all: &'static [Self; REGISTER_COUNT] = &Self::ALL;
        &all[..=self.index()]
    }
}

/// Data registers plus the index register and program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    v: [u8; REGISTER_COUNT],
    index: u16,
    pc: u16,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            index: 0,
            pc: PROGRAM_START,
        }
    }
}

impl RegisterFile {
    /// Reads a data register.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.v[reg.index()]
    }

    /// Writes a data register.
    pub const fn set_v(&mut self, reg: Register, value: u8) {
        self.v[reg.index()] = value;
    }

    /// Reads the flag register `VF`.
    #[must_use]
    pub const fn flag(&self) -> u8 {
        self.v(Register::FLAG)
    }

    /// Writes the flag register `VF`.
    pub const fn set_flag(&mut self, value: u8) {
        self.set_v(Register::FLAG, value);
    }

    /// All sixteen data registers in index order.
    #[must_use]
    pub const fn values(&self) -> [u8; REGISTER_COUNT] {
        self.v
    }

    /// Reads the index register `I`.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Writes the index register `I`.
    pub const fn set_index(&mut self, value: u16) {
        self.index = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
}
