//! Instruction decoder.
//!
//! Turns a 16-bit instruction word into a tagged [`Instruction`] value. Any
//! word that matches no operation yields [`FaultCode::UnrecognizedInstruction`].

use crate::encoding::{OpcodeGroup, OperandFields};
use crate::fault::FaultCode;
use crate::state::Register;

/// A decoded operation with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Instruction {
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1nnn`
    Jump { addr: u16 },
    /// `2nnn`
    Call { addr: u16 },
    /// `3xkk`
    SkipIfEqualImm { x: Register, kk: u8 },
    /// `4xkk`
    SkipIfNotEqualImm { x: Register, kk: u8 },
    /// `5xy0`
    SkipIfRegsEqual { x: Register, y: Register },
    /// `6xkk`
    LoadImm { x: Register, kk: u8 },
    /// `7xkk`
    AddImm { x: Register, kk: u8 },
    /// `8xy0`
    LoadReg { x: Register, y: Register },
    /// `8xy1`
    Or { x: Register, y: Register },
    /// `8xy2`
    And { x: Register, y: Register },
    /// `8xy3`
    Xor { x: Register, y: Register },
    /// `8xy4`
    AddReg { x: Register, y: Register },
    /// `8xy5`
    Sub { x: Register, y: Register },
    /// `8xy6`
    ShiftRight { x: Register, y: Register },
    /// `8xy7`
    SubReverse { x: Register, y: Register },
    /// `8xyE`
    ShiftLeft { x: Register, y: Register },
    /// `9xy0`
    SkipIfRegsNotEqual { x: Register, y: Register },
    /// `Annn`
    LoadIndex { addr: u16 },
    /// `Bnnn`
    JumpPlusV0 { addr: u16 },
    /// `Cxkk`
    Random { x: Register, kk: u8 },
    /// `Dxyn`
    Draw { x: Register, y: Register, n: u8 },
    /// `Ex9E`
    SkipIfKeyDown { x: Register },
    /// `ExA1`
    SkipIfKeyUp { x: Register },
    /// `Fx07`
    LoadDelay { x: Register },
    /// `Fx0A`
    WaitKey { x: Register },
    /// `Fx15`
    SetDelay { x: Register },
    /// `Fx18`
    SetSound { x: Register },
    /// `Fx1E`
    AddIndex { x: Register },
    /// `Fx29`
    FontGlyph { x: Register },
    /// `Fx33`
    StoreBcd { x: Register },
    /// `Fx55`
    DumpRegisters { x: Register },
    /// `Fx65`
    LoadRegisters { x: Register },
}

impl Instruction {
    /// Re-encodes this instruction into its canonical 16-bit word.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn encode(self) -> u16 {
        const fn xy(group: u16, x: Register, y: Register, low: u16) -> u16 {
            (group << 12) | ((x as u16) << 8) | ((y as u16) << 4) | low
        }
        const fn xkk(group: u16, x: Register, kk: u8) -> u16 {
            (group << 12) | ((x as u16) << 8) | kk as u16
        }

        match self {
            Self::ClearScreen => 0x00E0,
            Self::Return => 0x00EE,
            Self::Jump { addr } => 0x1000 | (addr & 0x0FFF),
            Self::Call { addr } => 0x2000 | (addr & 0x0FFF),
            Self::SkipIfEqualImm { x, kk } => xkk(0x3, x, kk),
            Self::SkipIfNotEqualImm { x, kk } => xkk(0x4, x, kk),
            Self::SkipIfRegsEqual { x, y } => xy(0x5, x, y, 0x0),
            Self::LoadImm { x, kk } => xkk(0x6, x, kk),
            Self::AddImm { x, kk } => xkk(0x7, x, kk),
            Self::LoadReg { x, y } => xy(0x8, x, y, 0x0),
            Self::Or { x, y } => xy(0x8, x, y, 0x1),
            Self::And { x, y } => xy(0x8, x, y, 0x2),
            Self::Xor { x, y } => xy(0x8, x, y, 0x3),
            Self::AddReg { x, y } => xy(0x8, x, y, 0x4),
            Self::Sub { x, y } => xy(0x8, x, y, 0x5),
            Self::ShiftRight { x, y } => xy(0x8, x, y, 0x6),
            Self::SubReverse { x, y } => xy(0x8, x, y, 0x7),
            Self::ShiftLeft { x, y } => xy(0x8, x, y, 0xE),
            Self::SkipIfRegsNotEqual { x, y } => xy(0x9, x, y, 0x0),
            Self::LoadIndex { addr } => 0xA000 | (addr & 0x0FFF),
            Self::JumpPlusV0 { addr } => 0xB000 | (addr & 0x0FFF),
            Self::Random { x, kk } => xkk(0xC, x, kk),
            Self::Draw { x, y, n } => xy(0xD, x, y, (n & 0x0F) as u16),
            Self::SkipIfKeyDown { x } => xkk(0xE, x, 0x9E),
            Self::SkipIfKeyUp { x } => xkk(0xE, x, 0xA1),
            Self::LoadDelay { x } => xkk(0xF, x, 0x07),
            Self::WaitKey { x } => xkk(0xF, x, 0x0A),
            Self::SetDelay { x } => xkk(0xF, x, 0x15),
            Self::SetSound { x } => xkk(0xF, x, 0x18),
            Self::AddIndex { x } => xkk(0xF, x, 0x1E),
            Self::FontGlyph { x } => xkk(0xF, x, 0x29),
            Self::StoreBcd { x } => xkk(0xF, x, 0x33),
            Self::DumpRegisters { x } => xkk(0xF, x, 0x55),
            Self::LoadRegisters { x } => xkk(0xF, x, 0x65),
        }
    }
}

/// Result of decoding an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedOrFault {
    /// Successfully decoded instruction.
    Instruction(Instruction),
    /// No operation matches the word.
    Fault(FaultCode),
}

impl DecodedOrFault {
    /// Returns the decoded instruction if present.
    #[must_use]
    pub const fn instruction(self) -> Option<Instruction> {
        match self {
            Self::Instruction(i) => Some(i),
            Self::Fault(_) => None,
        }
    }

    /// Returns the fault if decoding failed.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Instruction(_) => None,
            Self::Fault(f) => Some(f),
        }
    }
}

impl From<DecodedOrFault> for Result<Instruction, FaultCode> {
    fn from(value: DecodedOrFault) -> Self {
        match value {
            DecodedOrFault::Instruction(i) => Ok(i),
            DecodedOrFault::Fault(code) => Err(code),
        }
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit instruction word.
    ///
    /// Groups `0x0`, `0x8`, `0xE` and `0xF` dispatch on a secondary selector
    /// (full word, low nibble, low byte); the others on the group nibble alone.
    /// `5xy0` and `9xy0` accept any low nibble.
    #[must_use]
    pub const fn decode(word: u16) -> DecodedOrFault {
        let f = OperandFields::from_word(word);
        let x = Register::from_nibble(f.x);
        let y = Register::from_nibble(f.y);

        let instr = match f.group {
            OpcodeGroup::System => match f.selector {
                0x00E0 => Instruction::ClearScreen,
                0x00EE => Instruction::Return,
                _ => return unrecognized(),
            },
            OpcodeGroup::Jump => Instruction::Jump { addr: f.nnn },
            OpcodeGroup::Call => Instruction::Call { addr: f.nnn },
            OpcodeGroup::SkipEqualImm => Instruction::SkipIfEqualImm { x, kk: f.kk },
            OpcodeGroup::SkipNotEqualImm => Instruction::SkipIfNotEqualImm { x, kk: f.kk },
            OpcodeGroup::SkipRegsEqual => Instruction::SkipIfRegsEqual { x, y },
            OpcodeGroup::LoadImm => Instruction::LoadImm { x, kk: f.kk },
            OpcodeGroup::AddImm => Instruction::AddImm { x, kk: f.kk },
            OpcodeGroup::Alu => match f.selector {
                0x0 => Instruction::LoadReg { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddReg { x, y },
                0x5 => Instruction::Sub { x, y },
                0x6 => Instruction::ShiftRight { x, y },
                0x7 => Instruction::SubReverse { x, y },
                0xE => Instruction::ShiftLeft { x, y },
                _ => return unrecognized(),
            },
            OpcodeGroup::SkipRegsNotEqual => Instruction::SkipIfRegsNotEqual { x, y },
            OpcodeGroup::LoadIndex => Instruction::LoadIndex { addr: f.nnn },
            OpcodeGroup::JumpPlusV0 => Instruction::JumpPlusV0 { addr: f.nnn },
            OpcodeGroup::Random => Instruction::Random { x, kk: f.kk },
            OpcodeGroup::Draw => Instruction::Draw { x, y, n: f.n },
            OpcodeGroup::Key => match f.selector {
                0x9E => Instruction::SkipIfKeyDown { x },
                0xA1 => Instruction::SkipIfKeyUp { x },
                _ => return unrecognized(),
            },
            OpcodeGroup::Misc => match f.selector {
                0x07 => Instruction::LoadDelay { x },
                0x0A => Instruction::WaitKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1E => Instruction::AddIndex { x },
                0x29 => Instruction::FontGlyph { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::DumpRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                _ => return unrecognized(),
            },
        };

        DecodedOrFault::Instruction(instr)
    }
}

const fn unrecognized() -> DecodedOrFault {
    DecodedOrFault::Fault(FaultCode::UnrecognizedInstruction)
}

#[cfg(test)]
mod tests {
    use super::{DecodedOrFault, Decoder, Instruction};
    use crate::fault::FaultCode;
    use crate::state::Register;

    fn decoded(word: u16) -> Instruction {
        Decoder::decode(word)
            .instruction()
            .unwrap_or_else(|| panic!("{word:04X} should decode"))
    }

    #[test]
    fn decode_system_group_uses_full_word() {
        assert_eq!(decoded(0x00E0), Instruction::ClearScreen);
        assert_eq!(decoded(0x00EE), Instruction::Return);
        assert_eq!(
            Decoder::decode(0x0123).fault(),
            Some(FaultCode::UnrecognizedInstruction)
        );
    }

    #[test]
    fn decode_extracts_address_operand() {
        assert_eq!(decoded(0x1ABC), Instruction::Jump { addr: 0xABC });
        assert_eq!(decoded(0x2300), Instruction::Call { addr: 0x300 });
        assert_eq!(decoded(0xA2F0), Instruction::LoadIndex { addr: 0x2F0 });
        assert_eq!(decoded(0xB004), Instruction::JumpPlusV0 { addr: 0x004 });
    }

    #[test]
    fn decode_extracts_register_and_byte_operands() {
        assert_eq!(
            decoded(0x6A05),
            Instruction::LoadImm {
                x: Register::VA,
                kk: 0x05
            }
        );
        assert_eq!(
            decoded(0xD125),
            Instruction::Draw {
                x: Register::V1,
                y: Register::V2,
                n: 5
            }
        );
    }

    #[test]
    fn alu_group_selects_on_low_nibble() {
        let x = Register::V3;
        let y = Register::V4;
        assert_eq!(decoded(0x8344), Instruction::AddReg { x, y });
        assert_eq!(decoded(0x834E), Instruction::ShiftLeft { x, y });
        for low in [0x8u16, 0x9, 0xA, 0xB, 0xC, 0xD, 0xF] {
            assert_eq!(
                Decoder::decode(0x8340 | low),
                DecodedOrFault::Fault(FaultCode::UnrecognizedInstruction)
            );
        }
    }

    #[test]
    fn key_and_misc_groups_select_on_low_byte() {
        let x = Register::V7;
        assert_eq!(decoded(0xE79E), Instruction::SkipIfKeyDown { x });
        assert_eq!(decoded(0xE7A1), Instruction::SkipIfKeyUp { x });
        assert_eq!(decoded(0xF70A), Instruction::WaitKey { x });
        assert_eq!(decoded(0xF765), Instruction::LoadRegisters { x });
        assert!(Decoder::decode(0xE700).fault().is_some());
        assert!(Decoder::decode(0xF7FF).fault().is_some());
    }

    #[test]
    fn register_compare_skips_ignore_low_nibble() {
        let x = Register::V1;
        let y = Register::V2;
        assert_eq!(decoded(0x5127), Instruction::SkipIfRegsEqual { x, y });
        assert_eq!(decoded(0x912F), Instruction::SkipIfRegsNotEqual { x, y });
    }

    #[test]
    fn result_conversion_preserves_fault() {
        let result: Result<Instruction, FaultCode> = Decoder::decode(0xFFFF).into();
        assert_eq!(result, Err(FaultCode::UnrecognizedInstruction));
        let ok: Result<Instruction, FaultCode> = Decoder::decode(0x00E0).into();
        assert_eq!(ok, Ok(Instruction::ClearScreen));
    }

    #[test]
    fn exhaustive_decode_reencodes_canonical_words() {
        let mut recognized = 0u32;
        for word in 0u16..=u16::MAX {
            match Decoder::decode(word) {
                DecodedOrFault::Instruction(instr) => {
                    recognized += 1;
                    let canonical = instr.encode();
                    assert_eq!(
                        Decoder::decode(canonical),
                        DecodedOrFault::Instruction(instr),
                        "{word:04X} re-encodes to {canonical:04X}"
                    );
                    if !matches!(
                        instr,
                        Instruction::SkipIfRegsEqual { .. } | Instruction::SkipIfRegsNotEqual { .. }
                    ) {
                        assert_eq!(canonical, word);
                    }
                }
                DecodedOrFault::Fault(code) => {
                    assert_eq!(code, FaultCode::UnrecognizedInstruction);
                }
            }
        }
        // 2 system words, 12 whole groups, 9 ALU forms, 2 key forms, 9 misc forms.
        assert_eq!(recognized, 2 + 12 * 4096 + 9 * 256 + 2 * 16 + 9 * 16);
    }
}
