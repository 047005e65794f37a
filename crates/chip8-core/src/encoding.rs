/// Primary opcode groups (high nibble of the instruction word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum OpcodeGroup {
    System = 0x0,
    Jump = 0x1,
    Call = 0x2,
    SkipEqualImm = 0x3,
    SkipNotEqualImm = 0x4,
    SkipRegsEqual = 0x5,
    LoadImm = 0x6,
    AddImm = 0x7,
    Alu = 0x8,
    SkipRegsNotEqual = 0x9,
    LoadIndex = 0xA,
    JumpPlusV0 = 0xB,
    Random = 0xC,
    Draw = 0xD,
    Key = 0xE,
    Misc = 0xF,
}

impl OpcodeGroup {
    /// Converts a 4-bit primary opcode value into its group.
    ///
    /// Every nibble is assigned; bits above the low nibble are ignored.
    #[must_use]
    pub const fn from_u4(op: u8) -> Self {
        match op & 0x0F {
            0x0 => Self::System,
            0x1 => Self::Jump,
            0x2 => Self::Call,
            0x3 => Self::SkipEqualImm,
            0x4 => Self::SkipNotEqualImm,
            0x5 => Self::SkipRegsEqual,
            0x6 => Self::LoadImm,
            0x7 => Self::AddImm,
            0x8 => Self::Alu,
            0x9 => Self::SkipRegsNotEqual,
            0xA => Self::LoadIndex,
            0xB => Self::JumpPlusV0,
            0xC => Self::Random,
            0xD => Self::Draw,
            0xE => Self::Key,
            _ => Self::Misc,
        }
    }

    /// Which part of the word further selects the operation within this group.
    #[must_use]
    pub const fn selector(self) -> SecondarySelector {
        match self {
            Self::System => SecondarySelector::FullWord,
            Self::Alu => SecondarySelector::LowNibble,
            Self::Key | Self::Misc => SecondarySelector::LowByte,
            _ => SecondarySelector::None,
        }
    }
}

/// Secondary selector field used by multi-operation groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondarySelector {
    /// The group nibble alone selects the operation.
    None,
    /// The whole 16-bit word is compared (`00E0`, `00EE`).
    FullWord,
    /// Bits 0..3 (`8xyN`).
    LowNibble,
    /// Bits 0..7 (`ExNN`, `FxNN`).
    LowByte,
}

/// Operand fields extracted from an instruction word.
///
/// All fields are extracted unconditionally; each operation reads only the
/// ones its encoding defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandFields {
    /// Primary group (bits 12..15).
    pub group: OpcodeGroup,
    /// First register nibble (bits 8..11).
    pub x: u8,
    /// Second register nibble (bits 4..7).
    pub y: u8,
    /// Low nibble (bits 0..3).
    pub n: u8,
    /// Low byte (bits 0..7).
    pub kk: u8,
    /// Low 12 bits, an address.
    pub nnn: u16,
    /// Value of the group's secondary selector field, `0` when it has none.
    pub selector: u16,
}

impl OperandFields {
    /// Splits `word` into its operand fields.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_word(word: u16) -> Self {
        let group = OpcodeGroup::from_u4((word >> 12) as u8);
        let selector = match group.selector() {
            SecondarySelector::None => 0,
            SecondarySelector::FullWord => word,
            SecondarySelector::LowNibble => word & 0x000F,
            SecondarySelector::LowByte => word & 0x00FF,
        };
        Self {
            group,
            x: ((word >> 8) & 0x000F) as u8,
            y: ((word >> 4) & 0x000F) as u8,
            n: (word & 0x000F) as u8,
            kk: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
            selector,
        }
    }
}
