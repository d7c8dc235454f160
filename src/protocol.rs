//! Wire-level constants and enumerations: command/response bytes, error
//! codes, memory spaces and operations. Values here are bit-exact on the
//! wire — do not renumber.

/// Frame start-of-transmission marker.
pub const STX: u8 = 0x02;

/// The only API version this server speaks.
pub const API_VERSION: u8 = 0x01;

/// Reserved `request_id` that marks an unsolicited event rather than a
/// response to a specific command.
pub const EVENT_ID: u32 = 0xFFFF_FFFF;

/// Fixed header bytes following `STX` + `api_version` + `body_length`:
/// `request_id(4) + command_type(1)`.
pub const REMAINING_HEADER_SIZE: usize = 5;

/// Hard upper bound on a single frame's body, defending the growable
/// receive buffer against a hostile or corrupt `body_length`.
pub const MAX_BODY_LEN: u32 = 16 * 1024 * 1024;

/// Command bytes accepted in a request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    MemGet,
    MemSet,
    CheckpointGet,
    CheckpointSet,
    CheckpointDelete,
    CheckpointList,
    CheckpointToggle,
    ConditionSet,
    RegistersGet,
    RegistersSet,
    AdvanceInstructions,
    KeyboardFeed,
    ExecuteUntilReturn,
    Ping,
    BanksAvailable,
    RegistersAvailable,
    Exit,
    Quit,
    Reset,
    Autostart,
    Unknown(u8),
}

impl CommandType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::MemGet,
            0x02 => Self::MemSet,
            0x11 => Self::CheckpointGet,
            0x12 => Self::CheckpointSet,
            0x13 => Self::CheckpointDelete,
            0x14 => Self::CheckpointList,
            0x15 => Self::CheckpointToggle,
            0x22 => Self::ConditionSet,
            0x31 => Self::RegistersGet,
            0x32 => Self::RegistersSet,
            0x71 => Self::AdvanceInstructions,
            0x72 => Self::KeyboardFeed,
            0x73 => Self::ExecuteUntilReturn,
            0x81 => Self::Ping,
            0x82 => Self::BanksAvailable,
            0x83 => Self::RegistersAvailable,
            0xaa => Self::Exit,
            0xbb => Self::Quit,
            0xcc => Self::Reset,
            0xdd => Self::Autostart,
            other => Self::Unknown(other),
        }
    }
}

/// Response type byte, written in place of the request's command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    MemGet = 0x01,
    MemSet = 0x02,
    CheckpointInfo = 0x11,
    CheckpointDelete = 0x13,
    CheckpointList = 0x14,
    CheckpointToggle = 0x15,
    ConditionSet = 0x22,
    RegisterInfo = 0x31,
    Jam = 0x61,
    Stopped = 0x62,
    Resumed = 0x63,
    AdvanceInstructions = 0x71,
    KeyboardFeed = 0x72,
    ExecuteUntilReturn = 0x73,
    Ping = 0x81,
    BanksAvailable = 0x82,
    RegistersAvailable = 0x83,
    Exit = 0xaa,
    Quit = 0xbb,
    Reset = 0xcc,
    Autostart = 0xdd,
    /// Used only for the `CMD_INVALID_LENGTH` failure path, which the
    /// original protocol always tags with response type 0 regardless of
    /// the command that failed (see DESIGN.md).
    None = 0x00,
}

/// Error codes carried in every response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0x00,
    CmdInvalidLength = 0x80,
    InvalidParameter = 0x81,
}

/// One of the five memory spaces addressable by `MEM_GET`/`MEM_SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemSpace {
    Computer,
    Drive8,
    Drive9,
    Drive10,
    Drive11,
}

impl MemSpace {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Computer),
            1 => Some(Self::Drive8),
            2 => Some(Self::Drive9),
            3 => Some(Self::Drive10),
            4 => Some(Self::Drive11),
            _ => None,
        }
    }
}

/// Load/store/exec bitmask used by checkpoints. Bits mirror the original
/// protocol: `load = 1`, `store = 2`, `exec = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemOp(pub u8);

impl MemOp {
    pub const LOAD: u8 = 1;
    pub const STORE: u8 = 2;
    pub const EXEC: u8 = 4;

    pub fn load(self) -> bool {
        self.0 & Self::LOAD != 0
    }

    pub fn store(self) -> bool {
        self.0 & Self::STORE != 0
    }

    pub fn exec(self) -> bool {
        self.0 & Self::EXEC != 0
    }
}
