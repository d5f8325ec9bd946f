//! Numeric code decode tables
//!
//! The numbers are an external contract with host control software and
//! must not drift. Aliased numbers (M3/M101, M5/M103, M7/M106, M9/M107,
//! M135/M247) decode to one variant so the behavior cannot fork.

/// Motion-code (G family) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GCode {
    /// G0 - rapid, unsynchronised motion
    Rapid,
    /// G1 - synchronised linear motion
    Linear,
    /// G4 - dwell
    Dwell,
    /// G20 - inches as units
    InchUnits,
    /// G21 - millimeters as units
    MillimeterUnits,
    /// G28 - go home
    Home,
    /// G30 - move to the given point, then go home
    MoveThenHome,
    /// G90 - absolute positioning
    AbsoluteMode,
    /// G91 - relative positioning
    RelativeMode,
    /// G92 - set home
    SetHome,
    /// G161 - home to negative endstops
    HomeNegative,
    /// G162 - home to positive endstops
    HomePositive,
}

impl GCode {
    /// Decode a G number; unknown numbers are reported as errors upstream
    pub fn from_number(number: u16) -> Option<Self> {
        match number {
            0 => Some(GCode::Rapid),
            1 => Some(GCode::Linear),
            4 => Some(GCode::Dwell),
            20 => Some(GCode::InchUnits),
            21 => Some(GCode::MillimeterUnits),
            28 => Some(GCode::Home),
            30 => Some(GCode::MoveThenHome),
            90 => Some(GCode::AbsoluteMode),
            91 => Some(GCode::RelativeMode),
            92 => Some(GCode::SetHome),
            161 => Some(GCode::HomeNegative),
            162 => Some(GCode::HomePositive),
            _ => None,
        }
    }
}

/// Machine-code (M family) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MCode {
    /// M2 - program end, terminal
    ProgramEnd,
    /// M3/M101 - extruder on
    ExtruderOn,
    /// M5/M103 - extruder off
    ExtruderOff,
    /// M6 - tool change
    ToolChange,
    /// M7/M106 - fan on
    FanOn,
    /// M9/M107 - fan off
    FanOff,
    /// M20 - list storage (accepted no-op)
    ListStorage,
    /// M21 - mount storage volume
    MountStorage,
    /// M22 - release storage volume
    ReleaseStorage,
    /// M23 - open file for reading
    SelectFile,
    /// M24 - start/resume reading
    StartRead,
    /// M25 - pause reading
    PauseRead,
    /// M26 - seek within the open file
    SeekFile,
    /// M27 - report storage status (accepted no-op)
    ReportStorageStatus,
    /// M28 - begin writing a file
    BeginWrite,
    /// M29 - stop writing
    EndWrite,
    /// M104 - set temperature
    SetTemperature,
    /// M105 - report temperature
    ReportTemperature,
    /// M109 - set temperature and wait
    SetTemperatureWait,
    /// M110 - set line number (accepted no-op)
    SetLineNumber,
    /// M111 - set debug flags
    SetDebugFlags,
    /// M112 - immediate stop
    EmergencyStop,
    /// M114 - report position
    ReportPosition,
    /// M115 - report capabilities
    ReportCapabilities,
    /// M116 - wait for slow variables to settle
    WaitForSlowVariables,
    /// M130 - heater P factor
    SetPidP,
    /// M131 - heater I factor
    SetPidI,
    /// M132 - heater D factor
    SetPidD,
    /// M133 - heater I limit
    SetPidLimit,
    /// M134 - persist PID settings
    SavePid,
    /// M135/M247 - set heater output directly
    SetHeaterOutput,
    /// M136 - report PID settings
    ReportPid,
    /// M140 - set heated-bed temperature
    SetBedTemperature,
    /// M190 - power on
    PowerOn,
    /// M191 - power off
    PowerOff,
    /// M244 - persisted config: baud rate
    SetBaudRate,
    /// M245 - persisted config: thermistor table row
    SetTempTableRow,
    /// M249 - persisted config: temperature residency time
    SetTempResidency,
    /// M250 - persisted config: Z min endstop offset
    SetEndstopOffsetZ,
    /// M251 - reserved: max bed temperature (accepted no-op)
    SetMaxBedTemp,
    /// M253 - persisted config: per-axis speed limits
    SetSpeedLimits,
    /// M254 - persisted config: build volume
    SetBuildVolume,
    /// M255 - persisted config: steps per mm
    SetStepsPerUnit,
    /// M340 - echo off
    EchoOff,
    /// M341 - echo on
    EchoOn,
    /// M350 - dump position and queue
    DumpState,
    /// M353 - read diagnostic scratch bytes
    PeekScratch,
    /// M354 - write a diagnostic scratch byte
    PokeScratch,
}

impl MCode {
    /// Decode an M number
    pub fn from_number(number: u16) -> Option<Self> {
        match number {
            2 => Some(MCode::ProgramEnd),
            3 | 101 => Some(MCode::ExtruderOn),
            5 | 103 => Some(MCode::ExtruderOff),
            6 => Some(MCode::ToolChange),
            7 | 106 => Some(MCode::FanOn),
            9 | 107 => Some(MCode::FanOff),
            20 => Some(MCode::ListStorage),
            21 => Some(MCode::MountStorage),
            22 => Some(MCode::ReleaseStorage),
            23 => Some(MCode::SelectFile),
            24 => Some(MCode::StartRead),
            25 => Some(MCode::PauseRead),
            26 => Some(MCode::SeekFile),
            27 => Some(MCode::ReportStorageStatus),
            28 => Some(MCode::BeginWrite),
            29 => Some(MCode::EndWrite),
            104 => Some(MCode::SetTemperature),
            105 => Some(MCode::ReportTemperature),
            109 => Some(MCode::SetTemperatureWait),
            110 => Some(MCode::SetLineNumber),
            111 => Some(MCode::SetDebugFlags),
            112 => Some(MCode::EmergencyStop),
            114 => Some(MCode::ReportPosition),
            115 => Some(MCode::ReportCapabilities),
            116 => Some(MCode::WaitForSlowVariables),
            130 => Some(MCode::SetPidP),
            131 => Some(MCode::SetPidI),
            132 => Some(MCode::SetPidD),
            133 => Some(MCode::SetPidLimit),
            134 => Some(MCode::SavePid),
            135 | 247 => Some(MCode::SetHeaterOutput),
            136 => Some(MCode::ReportPid),
            140 => Some(MCode::SetBedTemperature),
            190 => Some(MCode::PowerOn),
            191 => Some(MCode::PowerOff),
            244 => Some(MCode::SetBaudRate),
            245 => Some(MCode::SetTempTableRow),
            249 => Some(MCode::SetTempResidency),
            250 => Some(MCode::SetEndstopOffsetZ),
            251 => Some(MCode::SetMaxBedTemp),
            253 => Some(MCode::SetSpeedLimits),
            254 => Some(MCode::SetBuildVolume),
            255 => Some(MCode::SetStepsPerUnit),
            340 => Some(MCode::EchoOff),
            341 => Some(MCode::EchoOn),
            350 => Some(MCode::DumpState),
            353 => Some(MCode::PeekScratch),
            354 => Some(MCode::PokeScratch),
            _ => None,
        }
    }
}
