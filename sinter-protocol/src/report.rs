//! Console line formatting
//!
//! Every line the controller writes to the host goes through here. The
//! exact texts are protocol: existing control software matches on them.
//! All formatting targets fixed-capacity buffers; a line that somehow
//! exceeds its buffer is truncated rather than failed, the same way a
//! saturated serial link drops the tail.

use core::fmt::Write;

use heapless::String;

/// Firmware identity reported by the capabilities query
pub const FIRMWARE_NAME: &str = "Sinter";
/// Project URL reported by the capabilities query
pub const FIRMWARE_URL: &str = "http://github.com/sinter-fw/sinter";
/// Protocol revision reported by the capabilities query
pub const PROTOCOL_VERSION: &str = "1.0";
/// Machine geometry reported by the capabilities query
pub const MACHINE_TYPE: &str = "Mendel";

/// Write a micrometer count as millimeters with three decimals
fn write_mm<const N: usize>(out: &mut String<N>, um: i32) {
    let sign = if um < 0 { "-" } else { "" };
    let a = um.unsigned_abs();
    let _ = write!(out, "{}{}.{:03}", sign, a / 1000, a % 1000);
}

/// Unknown motion-code error line
pub fn bad_gcode(number: u16) -> String<24> {
    let mut s = String::new();
    let _ = write!(s, "E: Bad G-code {}", number);
    s
}

/// Unknown machine-code error line
pub fn bad_mcode(number: u16) -> String<24> {
    let mut s = String::new();
    let _ = write!(s, "E: Bad M-code {}", number);
    s
}

/// Position report (M114): axes in mm, feed rate in mm/min
pub fn position(x_um: i32, y_um: i32, z_um: i32, e_um: i32, feedrate: u32) -> String<96> {
    let mut s = String::new();
    let _ = s.push_str("X:");
    write_mm(&mut s, x_um);
    let _ = s.push_str(",Y:");
    write_mm(&mut s, y_um);
    let _ = s.push_str(",Z:");
    write_mm(&mut s, z_um);
    let _ = s.push_str(",E:");
    write_mm(&mut s, e_um);
    let _ = write!(s, ",F:{}", feedrate);
    s
}

/// Capabilities string (M115)
pub fn capabilities(extruder_count: u8, sensor_count: u8, heater_count: u8) -> String<192> {
    let mut s = String::new();
    let _ = write!(
        s,
        "FIRMWARE_NAME:{} FIRMWARE_URL:{} PROTOCOL_VERSION:{} MACHINE_TYPE:{} \
         EXTRUDER_COUNT:{} TEMP_SENSOR_COUNT:{} HEATER_COUNT:{}",
        FIRMWARE_NAME,
        FIRMWARE_URL,
        PROTOCOL_VERSION,
        MACHINE_TYPE,
        extruder_count,
        sensor_count,
        heater_count
    );
    s
}

/// Temperature report (M105), reading in deci-degrees Celsius
pub fn temperature(deci_celsius: i16) -> String<16> {
    let mut s = String::new();
    let sign = if deci_celsius < 0 { "-" } else { "" };
    let a = deci_celsius.unsigned_abs();
    let _ = write!(s, "T:{}{}.{}", sign, a / 10, a % 10);
    s
}

/// PID settings report (M136)
pub fn pid_settings(sensor: u8, kp: i32, ki: i32, kd: i32, i_limit: i32) -> String<80> {
    let mut s = String::new();
    let _ = write!(s, "S:{} P:{} I:{} D:{} ILim:{}", sensor, kp, ki, kd, i_limit);
    s
}

/// Echo-toggle confirmation (M340/M341)
pub fn echo(on: bool) -> &'static str {
    if on {
        "Echo on"
    } else {
        "Echo off"
    }
}

/// Storage mounted confirmation (M21)
pub fn storage_mounted() -> &'static str {
    "Storage initialised"
}

/// Storage mount failure (M21)
pub fn storage_mount_failed(code: u8) -> String<40> {
    let mut s = String::new();
    let _ = write!(s, "E: storage init failed: {}", code);
    s
}

/// File opened for reading (M23)
pub fn file_ready(name: &str) -> String<48> {
    let mut s = String::new();
    let _ = write!(s, "'{}' ready", name);
    s
}

/// File open failure (M23)
pub fn open_failed(name: &str, code: u8) -> String<64> {
    let mut s = String::new();
    let _ = write!(s, "E: could not open '{}': {}", name, code);
    s
}

/// Seek confirmation with byte offset (M26)
pub fn seek_ok(offset: u32) -> String<48> {
    let mut s = String::new();
    let _ = write!(s, "Ready to print from {} bytes", offset);
    s
}

/// Seek failure (M26)
pub fn seek_failed(code: u8) -> String<32> {
    let mut s = String::new();
    let _ = write!(s, "E: seek failed: {}", code);
    s
}

/// Write session opened (M28)
pub fn write_ready(name: &str) -> String<64> {
    let mut s = String::new();
    let _ = write!(s, "Ready to write to '{}'", name);
    s
}

/// Write-open failure (M28)
pub fn write_failed(code: u8) -> String<40> {
    let mut s = String::new();
    let _ = write!(s, "E: begin write failed: {}", code);
    s
}

/// Diagnostic scratch dump (M353): space-separated hex bytes
pub fn peek(bytes: &[u8]) -> String<64> {
    let mut s = String::new();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            let _ = s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Diagnostic scratch write report (M354)
pub fn poke(addr: u32, old: u8, new: u8) -> String<32> {
    let mut s = String::new();
    let _ = write!(s, "{:x}:{:x}->{:x}", addr, old, new);
    s
}

/// Out-of-range diagnostic address (M353/M354)
pub fn bad_address(addr: i32) -> String<32> {
    let mut s = String::new();
    let _ = write!(s, "E: Bad address {}", addr);
    s
}
