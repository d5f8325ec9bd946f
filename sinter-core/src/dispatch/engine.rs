//! The command dispatch engine
//!
//! One `Dispatcher` owns the machine state, the storage session, the
//! persisted configuration and every collaborator handle. `process` runs
//! exactly one command to completion; nothing here is re-entrant.

use sinter_protocol::{report, Command};

use crate::config::{EeConfig, ExtruderDrive, HardwareConfig};
use crate::dispatch::codes::{GCode, MCode};
use crate::homing::{self, AxisSelection};
use crate::motion::{normalize, Axis, QueueEntry, Target};
use crate::state::{CoordinateMode, MachineState, UnitMode};
use crate::storage::StorageSession;
use crate::traits::{
    Clock, Console, EndstopSeeker, MotionQueue, PowerControl, SeekDirection, StorageDevice,
    StorageError, ThermalControl, TuningParam,
};

/// Debug flag: echo received lines back to the host
pub const DEBUG_ECHO: u8 = 1 << 0;
/// Debug flag: dump the queue after every motion command
pub const DEBUG_POSITION: u8 = 1 << 1;

/// Size of the diagnostic scratch region (M353/M354)
pub const SCRATCH_LEN: usize = 16;

/// The command dispatch engine
pub struct Dispatcher<Q, H, P, E, D, C, K> {
    state: MachineState,
    session: StorageSession,
    eeconfig: EeConfig,
    hardware: HardwareConfig,
    debug_flags: u8,
    scratch: [u8; SCRATCH_LEN],
    queue: Q,
    thermal: H,
    power: P,
    endstops: E,
    storage: D,
    console: C,
    clock: K,
}

impl<Q, H, P, E, D, C, K> Dispatcher<Q, H, P, E, D, C, K>
where
    Q: MotionQueue,
    H: ThermalControl,
    P: PowerControl,
    E: EndstopSeeker,
    D: StorageDevice,
    C: Console,
    K: Clock,
{
    /// Create a dispatcher at the origin with a fresh session
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hardware: HardwareConfig,
        eeconfig: EeConfig,
        queue: Q,
        thermal: H,
        power: P,
        endstops: E,
        storage: D,
        console: C,
        clock: K,
    ) -> Self {
        Self {
            state: MachineState::new(),
            session: StorageSession::new(),
            eeconfig,
            hardware,
            debug_flags: 0,
            scratch: [0; SCRATCH_LEN],
            queue,
            thermal,
            power,
            endstops,
            storage,
            console,
            clock,
        }
    }

    /// Current machine state, for status readers
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Current storage session flags
    pub fn session(&self) -> &StorageSession {
        &self.session
    }

    /// The persisted configuration record
    pub fn eeconfig(&self) -> &EeConfig {
        &self.eeconfig
    }

    /// Current debug flags
    pub fn debug_flags(&self) -> u8 {
        self.debug_flags
    }

    /// Process one command to completion
    ///
    /// Exactly one of the G/M families is dispatched; a command naming
    /// neither is a no-op. Unknown codes report an error and leave every
    /// piece of state untouched.
    pub fn process(&mut self, cmd: &Command) {
        if self.state.halted {
            // terminal supervisory state after program end: the watchdog
            // stays fed, commands are ignored
            self.power.keep_alive();
            return;
        }

        if let Some(t) = cmd.t {
            self.state.pending_tool = t;
        }

        if let Some(number) = cmd.gcode {
            self.process_gcode(number, cmd);
        } else if let Some(number) = cmd.mcode {
            self.process_mcode(number, cmd);
        }
    }

    fn process_gcode(&mut self, number: u16, cmd: &Command) {
        let Some(code) = GCode::from_number(number) else {
            self.console.write_line(report::bad_gcode(number).as_str());
            return;
        };

        let target = normalize(&self.state, cmd, &self.hardware.limits);

        match code {
            GCode::Rapid => self.rapid_move(target),
            GCode::Linear => self.commit_move(target),
            GCode::Dwell => self.dwell(cmd.p.unwrap_or(0)),
            GCode::InchUnits => self.state.units = UnitMode::Inches,
            GCode::MillimeterUnits => self.state.units = UnitMode::Millimeters,
            GCode::Home => self.home(AxisSelection::from_command(cmd)),
            GCode::MoveThenHome => self.move_then_home(target, AxisSelection::from_command(cmd)),
            GCode::AbsoluteMode => self.state.coordinates = CoordinateMode::Absolute,
            GCode::RelativeMode => self.state.coordinates = CoordinateMode::Relative,
            GCode::SetHome => self.set_home(cmd, &target),
            GCode::HomeNegative => self.seek(cmd, SeekDirection::Negative),
            GCode::HomePositive => self.seek(cmd, SeekDirection::Positive),
        }

        if self.debug_flags & DEBUG_POSITION != 0 {
            self.queue.report(&mut self.console);
        }
    }

    fn process_mcode(&mut self, number: u16, cmd: &Command) {
        let Some(code) = MCode::from_number(number) else {
            self.console.write_line(report::bad_mcode(number).as_str());
            return;
        };

        match code {
            MCode::ProgramEnd => self.program_end(),
            MCode::ExtruderOn => self.extruder_on(),
            MCode::ExtruderOff => self.extruder_off(),
            MCode::ToolChange => self.state.active_tool = self.state.pending_tool,
            MCode::FanOn => self.set_fan(255),
            MCode::FanOff => self.set_fan(0),
            MCode::ListStorage => {}
            MCode::MountStorage => self.mount_storage(),
            MCode::ReleaseStorage => self.session.release(&mut self.storage),
            MCode::SelectFile => self.select_file(cmd),
            MCode::StartRead => self.session.start_read(),
            MCode::PauseRead => self.session.pause_read(),
            MCode::SeekFile => self.seek_file(cmd),
            MCode::ReportStorageStatus => {}
            MCode::BeginWrite => self.begin_write(cmd),
            MCode::EndWrite => self.session.end_write(&mut self.storage),
            MCode::SetTemperature => self.set_temperature(cmd),
            MCode::ReportTemperature => self.report_temperature(cmd),
            MCode::SetTemperatureWait => self.set_temperature_and_wait(cmd),
            MCode::SetLineNumber => {}
            MCode::SetDebugFlags => {
                if let Some(s) = cmd.s {
                    self.debug_flags = s as u8;
                }
            }
            MCode::EmergencyStop => self.emergency_stop(),
            MCode::ReportPosition => self.report_position(),
            MCode::ReportCapabilities => self.report_capabilities(),
            MCode::WaitForSlowVariables => self.queue.enqueue(QueueEntry::Barrier),
            MCode::SetPidP => self.tune_pid(cmd, TuningParam::Proportional),
            MCode::SetPidI => self.tune_pid(cmd, TuningParam::Integral),
            MCode::SetPidD => self.tune_pid(cmd, TuningParam::Derivative),
            MCode::SetPidLimit => self.tune_pid(cmd, TuningParam::IntegralLimit),
            MCode::SavePid => self.thermal.persist_tuning(),
            MCode::SetHeaterOutput => self.set_heater_output(cmd),
            MCode::ReportPid => self.report_pid(cmd),
            MCode::SetBedTemperature => self.set_bed_temperature(cmd),
            MCode::PowerOn => self.power_up(),
            MCode::PowerOff => self.power_down(),
            MCode::SetBaudRate => self.set_baud(cmd),
            MCode::SetTempTableRow => self.set_temp_table_row(cmd),
            MCode::SetTempResidency => {
                if let Some(p) = cmd.p {
                    self.eeconfig.temp_residency = p;
                }
            }
            MCode::SetEndstopOffsetZ => {
                if let Some(z) = cmd.z {
                    self.eeconfig.min_endstop_pos_z = z;
                }
            }
            MCode::SetMaxBedTemp => {}
            MCode::SetSpeedLimits => self.set_speed_limits(cmd),
            MCode::SetBuildVolume => self.set_build_volume(cmd),
            MCode::SetStepsPerUnit => self.set_steps_per_unit(cmd),
            MCode::EchoOff => self.set_echo(false),
            MCode::EchoOn => self.set_echo(true),
            MCode::DumpState => self.dump_state(),
            MCode::PeekScratch => self.peek_scratch(cmd),
            MCode::PokeScratch => self.poke_scratch(cmd),
        }
    }

    // ---- motion -----------------------------------------------------

    /// Enqueue a move and record it in state
    fn commit_move(&mut self, target: Target) {
        self.queue.enqueue(QueueEntry::Move(target));
        self.state.commit_move(&target);
    }

    /// Rapid move: the substituted feed rate affects only the one
    /// enqueued move, never the persisted state
    fn rapid_move(&mut self, target: Target) {
        let requested = target.f;
        let mut fast = target;
        fast.f = self.hardware.rapid_feedrate;
        self.commit_move(fast);
        self.state.feedrate = requested;
    }

    /// Dwell: empty the queue, then wait while keeping periodic work alive
    fn dwell(&mut self, ms: i32) {
        self.queue.drain();
        let mut remaining = ms;
        while remaining > 0 {
            self.clock.service();
            self.clock.delay_ms(1);
            remaining -= 1;
        }
    }

    fn home(&mut self, axes: AxisSelection) {
        homing::home(
            &mut self.queue,
            &mut self.state,
            &self.hardware.search_feedrate,
            axes,
        );
    }

    /// The two adjacent-code behaviors as one traceable composite:
    /// move to the given point, then run the full home sequence
    fn move_then_home(&mut self, target: Target, axes: AxisSelection) {
        self.commit_move(target);
        self.home(axes);
    }

    fn seek(&mut self, cmd: &Command, direction: SeekDirection) {
        homing::seek_endstops(&mut self.endstops, AxisSelection::from_command(cmd), direction);
    }

    /// Set home: move the origin under a guaranteed-empty queue
    fn set_home(&mut self, cmd: &Command, target: &Target) {
        self.queue.drain();

        let mut axis_named = false;
        if cmd.x.is_some() {
            self.state.position.x = target.x;
            axis_named = true;
        }
        if cmd.y.is_some() {
            self.state.position.y = target.y;
            axis_named = true;
        }
        if cmd.z.is_some() {
            self.state.position.z = target.z;
            axis_named = true;
        }
        if cmd.e.is_some() {
            // extrusion is path-relative and has no origin to move; naming
            // E still suppresses the zero-all default
            axis_named = true;
        }

        if !axis_named {
            self.state.zero_linear_axes();
        }
    }

    // ---- supervisory ------------------------------------------------

    /// Program end: shut everything down and latch the terminal state
    fn program_end(&mut self) {
        self.queue.flush();
        for axis in Axis::ALL {
            self.power.disable_axis(axis);
        }
        self.power.power_off();
        self.state.halted = true;
        self.power.keep_alive();
    }

    /// Immediate stop: same shutdown, but the controller stays live
    fn emergency_stop(&mut self) {
        self.queue.flush();
        for axis in Axis::ALL {
            self.power.disable_axis(axis);
        }
        self.power.power_off();
    }

    fn power_up(&mut self) {
        self.power.power_on();
        for axis in Axis::ALL {
            self.power.enable_axis(axis);
        }
        self.state.step_timeout_ms = 0;
    }

    fn power_down(&mut self) {
        for axis in Axis::ALL {
            self.power.disable_axis(axis);
        }
        self.power.power_off();
    }

    // ---- extruder and thermal ---------------------------------------

    fn extruder_on(&mut self) {
        if !self.thermal.is_achieved() {
            self.queue.enqueue(QueueEntry::Barrier);
        }
        match self.hardware.extruder {
            ExtruderDrive::Direct { heater, pwm } => self.thermal.set_output(heater, pwm),
            ExtruderDrive::StartStop { distance_um } => self.start_stop_move(distance_um),
            ExtruderDrive::None => {}
        }
    }

    fn extruder_off(&mut self) {
        match self.hardware.extruder {
            ExtruderDrive::Direct { heater, .. } => self.thermal.set_output(heater, 0),
            ExtruderDrive::StartStop { distance_um } => self.start_stop_move(-distance_um),
            ExtruderDrive::None => {}
        }
    }

    /// Fast fixed-length E move with the feed rate restored afterwards
    fn start_stop_move(&mut self, delta_um: i32) {
        let backup = self.state.feedrate;
        let mut target = Target::at(self.state.position, self.hardware.max_e_feedrate);
        target.e = delta_um;
        self.commit_move(target);
        self.state.feedrate = backup;
    }

    fn set_fan(&mut self, pwm: u8) {
        if let Some(fan) = self.hardware.fan {
            self.thermal.set_output(fan, pwm);
        }
    }

    /// The sensor a temperature command addresses: P, or the active tool
    fn sensor_for(&self, cmd: &Command) -> u8 {
        cmd.p.map(|p| p as u8).unwrap_or(self.state.active_tool)
    }

    fn set_temperature(&mut self, cmd: &Command) {
        let sensor = self.sensor_for(cmd);
        if let Some(s) = cmd.s {
            self.thermal.set_target(sensor, s as i16);
            if s != 0 {
                self.power.power_on();
            }
        }
    }

    fn report_temperature(&mut self, cmd: &Command) {
        let sensor = self.sensor_for(cmd);
        let reading = self.thermal.current(sensor);
        self.console.write_line(report::temperature(reading).as_str());
    }

    fn set_temperature_and_wait(&mut self, cmd: &Command) {
        let sensor = self.sensor_for(cmd);
        if let Some(s) = cmd.s {
            self.thermal.set_target(sensor, s as i16);
        }
        match cmd.s {
            Some(s) if s != 0 => {
                self.power.power_on();
                self.thermal.enable_control();
            }
            _ => self.thermal.disable_control(),
        }
        // the wait itself is enforced by the queue executor on the marker;
        // this call returns immediately
        self.queue.enqueue(QueueEntry::Barrier);
    }

    fn set_bed_temperature(&mut self, cmd: &Command) {
        let Some(bed) = self.hardware.bed else {
            return;
        };
        if let Some(s) = cmd.s {
            self.thermal.set_target(bed, s as i16);
            if s != 0 {
                self.power.power_on();
            }
        }
    }

    fn tune_pid(&mut self, cmd: &Command, param: TuningParam) {
        let sensor = cmd.p.unwrap_or(0) as u8;
        if let Some(s) = cmd.s {
            self.thermal.tune(sensor, param, s);
        }
    }

    fn set_heater_output(&mut self, cmd: &Command) {
        let heater = cmd.p.unwrap_or(0) as u8;
        if let Some(s) = cmd.s {
            self.thermal.set_output(heater, s.clamp(0, 255) as u8);
            self.power.power_on();
        }
    }

    fn report_pid(&mut self, cmd: &Command) {
        let sensor = cmd.p.unwrap_or(0) as u8;
        if let Some(pid) = self.thermal.pid_settings(sensor) {
            self.console.write_line(
                report::pid_settings(sensor, pid.kp, pid.ki, pid.kd, pid.i_limit).as_str(),
            );
        }
    }

    // ---- reporting and diagnostics ----------------------------------

    fn report_position(&mut self) {
        let p = self.state.position;
        self.console
            .write_line(report::position(p.x, p.y, p.z, p.e, self.state.feedrate).as_str());
    }

    fn report_capabilities(&mut self) {
        self.console.write_line(
            report::capabilities(
                self.hardware.extruder_count,
                self.hardware.sensor_count,
                self.hardware.heater_count,
            )
            .as_str(),
        );
    }

    fn set_echo(&mut self, on: bool) {
        if on {
            self.debug_flags |= DEBUG_ECHO;
        } else {
            self.debug_flags &= !DEBUG_ECHO;
        }
        self.console.write_line(report::echo(on));
    }

    fn dump_state(&mut self) {
        self.report_position();
        self.queue.report(&mut self.console);
    }

    fn peek_scratch(&mut self, cmd: &Command) {
        let addr = cmd.s.unwrap_or(0);
        let Some(start) = usize::try_from(addr).ok().filter(|&a| a < SCRATCH_LEN) else {
            self.console.write_line(report::bad_address(addr).as_str());
            return;
        };
        let count = cmd.p.unwrap_or(1).max(0) as usize;
        let end = (start + count).min(SCRATCH_LEN);
        self.console
            .write_line(report::peek(&self.scratch[start..end]).as_str());
    }

    fn poke_scratch(&mut self, cmd: &Command) {
        let addr = cmd.s.unwrap_or(0);
        let value = cmd.p.unwrap_or(0) as u8;
        let slot = usize::try_from(addr)
            .ok()
            .and_then(|a| self.scratch.get_mut(a));
        match slot {
            Some(slot) => {
                let old = *slot;
                *slot = value;
                self.console
                    .write_line(report::poke(addr as u32, old, value).as_str());
            }
            None => self.console.write_line(report::bad_address(addr).as_str()),
        }
    }

    // ---- persisted configuration ------------------------------------

    fn set_baud(&mut self, cmd: &Command) {
        if let Some(s) = cmd.s {
            if (1200..=1_000_000).contains(&s) {
                self.eeconfig.baud = s as u32;
            }
        }
    }

    fn set_temp_table_row(&mut self, cmd: &Command) {
        // all three words required; a row index outside the table is
        // dropped rather than trusted
        if let (Some(s), Some(x), Some(y)) = (cmd.s, cmd.x, cmd.y) {
            let row = usize::try_from(s)
                .ok()
                .and_then(|i| self.eeconfig.temptable.get_mut(i));
            if let Some(row) = row {
                row.adc_value = x as u16;
                row.temperature = y as i16;
            }
        }
    }

    fn set_speed_limits(&mut self, cmd: &Command) {
        if let Some(x) = cmd.x {
            self.eeconfig.max_speed.x = x;
        }
        if let Some(y) = cmd.y {
            self.eeconfig.max_speed.y = y;
        }
        if let Some(z) = cmd.z {
            self.eeconfig.max_speed.z = z;
        }
        if let Some(e) = cmd.e {
            self.eeconfig.max_speed.e = e;
        }
    }

    fn set_build_volume(&mut self, cmd: &Command) {
        if let Some(x) = cmd.x {
            self.eeconfig.build_volume.x = x;
        }
        if let Some(y) = cmd.y {
            self.eeconfig.build_volume.y = y;
        }
        if let Some(z) = cmd.z {
            self.eeconfig.build_volume.z = z;
        }
    }

    fn set_steps_per_unit(&mut self, cmd: &Command) {
        if let Some(x) = cmd.x {
            self.eeconfig.steps_per_mm.x = x;
        }
        if let Some(y) = cmd.y {
            self.eeconfig.steps_per_mm.y = y;
        }
        if let Some(z) = cmd.z {
            self.eeconfig.steps_per_mm.z = z;
        }
        if let Some(e) = cmd.e {
            self.eeconfig.steps_per_mm.e = e;
        }
    }

    // ---- storage ----------------------------------------------------

    fn mount_storage(&mut self) {
        match self.session.mount(&mut self.storage) {
            Ok(()) => self.console.write_line(report::storage_mounted()),
            Err(e) => self
                .console
                .write_line(report::storage_mount_failed(e.code()).as_str()),
        }
    }

    fn select_file(&mut self, cmd: &Command) {
        let Some(name) = cmd.filename.as_deref() else {
            self.console
                .write_line(report::open_failed("", StorageError::NotFound.code()).as_str());
            return;
        };
        match self.session.open_read(&mut self.storage, name) {
            Ok(()) => self.console.write_line(report::file_ready(name).as_str()),
            Err(e) => self
                .console
                .write_line(report::open_failed(name, e.code()).as_str()),
        }
    }

    fn seek_file(&mut self, cmd: &Command) {
        let offset = cmd.s.unwrap_or(0).max(0) as u32;
        match self.session.seek(&mut self.storage, offset) {
            Ok(()) => self.console.write_line(report::seek_ok(offset).as_str()),
            Err(e) => self
                .console
                .write_line(report::seek_failed(e.code()).as_str()),
        }
    }

    fn begin_write(&mut self, cmd: &Command) {
        let Some(name) = cmd.filename.as_deref() else {
            self.console
                .write_line(report::write_failed(StorageError::NotFound.code()).as_str());
            return;
        };
        match self.session.begin_write(&mut self.storage, name) {
            Ok(()) => self.console.write_line(report::write_ready(name).as_str()),
            Err(e) => self
                .console
                .write_line(report::write_failed(e.code()).as_str()),
        }
    }
}
