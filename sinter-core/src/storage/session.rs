//! Storage session state machine
//!
//! Tracks one removable-volume print session:
//! Unmounted → Mounted → {Reading, Writing} → Mounted → Unmounted.
//! Every transition that touches the device checks its precondition first
//! and reports failure through a result code; a failed transition leaves
//! the session exactly where it was.

use crate::traits::{StorageDevice, StorageError};

/// Session flags for the removable volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageSession {
    mounted: bool,
    file_open: bool,
    reading: bool,
    writing: bool,
}

impl StorageSession {
    /// A fresh, unmounted session
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume mounted and root directory readable
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// A file handle is currently open
    pub fn has_open_file(&self) -> bool {
        self.file_open
    }

    /// The job reader is consuming the open file
    pub fn is_reading(&self) -> bool {
        self.reading
    }

    /// A write session is in progress
    pub fn is_writing(&self) -> bool {
        self.writing
    }

    /// Initialize the device and mount the volume
    pub fn mount<D: StorageDevice>(&mut self, dev: &mut D) -> Result<(), StorageError> {
        dev.mount()?;
        self.mounted = true;
        Ok(())
    }

    /// Release the volume: close any open handle, clear every flag
    ///
    /// Unconditional: release must always succeed so the host can recover
    /// from any session state.
    pub fn release<D: StorageDevice>(&mut self, dev: &mut D) {
        dev.close();
        *self = Self::default();
    }

    /// Open a file for reading
    pub fn open_read<D: StorageDevice>(
        &mut self,
        dev: &mut D,
        name: &str,
    ) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        dev.open_read(name)?;
        self.file_open = true;
        Ok(())
    }

    /// Start (or resume) consuming the open file
    ///
    /// Toggles the flag only; the file is not reopened.
    pub fn start_read(&mut self) {
        self.reading = true;
    }

    /// Pause consuming without closing the file
    pub fn pause_read(&mut self) {
        self.reading = false;
    }

    /// Seek the open file to a byte offset
    pub fn seek<D: StorageDevice>(&mut self, dev: &mut D, offset: u32) -> Result<(), StorageError> {
        if !self.file_open {
            return Err(StorageError::NoFileOpen);
        }
        dev.seek(offset)
    }

    /// Open a file for writing and begin a write session
    pub fn begin_write<D: StorageDevice>(
        &mut self,
        dev: &mut D,
        name: &str,
    ) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        dev.open_write(name)?;
        self.file_open = true;
        self.writing = true;
        Ok(())
    }

    /// End the write session and close the handle
    pub fn end_write<D: StorageDevice>(&mut self, dev: &mut D) {
        self.writing = false;
        self.file_open = false;
        dev.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    /// Scriptable device double: each op fails with the configured error
    #[derive(Default)]
    struct TestDevice {
        fail_mount: Option<StorageError>,
        fail_open: Option<StorageError>,
        fail_seek: Option<StorageError>,
        opened: Vec<(bool, std::string::String)>, // (write, name)
        closes: usize,
        seeks: Vec<u32>,
    }

    impl StorageDevice for TestDevice {
        fn mount(&mut self) -> Result<(), StorageError> {
            match self.fail_mount {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        fn open_read(&mut self, name: &str) -> Result<(), StorageError> {
            if let Some(e) = self.fail_open {
                return Err(e);
            }
            self.opened.push((false, name.into()));
            Ok(())
        }

        fn open_write(&mut self, name: &str) -> Result<(), StorageError> {
            if let Some(e) = self.fail_open {
                return Err(e);
            }
            self.opened.push((true, name.into()));
            Ok(())
        }

        fn close(&mut self) {
            self.closes += 1;
        }

        fn seek(&mut self, offset: u32) -> Result<(), StorageError> {
            if let Some(e) = self.fail_seek {
                return Err(e);
            }
            self.seeks.push(offset);
            Ok(())
        }
    }

    #[test]
    fn test_mount_success() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        assert_eq!(session.mount(&mut dev), Ok(()));
        assert!(session.is_mounted());
    }

    #[test]
    fn test_mount_failure_leaves_unmounted() {
        let mut dev = TestDevice {
            fail_mount: Some(StorageError::NoFilesystem),
            ..Default::default()
        };
        let mut session = StorageSession::new();
        assert_eq!(session.mount(&mut dev), Err(StorageError::NoFilesystem));
        assert!(!session.is_mounted());
    }

    #[test]
    fn test_open_read_requires_mount() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();

        let r = session.open_read(&mut dev, "part.gco");
        assert_eq!(r, Err(StorageError::NotMounted));
        assert_eq!(session, StorageSession::new());
        // the device was never asked
        assert!(dev.opened.is_empty());
    }

    #[test]
    fn test_open_read_failure_leaves_state() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        session.mount(&mut dev).unwrap();

        dev.fail_open = Some(StorageError::NotFound);
        let r = session.open_read(&mut dev, "missing.gco");
        assert_eq!(r, Err(StorageError::NotFound));
        assert!(session.is_mounted());
        assert!(!session.has_open_file());
    }

    #[test]
    fn test_read_flag_toggles_without_reopen() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        session.mount(&mut dev).unwrap();
        session.open_read(&mut dev, "part.gco").unwrap();
        assert_eq!(dev.opened.len(), 1);

        session.start_read();
        assert!(session.is_reading());
        session.pause_read();
        assert!(!session.is_reading());
        session.start_read();
        assert!(session.is_reading());

        // still exactly one open
        assert_eq!(dev.opened.len(), 1);
    }

    #[test]
    fn test_seek_requires_open_file() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        session.mount(&mut dev).unwrap();

        assert_eq!(
            session.seek(&mut dev, 100),
            Err(StorageError::NoFileOpen)
        );
        assert!(dev.seeks.is_empty());

        session.open_read(&mut dev, "part.gco").unwrap();
        assert_eq!(session.seek(&mut dev, 4096), Ok(()));
        assert_eq!(dev.seeks.as_slice(), &[4096]);
    }

    #[test]
    fn test_write_session() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        session.mount(&mut dev).unwrap();

        session.begin_write(&mut dev, "out.gco").unwrap();
        assert!(session.is_writing());
        assert!(session.has_open_file());
        assert_eq!(dev.opened.last().unwrap().0, true);

        session.end_write(&mut dev);
        assert!(!session.is_writing());
        assert!(!session.has_open_file());
        assert!(session.is_mounted());
        assert_eq!(dev.closes, 1);
    }

    #[test]
    fn test_begin_write_requires_mount() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        assert_eq!(
            session.begin_write(&mut dev, "out.gco"),
            Err(StorageError::NotMounted)
        );
        assert!(!session.is_writing());
    }

    #[test]
    fn test_release_clears_everything() {
        let mut dev = TestDevice::default();
        let mut session = StorageSession::new();
        session.mount(&mut dev).unwrap();
        session.open_read(&mut dev, "part.gco").unwrap();
        session.start_read();

        session.release(&mut dev);
        assert_eq!(session, StorageSession::new());
        assert_eq!(dev.closes, 1);
    }
}
