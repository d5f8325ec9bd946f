//! Removable-storage collaborator

/// Result codes for storage operations
///
/// The numeric codes appear verbatim in console error lines, so they are
/// part of the host protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Device did not initialize
    NotReady,
    /// No recognizable filesystem
    NoFilesystem,
    /// Named file does not exist
    NotFound,
    /// Read/write/seek failed at the device
    Io,
    /// Medium is write-protected
    WriteProtected,
    /// Session precondition: no volume mounted
    NotMounted,
    /// Session precondition: no file open
    NoFileOpen,
}

impl StorageError {
    /// Protocol code reported on the console
    pub fn code(&self) -> u8 {
        match self {
            StorageError::NotReady => 1,
            StorageError::NoFilesystem => 2,
            StorageError::NotFound => 3,
            StorageError::Io => 4,
            StorageError::WriteProtected => 5,
            StorageError::NotMounted => 6,
            StorageError::NoFileOpen => 7,
        }
    }
}

/// Block-device + filesystem driver interface
///
/// One file handle at most; the session state machine guarantees the call
/// order (mount before open, open before seek).
pub trait StorageDevice {
    /// Initialize the device and mount its filesystem
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Open a file for reading
    fn open_read(&mut self, name: &str) -> Result<(), StorageError>;

    /// Create/truncate a file for writing
    fn open_write(&mut self, name: &str) -> Result<(), StorageError>;

    /// Close the open file handle, if any
    fn close(&mut self);

    /// Seek the open file to a byte offset
    fn seek(&mut self, offset: u32) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            StorageError::NotReady,
            StorageError::NoFilesystem,
            StorageError::NotFound,
            StorageError::Io,
            StorageError::WriteProtected,
            StorageError::NotMounted,
            StorageError::NoFileOpen,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }
}
