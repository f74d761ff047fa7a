//! Emulator launching for the Super Console Launcher
//!
//! Maps a platform name to a standalone emulator executable and starts it
//! with the ROM path as the last argument.

mod launcher;

pub use launcher::{EmulatorInfo, EmulatorLauncher, LaunchResult};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("No emulator configured for platform: {0}")]
    NoEmulator(String),

    #[error("Emulator not found: {0}")]
    EmulatorNotFound(PathBuf),

    #[error("ROM not found: {0}")]
    RomNotFound(PathBuf),

    #[error("Launch failed: {0}")]
    LaunchFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EmulatorError::EmulatorNotFound(PathBuf::from("Emulators/Cemu/Cemu.exe"));
        assert!(err.to_string().contains("Emulators/Cemu/Cemu.exe"));

        let err = EmulatorError::NoEmulator("Dreamcast".to_string());
        assert_eq!(err.to_string(), "No emulator configured for platform: Dreamcast");
    }
}
