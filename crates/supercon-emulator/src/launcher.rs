//! Emulator launcher

use crate::EmulatorError;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use supercon_config::{EmulatorTable, SuperconConfig};

/// Emulator command for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorInfo {
    /// Platform name as written in the emulator table
    pub platform: String,

    /// Path to executable, or a bare name looked up on PATH
    pub path: PathBuf,

    /// Arguments placed before the ROM path
    pub args: Vec<String>,
}

impl EmulatorInfo {
    /// Create new emulator info
    pub fn new(platform: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            platform: platform.into(),
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Set arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Executable to spawn, if it can be found
    pub fn resolve_executable(&self) -> Option<PathBuf> {
        if self.path.exists() {
            return Some(self.path.clone());
        }

        if is_bare_name(&self.path) {
            return which::which(&self.path).ok();
        }

        None
    }
}

/// Result of launching a game
#[derive(Debug)]
pub struct LaunchResult {
    /// Child process handle
    pub child: Child,

    /// PID of the launched process
    pub pid: u32,

    /// Executable that was started
    pub emulator: String,
}

/// Launches games with the emulator configured for their platform
#[derive(Debug, Clone, Default)]
pub struct EmulatorLauncher {
    emulators: Vec<EmulatorInfo>,
}

impl EmulatorLauncher {
    /// Launcher with no emulators registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher for every entry of an emulator table
    pub fn from_table(table: &EmulatorTable) -> Self {
        let mut launcher = Self::new();
        for (platform, entry) in table.iter() {
            launcher.register(
                EmulatorInfo::new(platform, &entry.path).with_args(entry.args.clone()),
            );
        }
        launcher
    }

    pub fn from_config(config: &SuperconConfig) -> Self {
        Self::from_table(&config.emulators)
    }

    /// Register an emulator, replacing any for the same platform
    pub fn register(&mut self, info: EmulatorInfo) {
        tracing::debug!("Registered emulator for {}: {}", info.platform, info.path.display());
        self.emulators
            .retain(|e| !e.platform.eq_ignore_ascii_case(&info.platform));
        self.emulators.push(info);
    }

    /// Emulator for a platform, exact name first, then case-insensitive
    pub fn get(&self, platform: &str) -> Option<&EmulatorInfo> {
        self.emulators
            .iter()
            .find(|e| e.platform == platform)
            .or_else(|| {
                self.emulators
                    .iter()
                    .find(|e| e.platform.eq_ignore_ascii_case(platform))
            })
    }

    /// List all registered emulators
    pub fn list(&self) -> &[EmulatorInfo] {
        &self.emulators
    }

    /// Check if the platform's emulator can be found
    pub fn is_available(&self, platform: &str) -> bool {
        self.get(platform)
            .is_some_and(|info| info.resolve_executable().is_some())
    }

    /// Start the platform's emulator with `rom_path` as the last argument
    pub fn launch(&self, platform: &str, rom_path: &Path) -> Result<LaunchResult, EmulatorError> {
        let info = self
            .get(platform)
            .ok_or_else(|| EmulatorError::NoEmulator(platform.to_string()))?;

        let executable = info
            .resolve_executable()
            .ok_or_else(|| EmulatorError::EmulatorNotFound(info.path.clone()))?;

        if !rom_path.exists() {
            return Err(EmulatorError::RomNotFound(rom_path.to_path_buf()));
        }

        let mut cmd = Command::new(&executable);
        cmd.args(&info.args);
        cmd.arg(rom_path);
        cmd.stdin(Stdio::null());

        tracing::info!(
            "Launching {} with {}",
            executable.display(),
            rom_path.display()
        );

        let child = cmd.spawn().map_err(|e| {
            EmulatorError::LaunchFailed(format!(
                "Failed to spawn {}: {}",
                executable.display(),
                e
            ))
        })?;

        let pid = child.id();
        tracing::debug!("{} started with PID {}", info.platform, pid);

        Ok(LaunchResult {
            child,
            pid,
            emulator: executable.display().to_string(),
        })
    }
}

/// A single path component with no directory part
fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && path.parent().is_some_and(|p| p.as_os_str().is_empty())
}
