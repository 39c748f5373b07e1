// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compile-time configurable logging.
//!
//! Four severity macros, `debug!` / `info!` / `warn!` / `error!`, over
//! a global logger with pluggable outputs. When the `logging` Cargo
//! feature is disabled, every macro expands to an empty expression and
//! this module compiles to nothing.

#[cfg(feature = "logging")]
pub use enabled::{flush_logging, init_logging, ConsoleOutput, FileOutput, LogLevel, Output};
#[cfg(feature = "logging")]
#[doc(hidden)]
pub use enabled::log_message;

#[cfg(feature = "logging")]
mod enabled {
    use std::fs::OpenOptions;
    use std::io::{self, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex, OnceLock};

    /// Severity of a log message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum LogLevel {
        /// Detailed development information.
        Debug = 0,
        /// Normal operation.
        Info = 1,
        /// Potentially harmful situations.
        Warning = 2,
        /// Error conditions.
        Error = 3,
    }

    impl LogLevel {
        /// Fixed-width tag used in the output line.
        #[must_use]
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Debug => "DEBUG",
                Self::Info => "INFO ",
                Self::Warning => "WARN ",
                Self::Error => "ERROR",
            }
        }
    }

    /// Output destination for log messages. Implementations must be
    /// thread-safe.
    pub trait Output: Send + Sync {
        /// Write one formatted message.
        fn write(&self, level: LogLevel, message: &str) -> io::Result<()>;
        /// Flush buffered output.
        fn flush(&self) -> io::Result<()>;
    }

    /// Writes to stderr with a level prefix.
    pub struct ConsoleOutput;

    impl Output for ConsoleOutput {
        fn write(&self, level: LogLevel, message: &str) -> io::Result<()> {
            eprintln!("[{}] {}", level.as_str(), message);
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            io::stderr().flush()
        }
    }

    /// Appends to a file with a level prefix.
    pub struct FileOutput {
        file: Mutex<std::fs::File>,
    }

    impl FileOutput {
        /// Create or truncate the log file at `path`.
        pub fn new(path: &Path) -> io::Result<Self> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            Ok(FileOutput {
                file: Mutex::new(file),
            })
        }
    }

    impl Output for FileOutput {
        fn write(&self, level: LogLevel, message: &str) -> io::Result<()> {
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::other("file output mutex poisoned"))?;
            writeln!(file, "[{}] {}", level.as_str(), message)
        }

        fn flush(&self) -> io::Result<()> {
            self.file
                .lock()
                .map_err(|_| io::Error::other("file output mutex poisoned"))?
                .flush()
        }
    }

    struct GlobalLogger {
        output: Arc<dyn Output>,
        level_filter: LogLevel,
    }

    static LOGGER: OnceLock<Mutex<GlobalLogger>> = OnceLock::new();

    /// Install the global logger. Only the first call takes effect.
    pub fn init_logging(output: Arc<dyn Output>, level: LogLevel) {
        let _ = LOGGER.get_or_init(|| {
            Mutex::new(GlobalLogger {
                output,
                level_filter: level,
            })
        });
    }

    /// Flush the global logger, if one is installed.
    pub fn flush_logging() -> io::Result<()> {
        match LOGGER.get() {
            Some(logger) => logger
                .lock()
                .map_err(|_| io::Error::other("global logger mutex poisoned"))?
                .output
                .flush(),
            None => Ok(()),
        }
    }

    /// Called by the logging macros. A no-op until `init_logging` ran.
    #[doc(hidden)]
    pub fn log_message(level: LogLevel, message: &str) {
        if let Some(logger) = LOGGER.get() {
            if let Ok(logger) = logger.lock() {
                if level >= logger.level_filter {
                    let _ = logger.output.write(level, message);
                }
            }
        }
    }
}

/// Debug-level log message; formatted like `println!`.
#[macro_export]
#[cfg(feature = "logging")]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logging::log_message($crate::logging::LogLevel::Debug, &format!($($arg)*))
    };
}

/// Info-level log message; formatted like `println!`.
#[macro_export]
#[cfg(feature = "logging")]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logging::log_message($crate::logging::LogLevel::Info, &format!($($arg)*))
    };
}

/// Warning-level log message; formatted like `println!`.
#[macro_export]
#[cfg(feature = "logging")]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logging::log_message($crate::logging::LogLevel::Warning, &format!($($arg)*))
    };
}

/// Error-level log message; formatted like `println!`.
#[macro_export]
#[cfg(feature = "logging")]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logging::log_message($crate::logging::LogLevel::Error, &format!($($arg)*))
    };
}

/// No-op when the `logging` feature is disabled.
#[macro_export]
#[cfg(not(feature = "logging"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

/// No-op when the `logging` feature is disabled.
#[macro_export]
#[cfg(not(feature = "logging"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}

/// No-op when the `logging` feature is disabled.
#[macro_export]
#[cfg(not(feature = "logging"))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

/// No-op when the `logging` feature is disabled.
#[macro_export]
#[cfg(not(feature = "logging"))]
macro_rules! error {
    ($($arg:tt)*) => {};
}
