//! A shared, swappable calendar.
//!
//! [`CalendarHandle`] holds the current [`CompiledCalendar`] behind a lock.
//! Readers take an `Arc` snapshot and keep using it without further locking.
//! Writers are serialised among themselves, compile a complete new calendar
//! without touching the read lock, and only take it for the pointer swap. A
//! rejected update leaves the previous calendar in place.
//!
//! Each handle is an independent calendar. Create one per context that
//! needs its own configuration.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::compiler::{IanaResolver, TimezoneResolver};
use crate::config::RawConfig;
use crate::error::ConfigurationError;
use crate::schedule::CompiledCalendar;

pub struct CalendarHandle {
    current: RwLock<Arc<CompiledCalendar>>,
    writer: Mutex<()>,
    resolver: Box<dyn TimezoneResolver + Send + Sync>,
}

impl CalendarHandle {
    /// Compile `raw` with the IANA resolver.
    pub fn new(raw: &RawConfig) -> Result<Self, ConfigurationError> {
        Self::with_resolver(raw, IanaResolver)
    }

    pub fn with_resolver<R>(raw: &RawConfig, resolver: R) -> Result<Self, ConfigurationError>
    where
        R: TimezoneResolver + Send + Sync + 'static,
    {
        let compiled = raw.compile_with(&resolver)?;
        Ok(Self {
            current: RwLock::new(Arc::new(compiled)),
            writer: Mutex::new(()),
            resolver: Box::new(resolver),
        })
    }

    /// Wrap an already compiled calendar.
    pub fn from_compiled(calendar: CompiledCalendar) -> Self {
        Self {
            current: RwLock::new(Arc::new(calendar)),
            writer: Mutex::new(()),
            resolver: Box::new(IanaResolver),
        }
    }

    /// The calendar in effect right now.
    pub fn snapshot(&self) -> Arc<CompiledCalendar> {
        self.current.read().clone()
    }

    /// Replace the configuration wholesale.
    pub fn replace(&self, raw: &RawConfig) -> Result<Arc<CompiledCalendar>, ConfigurationError> {
        let _writer = self.writer.lock();
        let compiled = Arc::new(self.compile(raw)?);
        self.swap(compiled.clone());
        Ok(compiled)
    }

    /// Edit a copy of the current configuration and swap in the result.
    ///
    /// Updates are serialised: concurrent callers each see the previous
    /// caller's result as their starting point. `edit` runs without the read
    /// lock held, so it may call [`snapshot`](Self::snapshot); it must not
    /// call `update`, `replace` or `reset` on the same handle.
    pub fn update<F>(&self, edit: F) -> Result<Arc<CompiledCalendar>, ConfigurationError>
    where
        F: FnOnce(&mut RawConfig),
    {
        let _writer = self.writer.lock();
        let mut raw = self.snapshot().source().clone();
        edit(&mut raw);
        let compiled = Arc::new(self.compile(&raw)?);
        self.swap(compiled.clone());
        Ok(compiled)
    }

    /// Back to Monday to Friday, 09:00 to 17:00, UTC.
    pub fn reset(&self) -> Result<Arc<CompiledCalendar>, ConfigurationError> {
        self.replace(&RawConfig::default())
    }

    fn compile(&self, raw: &RawConfig) -> Result<CompiledCalendar, ConfigurationError> {
        raw.compile_with(self.resolver.as_ref()).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected working calendar update");
        })
    }

    fn swap(&self, compiled: Arc<CompiledCalendar>) {
        let time_zone = compiled.time_zone();
        *self.current.write() = compiled;
        tracing::debug!(%time_zone, "swapped working calendar");
    }
}

impl Default for CalendarHandle {
    fn default() -> Self {
        // The default configuration always compiles.
        match Self::new(&RawConfig::default()) {
            Ok(handle) => handle,
            Err(err) => unreachable!("default working calendar failed to compile: {err}"),
        }
    }
}

impl std::fmt::Debug for CalendarHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarHandle")
            .field("current", &self.snapshot())
            .finish_non_exhaustive()
    }
}
