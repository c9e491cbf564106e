/*!
manager.rs - RuntimeManager: the embedding façade (spec.md §4.7).

Overview
========
Thin wrapper around `Runtime` for hosts that want periodic ticking and
observer callbacks instead of driving `scan` by hand:

- `load_lad` / `load_ir` compile or parse a program and seed a default
  set of input/output tags (`input_0..6`, `output_0..6`) so fixtures
  that reference them always resolve to a defined value.
- `start(period_ms)` spawns one dedicated driver thread that calls
  `scan` on a fixed period and forwards each `ScanResult` to every
  subscribed observer, in subscription order, from that same thread —
  observers never race the driver (spec.md §5).
- `stop` signals the driver thread to exit and joins it.
- `step` runs exactly one scan synchronously, for hosts that want to
  drive ticks themselves instead of using `start`.
- `set_input` accepts a `%I0.<n>` physical address and updates both the
  synthetic address tag and the symbolic alias fixtures use
  (`input_<n>`), plus the special aliases `start_button` (`%I0.0`) and
  `stop_button` (`%I0.1`).
- `subscribe` registers an observer for successful scans; a scan error
  is forwarded to error observers instead of silently dropped, since a
  façade that swallows errors would contradict the "does not crash the
  driver" contract.
*/

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::error::{PlcError, PlcResult};
use crate::ir::Program;
use crate::runtime::{Runtime, ScanResult};
use crate::tag_store::address_to_tag_id;
use crate::value::TagValue;

const DEFAULT_IO_COUNT: usize = 7;

pub type ScanObserver = Box<dyn Fn(&ScanResult) + Send>;
pub type ErrorObserver = Box<dyn Fn(&PlcError) + Send>;

pub struct RuntimeManager {
    runtime: Arc<Mutex<Runtime>>,
    observers: Arc<Mutex<Vec<ScanObserver>>>,
    error_observers: Arc<Mutex<Vec<ErrorObserver>>>,
    driver: Option<DriverHandle>,
}

struct DriverHandle {
    stop_tx: mpsc::Sender<()>,
    join: thread::JoinHandle<()>,
}

impl RuntimeManager {
    pub fn new() -> Self {
        RuntimeManager {
            runtime: Arc::new(Mutex::new(Runtime::new())),
            observers: Arc::new(Mutex::new(Vec::new())),
            error_observers: Arc::new(Mutex::new(Vec::new())),
            driver: None,
        }
    }

    /// Compile `lad_json` as a LAD program and load it, seeding default I/O.
    pub fn load_lad_str(&self, lad_json: &str) -> PlcResult<()> {
        let lad: crate::compiler::LadProgram = serde_json::from_str(lad_json)?;
        let program = crate::compiler::LadCompiler::compile(&lad)?;
        self.load_ir(program)
    }

    /// Parse `ir_json` as an IR program and load it, seeding default I/O.
    pub fn load_ir_str(&self, ir_json: &str) -> PlcResult<()> {
        let program: Program = serde_json::from_str(ir_json)?;
        self.load_ir(program)
    }

    /// Load an already-built IR program, seeding default I/O.
    pub fn load_ir(&self, program: Program) -> PlcResult<()> {
        let mut runtime = self.lock_runtime();
        runtime.load(program)?;
        for n in 0..DEFAULT_IO_COUNT {
            runtime.set_tag(format!("input_{n}"), TagValue::Bool(false));
            runtime.set_tag(format!("output_{n}"), TagValue::Bool(false));
        }
        Ok(())
    }

    pub fn set_tag(&self, tag: impl Into<String>, value: TagValue) {
        self.lock_runtime().set_tag(tag, value);
    }

    pub fn get_tag(&self, tag: &str) -> Option<TagValue> {
        self.lock_runtime().get_tag(tag)
    }

    /// Update a physical input address and its conventional aliases.
    ///
    /// `%I0.<n>` updates `__addr_I0_<n>` and `input_<n>`; `%I0.0` and
    /// `%I0.1` additionally update `start_button` and `stop_button`.
    pub fn set_input(&self, address: &str, value: bool) {
        let mut runtime = self.lock_runtime();
        let tag_value = TagValue::Bool(value);
        runtime.set_tag(address_to_tag_id(address), tag_value.clone());

        if let Some(bit) = parse_i0_bit(address) {
            runtime.set_tag(format!("input_{bit}"), tag_value.clone());
            match bit {
                0 => runtime.set_tag("start_button", tag_value),
                1 => runtime.set_tag("stop_button", tag_value),
                _ => {}
            }
        }
    }

    /// Run one scan synchronously and notify observers.
    pub fn step(&self) {
        let result = self.lock_runtime().scan(None);
        self.notify(result);
    }

    /// Start a dedicated driver thread ticking every `period_ms`
    /// milliseconds. A second call while already running is a no-op.
    pub fn start(&mut self, period_ms: u64) {
        if self.driver.is_some() {
            return;
        }
        let (stop_tx, stop_rx) = mpsc::channel();
        let runtime = Arc::clone(&self.runtime);
        let observers = Arc::clone(&self.observers);
        let error_observers = Arc::clone(&self.error_observers);
        let period = Duration::from_millis(period_ms);

        let join = thread::spawn(move || loop {
            if stop_rx.recv_timeout(period).is_ok() {
                return;
            }
            let result = runtime.lock().expect("runtime mutex poisoned").scan(None);
            match result {
                Ok(scan_result) => {
                    for observer in observers.lock().expect("observer mutex poisoned").iter() {
                        observer(&scan_result);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "scan error forwarded to error observers");
                    for observer in error_observers
                        .lock()
                        .expect("error observer mutex poisoned")
                        .iter()
                    {
                        observer(&err);
                    }
                }
            }
        });

        self.driver = Some(DriverHandle { stop_tx, join });
    }

    /// Signal the driver thread to stop and join it. A no-op if not running.
    pub fn stop(&mut self) {
        if let Some(driver) = self.driver.take() {
            let _ = driver.stop_tx.send(());
            let _ = driver.join.join();
        }
    }

    pub fn reset(&self) {
        self.lock_runtime().reset();
    }

    /// Register an observer invoked with every successful `ScanResult`, in
    /// subscription order. May be called more than once.
    pub fn subscribe(&self, observer: ScanObserver) {
        self.observers
            .lock()
            .expect("observer mutex poisoned")
            .push(observer);
    }

    /// Register an observer invoked with every scan error.
    pub fn subscribe_errors(&self, observer: ErrorObserver) {
        self.error_observers
            .lock()
            .expect("error observer mutex poisoned")
            .push(observer);
    }

    fn lock_runtime(&self) -> std::sync::MutexGuard<'_, Runtime> {
        self.runtime.lock().expect("runtime mutex poisoned")
    }

    fn notify(&self, result: PlcResult<ScanResult>) {
        match result {
            Ok(scan_result) => {
                for observer in self.observers.lock().expect("observer mutex poisoned").iter() {
                    observer(&scan_result);
                }
            }
            Err(err) => {
                for observer in self
                    .error_observers
                    .lock()
                    .expect("error observer mutex poisoned")
                    .iter()
                {
                    observer(&err);
                }
            }
        }
    }
}

impl Default for RuntimeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RuntimeManager {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Parse the bit index out of an `%I0.<n>` address, or `None` for any
/// other byte/format.
fn parse_i0_bit(address: &str) -> Option<u8> {
    let rest = address.strip_prefix("%I0.")?;
    rest.parse::<u8>().ok()
}
