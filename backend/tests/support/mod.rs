#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use equipment_analytics::models::EquipmentRecord;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Header row of every equipment CSV upload.
pub const CSV_HEADER: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature";

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Build a valid record, panicking on invalid input.
pub fn record(
    name: &str,
    equipment_type: &str,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
) -> EquipmentRecord {
    EquipmentRecord::new(name, equipment_type, flowrate, pressure, temperature)
        .expect("test record must be valid")
}

/// Render records as an upload CSV body.
pub fn csv_body(records: &[EquipmentRecord]) -> String {
    let mut body = format!("{}\n", CSV_HEADER);
    for r in records {
        body.push_str(&format!(
            "{},{},{},{},{}\n",
            r.name, r.equipment_type, r.flowrate, r.pressure, r.temperature
        ));
    }
    body
}

/// A small plant: three pumps, two valves, one reactor running hot.
pub fn sample_plant() -> Vec<EquipmentRecord> {
    vec![
        record("Pump-1", "Pump", 120.0, 5.2, 110.0),
        record("Pump-2", "Pump", 115.0, 5.0, 108.0),
        record("Pump-3", "Pump", 130.0, 5.5, 112.0),
        record("Valve-1", "Valve", 60.0, 4.1, 105.0),
        record("Valve-2", "Valve", 65.0, 4.3, 106.0),
        record("Reactor-1", "Reactor", 150.0, 5.1, 420.0),
    ]
}
