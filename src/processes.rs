// Process census and termination pass-through

use crate::error::ActionError;
use crate::models::ProcessRecord;
use std::sync::{Mutex, PoisonError};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use tracing::instrument;

/// Enumerates running processes.
///
/// Per-process CPU percent is the lifetime average (CPU time over wall time
/// since start), so it does not depend on when the previous listing ran and
/// the first listing already ranks busy processes first.
pub struct ProcessCensus {
    sys: Mutex<System>,
    users: Mutex<Users>,
}

impl Default for ProcessCensus {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCensus {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
            users: Mutex::new(Users::new_with_refreshed_list()),
        }
    }

    /// All processes, busiest first.
    ///
    /// Fields that cannot be read (e.g. another user's process) are left
    /// zero or empty; the process is still listed.
    #[instrument(skip(self), fields(operation = "list_processes"))]
    pub fn list_processes(&self) -> Vec<ProcessRecord> {
        let mut sys = self.sys.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        users.refresh();

        let total_memory = sys.total_memory();
        let mut records: Vec<ProcessRecord> = sys
            .processes()
            .values()
            .map(|p| {
                let resident = p.memory();
                ProcessRecord {
                    pid: p.pid().as_u32(),
                    name: p.name().to_string_lossy().into_owned(),
                    cpu_percent: lifetime_cpu_percent(p.accumulated_cpu_time(), p.run_time()),
                    memory_percent: if total_memory > 0 {
                        resident as f64 / total_memory as f64 * 100.0
                    } else {
                        0.0
                    },
                    resident_bytes: resident,
                    status: p.status().to_string(),
                    owner: p
                        .user_id()
                        .and_then(|uid| users.get_user_by_id(uid))
                        .map(|u| u.name().to_string())
                        .unwrap_or_default(),
                }
            })
            .collect();

        // The process table is a map; pid order is the enumeration order.
        records.sort_by_key(|r| r.pid);
        sort_by_cpu_desc(&mut records);
        tracing::debug!(processes = records.len(), "process census");
        records
    }

    /// Send the default kill signal to `pid`.
    #[instrument(skip(self), fields(operation = "terminate"))]
    pub fn terminate(&self, pid: u32) -> Result<(), ActionError> {
        let mut sys = self.sys.lock().unwrap_or_else(PoisonError::into_inner);
        let target = Pid::from_u32(pid);
        sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        let process = sys.process(target).ok_or(ActionError::ProcessNotFound(pid))?;
        if process.kill() {
            tracing::info!(pid, "process terminated");
            Ok(())
        } else {
            tracing::warn!(pid, "kill signal failed");
            Err(ActionError::SignalFailed(pid))
        }
    }
}

/// CPU time used since start as a percentage of wall time since start. May
/// exceed 100 for a process running on several cores.
pub fn lifetime_cpu_percent(cpu_time_ms: u64, run_time_secs: u64) -> f64 {
    if run_time_secs == 0 {
        return 0.0;
    }
    cpu_time_ms as f64 / (run_time_secs as f64 * 1000.0) * 100.0
}

/// Stable sort by CPU percent, highest first. Ties keep their relative order.
pub fn sort_by_cpu_desc(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
}
