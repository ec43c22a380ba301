use std::{
    env,
    path::{Path, PathBuf},
    thread,
};

use sysinfo::{Disks, System};

use crate::console::{OutputLine, SegmentStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageEstimate {
    pub used_bytes: u64,
    pub quota_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub logical_cores: Option<usize>,
    pub memory_bytes: Option<u64>,
    pub storage: Option<StorageEstimate>,
}

pub trait DeviceProbe: Send + Sync {
    fn probe(&self) -> DeviceInfo;
}

/// Reads what the host exposes without extra privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl DeviceProbe for SystemProbe {
    fn probe(&self) -> DeviceInfo {
        let mut system = System::new();
        system.refresh_memory();
        let memory_bytes = Some(system.total_memory()).filter(|&bytes| bytes > 0);

        let volumes: Vec<Volume> = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|disk| Volume {
                mount_point: disk.mount_point().to_path_buf(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();
        let storage = env::current_dir()
            .ok()
            .and_then(|dir| storage_for(&dir, &volumes));

        DeviceInfo {
            logical_cores: thread::available_parallelism().ok().map(|n| n.get()),
            memory_bytes,
            storage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Volume {
    mount_point: PathBuf,
    total_bytes: u64,
    available_bytes: u64,
}

/// Usage of the volume holding `dir`: the one with the deepest mount point
/// that is a prefix of it.
fn storage_for(dir: &Path, volumes: &[Volume]) -> Option<StorageEstimate> {
    let volume = volumes
        .iter()
        .filter(|v| v.total_bytes > 0 && dir.starts_with(&v.mount_point))
        .max_by_key(|v| v.mount_point.components().count())?;
    Some(StorageEstimate {
        used_bytes: volume.total_bytes.saturating_sub(volume.available_bytes),
        quota_bytes: volume.total_bytes,
    })
}

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

pub fn device_info_lines(info: &DeviceInfo) -> Vec<OutputLine> {
    let cores = info
        .logical_cores
        .map_or_else(|| "N/A".to_string(), |n| n.to_string());
    let memory = info.memory_bytes.map_or_else(
        || "N/A".to_string(),
        |bytes| format!("{:.2} GB", bytes as f64 / GIB),
    );

    let mut lines = vec![
        OutputLine::plain("Device Information:"),
        OutputLine::plain("  - Logical CPU Cores: ").highlight(cores),
        OutputLine::plain("  - Device Memory (RAM): ").highlight(memory),
    ];
    lines.push(match info.storage {
        Some(estimate) => OutputLine::plain("  - Local Storage: ").styled(
            format!(
                "{:.2} MB used / {:.2} MB total",
                estimate.used_bytes as f64 / MIB,
                estimate.quota_bytes as f64 / MIB
            ),
            SegmentStyle::Highlight,
        ),
        None => OutputLine::plain("  - Local Storage: not reported by this platform."),
    });
    lines.push(OutputLine::comment(
        "// Note: figures come from the operating system and may be approximate.",
    ));
    lines
}
