use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;
use pprof::protos::Message;
use pprof::ProfilerGuard;

/// Sampling CPU profiler. Samples from start until [`CpuProfile::finish`],
/// which writes a pprof protobuf to the given path.
pub struct CpuProfile {
    guard: ProfilerGuard<'static>,
    path: PathBuf,
}

impl CpuProfile {
    pub fn start(path: &Path) -> Result<Self> {
        let guard = pprof::ProfilerGuardBuilder::default()
            .frequency(100)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()
            .map_err(|e| anyhow!("Failed to start profiler: {}", e))?;

        info!("CPU profiling to {}", path.display());
        Ok(CpuProfile {
            guard,
            path: path.to_path_buf(),
        })
    }

    pub fn finish(self) -> Result<()> {
        let report = self
            .guard
            .report()
            .build()
            .map_err(|e| anyhow!("Failed to build profile report: {}", e))?;

        let profile = report
            .pprof()
            .map_err(|e| anyhow!("Failed to generate protobuf profile: {}", e))?;

        let mut content = Vec::new();
        profile
            .encode(&mut content)
            .map_err(|e| anyhow!("Failed to encode profile protobuf: {}", e))?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write profile to {}", self.path.display()))?;

        info!("Profile written to {}", self.path.display());
        Ok(())
    }
}
