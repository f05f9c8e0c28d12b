//! Census progress reporting.

use std::time::Instant;

use crate::census::SizeCensus;

/// Current process memory usage in bytes (RSS), if the platform reports it.
#[cfg(target_os = "linux")]
pub fn get_memory_usage() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(target_os = "linux"))]
pub fn get_memory_usage() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Rate tracking for one census run.
#[derive(Debug, Default)]
pub struct CensusStats {
    /// Boards examined during this run (not counting resumed progress)
    pub boards_examined: u64,

    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_boards: u64,
}

impl CensusStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record(&mut self, boards: u64) {
        self.boards_examined += boards;
    }

    /// Boards per second since the run started
    pub fn boards_per_sec(&self) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.boards_examined as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        self.last_log_time
            .map_or(true, |last| last.elapsed().as_secs() >= interval_secs)
    }

    /// Log progress on `census` and reset the log timer
    pub fn log_progress(&mut self, census: &SizeCensus) {
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        let rate = match self.last_log_time {
            Some(last) if last.elapsed().as_secs_f64() > 0.0 => {
                (self.boards_examined - self.last_log_boards) as f64 / last.elapsed().as_secs_f64()
            }
            _ => self.boards_per_sec(),
        };

        let pct = 100.0 * census.next as f64 / census.total() as f64;
        let mem_str = get_memory_usage()
            .map(|m| format!(" mem={}", format_bytes(m)))
            .unwrap_or_default();

        println!(
            "[{:02}:{:02}:{:02}] {}x{} {:.1}% boards={}/{} solvable={} unsolvable={} rate={:.0}/s{}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            census.size,
            census.size,
            pct,
            census.next,
            census.total(),
            census.solvable,
            census.unsolvable,
            rate,
            mem_str,
        );

        self.last_log_time = Some(Instant::now());
        self.last_log_boards = self.boards_examined;
    }

    /// Print final summary
    pub fn print_summary(&self, entries: &[SizeCensus]) {
        for census in entries {
            let state = if census.is_complete() { "complete" } else { "partial" };
            println!(
                "{}x{} ({}): {} boards, {} solvable, {} unsolvable",
                census.size,
                census.size,
                state,
                census.examined(),
                census.solvable,
                census.unsolvable
            );
            if let Some(max) = census.max_presses() {
                println!("  Longest shortest solution: {} presses", max);
                for (presses, &count) in census.histogram.iter().enumerate().filter(|(_, &n)| n > 0) {
                    println!("  {:>3} presses: {}", presses, count);
                }
            }
        }

        println!("Boards examined this run: {}", self.boards_examined);
        println!("Average rate: {:.0} boards/sec", self.boards_per_sec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_should_log_after_interval() {
        let mut stats = CensusStats::new();
        stats.record(10);
        assert!(stats.should_log(0));
        assert!(!stats.should_log(3600));
        assert_eq!(stats.boards_examined, 10);
    }
}
