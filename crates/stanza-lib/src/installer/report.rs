//! Fire and forget progress reporting.

/// Receives human readable progress lines. The installer never blocks on it.
pub trait Report {
	fn writeln(&mut self, line: &str);
}

/// Routes progress lines to the `log` crate.
#[derive(Debug, Default)]
pub struct LogReport;

impl Report for LogReport {
	fn writeln(&mut self, line: &str) {
		log::info!("{}", line);
	}
}
