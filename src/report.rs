use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub subpackage: String,
    pub message: String,
}

/// Outcome of one batch run over all discovered sub-packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub action: &'static str,
    pub discovered: usize,
    pub succeeded: usize,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn new(action: &'static str, discovered: usize) -> Self {
        Self { action, discovered, succeeded: 0, failures: Vec::new() }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, subpackage: &str, message: impl Into<String>) {
        self.failures.push(Failure {
            subpackage: subpackage.to_string(),
            message: message.into(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "{} finished", self.action)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Found:     {} sub-packages", self.discovered)?;
        writeln!(f, "Succeeded: {}", self.succeeded)?;
        write!(f, "Failed:    {}", self.failed())?;

        if !self.failures.is_empty() {
            write!(f, "\n\nFailures:")?;
            for failure in &self.failures {
                write!(f, "\n  - {}: {}", failure.subpackage, failure.message)?;
            }
        }
        Ok(())
    }
}
