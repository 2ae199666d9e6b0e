use colored::Colorize;

/// Outcome of a best-effort bulk tag operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkTagSummary {
    pub success: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

impl BulkTagSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub const fn add_success(&mut self) {
        self.success += 1;
    }
    pub fn add_error(&mut self, msg: String) {
        self.errors += 1;
        self.error_messages.push(msg);
    }
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.errors
    }
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
    pub fn print(&self, operation: &str) {
        println!("\n{}", format!("=== {operation} Summary ===").bold());
        println!("  {} {}", "✓ Success:".green(), self.success);
        if self.errors > 0 {
            println!("  {} {}", "✗ Errors:".red(), self.errors);
            println!("\n{}", "Error details:".red().bold());
            for msg in &self.error_messages {
                println!("  - {msg}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = BulkTagSummary::new();
        summary.add_success();
        summary.add_success();
        summary.add_error("/b.png: remote refused".into());

        assert_eq!(summary.success, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_clean());
        assert_eq!(summary.error_messages, vec!["/b.png: remote refused"]);
    }
}
