//! Regression test parameters and operations

use crate::error::TestError;
use texstat_core::Float4;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Record mismatches as failures (default)
    #[default]
    Compare,
    /// Display mode - print every comparison, never fail
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "variance")
    pub test_name: String,
    /// Current test index (incremented before each test)
    index: usize,
    /// Test mode (compare or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "variance")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, failure: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, failure);
        if !self.display() {
            self.failures.push(failure);
            self.success = false;
        }
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value (typically from a brute-force reference)
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if self.display() {
            eprintln!("  [{}] expected = {}, actual = {}", self.index, expected, actual);
        }

        // NaN never compares within delta
        if !((expected - actual).abs() <= delta) {
            self.record(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two `f32` arrays element by element
    ///
    /// Counts as a single comparison; only the first mismatch is recorded.
    pub fn compare_f32_slices(&mut self, expected: &[f32], actual: &[f32], delta: f64) -> bool {
        self.index += 1;

        if expected.len() != actual.len() {
            self.record(TestError::LengthMismatch {
                index: self.index,
                expected: expected.len(),
                actual: actual.len(),
            });
            return false;
        }

        let mismatch = expected
            .iter()
            .zip(actual)
            .map(|(&e, &a)| (e as f64, a as f64))
            .find(|(e, a)| !((e - a).abs() <= delta));

        match mismatch {
            Some((e, a)) => {
                self.record(TestError::ValueMismatch {
                    index: self.index,
                    expected: e,
                    actual: a,
                    delta,
                });
                false
            }
            None => true,
        }
    }

    /// Compare two `Float4` arrays channel by channel
    ///
    /// Counts as a single comparison; only the first mismatch is recorded.
    pub fn compare_float4_slices(
        &mut self,
        expected: &[Float4],
        actual: &[Float4],
        delta: f64,
    ) -> bool {
        let flat = |v: &[Float4]| -> Vec<f32> { v.iter().flat_map(|f| f.to_array()).collect() };
        self.compare_f32_slices(&flat(expected), &flat(actual), delta)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        // We can't safely remove env vars in tests; just check the result
        // is a valid mode
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        rp.mode = RegTestMode::Compare;
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        rp.mode = RegTestMode::Compare;
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        rp.mode = RegTestMode::Compare;
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(1.0, f64::NAN, 10.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 2);
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_slices() {
        let mut rp = RegParams::new("test");
        rp.mode = RegTestMode::Compare;
        assert!(rp.compare_f32_slices(&[1.0, 2.0], &[1.0, 2.05], 0.1));
        assert!(!rp.compare_f32_slices(&[1.0, 2.0], &[1.0], 0.1));
        assert!(!rp.compare_float4_slices(
            &[Float4::splat(1.0)],
            &[Float4::new(1.0, 1.0, 1.5, 1.0)],
            0.1
        ));
        assert!(matches!(
            rp.failures(),
            [TestError::LengthMismatch { .. }, TestError::ValueMismatch { .. }]
        ));
    }
}
