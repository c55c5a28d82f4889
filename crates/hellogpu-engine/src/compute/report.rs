use std::fmt;
use std::time::Duration;

/// Result and wall-clock time of one reduction path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub label: String,
    pub result: i64,
    pub elapsed: Duration,
}

impl Measurement {
    pub fn new(label: impl Into<String>, result: i64, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            result,
            elapsed,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} result: {}, time: {}",
            self.label,
            self.result,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Device path vs. host-only path for the same input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionReport {
    pub device: Measurement,
    pub host: Measurement,
    /// Number of partial sums read back from the device.
    pub partials: usize,
}

impl ReductionReport {
    /// Whether both paths produced the same total.
    pub fn agrees(&self) -> bool {
        self.device.result == self.host.result
    }
}

impl fmt::Display for ReductionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.device)?;
        write!(f, "{}", self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_line_format() {
        let m = Measurement::new("GPU", 495_012_345, Duration::from_millis(1500));
        assert_eq!(m.to_string(), "GPU result: 495012345, time: 1.5");
    }

    #[test]
    fn report_prints_device_then_host() {
        let report = ReductionReport {
            device: Measurement::new("GPU", 45, Duration::from_micros(250)),
            host: Measurement::new("CPU", 45, Duration::from_micros(20)),
            partials: 4,
        };
        assert_eq!(
            report.to_string(),
            "GPU result: 45, time: 0.00025\nCPU result: 45, time: 0.00002"
        );
        assert!(report.agrees());
    }
}
