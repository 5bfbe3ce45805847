use ordered_float::OrderedFloat;

/// Rolling window (samples, 1 Hz) used by Normalized Power.
pub const NP_WINDOW: usize = 30;

pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// Rounds .5 towards +inf, so negative balances round like the dashboard charts.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Rounded, clamped to the u32 range. Non-finite input gives 0.
#[inline]
pub fn round_u32(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 { return 0; }
    x.round().min(u32::MAX as f64) as u32
}

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() { return None; }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Normalized Power:
/// 1) 30 s trailing rolling mean, from sample 29 on
/// 2) mean of the 4th powers
/// 3) 4th root
///
/// Under 30 samples the plain mean is returned (0 for an empty series).
pub fn normalized_power(watts: &[f64]) -> u32 {
    if watts.len() < NP_WINDOW {
        return mean(watts).map(round_u32).unwrap_or(0);
    }

    let mut smooth = Vec::with_capacity(watts.len() + 1 - NP_WINDOW);
    let mut sum = 0.0f64;

    for i in 0..watts.len() {
        sum += watts[i];
        if i >= NP_WINDOW {
            sum -= watts[i - NP_WINDOW];
        }
        if i + 1 >= NP_WINDOW {
            smooth.push(sum / NP_WINDOW as f64);
        }
    }

    let fourth_power_avg = smooth.iter().map(|v| v.powi(4)).sum::<f64>() / smooth.len() as f64;
    round_u32(fourth_power_avg.powf(0.25))
}

/// Rounded mean power, `None` for an empty series.
pub fn average_power(watts: &[f64]) -> Option<u32> {
    mean(watts).map(round_u32)
}

pub fn max_power(watts: &[f64]) -> Option<u32> {
    watts
        .iter()
        .copied()
        .filter(|w| !w.is_nan())
        .map(OrderedFloat)
        .max()
        .map(|m| round_u32(m.into_inner()))
}

/// TSS = duration * NP * IF / (FTP * 3600) * 100, one decimal.
/// 0 when FTP is not configured or there is no power.
pub fn training_stress_score(np: f64, ftp: f64, duration_secs: f64) -> f64 {
    if ftp <= 0.0 || np <= 0.0 { return 0.0; }
    let intensity_factor = np / ftp;
    let tss = (duration_secs * np * intensity_factor) / (ftp * 3600.0) * 100.0;
    tss.round_to(1)
}

/// IF = NP/FTP, two decimals.
pub fn intensity_factor(np: f64, ftp: f64) -> f64 {
    if ftp <= 0.0 { return 0.0; }
    (np / ftp).round_to(2)
}

/// VI = NP / AvgPower, two decimals.
pub fn variability_index(np: f64, avg_power: f64) -> f64 {
    if avg_power <= 0.0 { return 0.0; }
    (np / avg_power).round_to(2)
}

/// Mechanical work estimate when the provider did not report kilojoules.
pub fn estimated_kilojoules(avg_power: f64, duration_secs: f64) -> u32 {
    round_u32(avg_power * duration_secs / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_keeps_requested_decimals() {
        assert_eq!(1.23456_f64.round_to(2), 1.23);
        assert_eq!(99.95_f64.round_to(0), 100.0);
    }

    #[test]
    fn round_half_up_on_negative_halves() {
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-4.2), -4.0);
    }

    #[test]
    fn round_u32_guards_non_finite() {
        assert_eq!(round_u32(f64::NAN), 0);
        assert_eq!(round_u32(-3.0), 0);
        assert_eq!(round_u32(249.5), 250);
    }

    #[test]
    fn max_power_ignores_nan() {
        assert_eq!(max_power(&[100.0, f64::NAN, 420.4]), Some(420));
        assert_eq!(max_power(&[]), None);
    }
}
