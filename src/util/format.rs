/// Human-readable byte count: two decimals, trailing zeros trimmed
/// (`0 B`, `980 B`, `1.5 KB`, `11 MB`).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_owned();
    }
    let exp = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exp as i32);
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exp])
}

#[cfg(test)]
mod tests {
    use super::format_bytes;

    #[test]
    fn zero_is_special_cased() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn sub_kilobyte_stays_in_bytes() {
        assert_eq!(format_bytes(980), "980 B");
    }

    #[test]
    fn round_values_drop_the_decimals() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(11 * 1024 * 1024), "11 MB");
    }

    #[test]
    fn fractional_values_keep_up_to_two_decimals() {
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 + 256), "1.25 KB");
    }

    #[test]
    fn huge_values_cap_at_gigabytes() {
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024), "2 GB");
        // Beyond the table the unit stays GB rather than overflowing it.
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048 GB");
    }
}
