//! INR number and date formatting

use chrono::NaiveDate;

/// Format an amount with fixed 2 decimals and Indian digit grouping
///
/// The integer part groups the last three digits, then pairs of two:
/// 10000000 becomes "1,00,00,000.00".
///
/// # Examples
/// ```
/// use indic_text::format_inr;
/// assert_eq!(format_inr(1234.5), "1,234.50");
/// assert_eq!(format_inr(10000000.0), "1,00,00,000.00");
/// ```
pub fn format_inr(n: f64) -> String {
    let negative = n < 0.0;
    let total_paise = (n.abs() * 100.0).round() as u64;
    let int_part = total_paise / 100;
    let frac_part = total_paise % 100;

    let grouped = group_indian(int_part);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part:02}")
}

/// Apply Indian digit grouping to an integer
fn group_indian(n: u64) -> String {
    let s = n.to_string();
    if s.len() <= 3 {
        return s;
    }

    let (head, tail) = s.split_at(s.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let head_chars: Vec<char> = head.chars().collect();
    for chunk in head_chars.rchunks(2).rev() {
        groups.push(chunk.iter().collect());
    }
    groups.push(tail.to_string());
    groups.join(",")
}

/// Format an invoice date as DD-MM-YYYY
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use indic_text::format_date;
/// let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
/// assert_eq!(format_date(d), "07-03-2025");
/// ```
pub fn format_date(d: NaiveDate) -> String {
    d.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_small_numbers_no_grouping() {
        assert_eq!(format_inr(0.0), "0.00");
        assert_eq!(format_inr(999.0), "999.00");
    }

    #[test]
    fn test_thousand_grouping() {
        assert_eq!(format_inr(1000.0), "1,000.00");
        assert_eq!(format_inr(99999.0), "99,999.00");
    }

    #[test]
    fn test_lakh_and_crore_grouping() {
        assert_eq!(format_inr(100000.0), "1,00,000.00");
        assert_eq!(format_inr(12345678.9), "1,23,45,678.90");
        assert_eq!(format_inr(10000000.0), "1,00,00,000.00");
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        assert_eq!(format_inr(4719.999), "4,720.00");
        assert_eq!(format_inr(0.125), "0.13");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_inr(-1500.5), "-1,500.50");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(format_date(d), "01-12-2024");
    }
}
