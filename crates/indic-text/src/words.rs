//! Number-to-words conversion in the Indian numbering system

/// Names for 0-19; the teens are irregular and need their own entries
const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

/// Names for the tens, 20-90
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const LAKH: u64 = 100_000;
const CRORE: u64 = 10_000_000;

/// Convert 0-999 to words ("" for 0)
fn hundreds_in_words(n: u64) -> String {
    debug_assert!(n < 1000);

    let mut parts: Vec<String> = Vec::new();
    if n >= 100 {
        parts.push(format!("{} Hundred", ONES[(n / 100) as usize]));
    }

    let rest = n % 100;
    if rest >= 20 {
        let tens = TENS[(rest / 10) as usize];
        let ones = rest % 10;
        if ones > 0 {
            parts.push(format!("{} {}", tens, ONES[ones as usize]));
        } else {
            parts.push(tens.to_string());
        }
    } else if rest > 0 {
        parts.push(ONES[rest as usize].to_string());
    }

    parts.join(" ")
}

/// Convert a non-negative integer to Indian-system words
///
/// # Examples
/// ```
/// use indic_text::number_in_words;
/// assert_eq!(number_in_words(0), "Zero");
/// assert_eq!(number_in_words(100_000), "One Lakh");
/// assert_eq!(number_in_words(10_000_000), "One Crore");
/// ```
pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    if n >= CRORE {
        // Crore counts can themselves exceed 99 (e.g., Arab-scale amounts);
        // recurse so they group correctly
        parts.push(format!("{} Crore", number_in_words(n / CRORE)));
    }
    let lakhs = (n / LAKH) % 100;
    if lakhs > 0 {
        parts.push(format!("{} Lakh", hundreds_in_words(lakhs)));
    }
    let thousands = (n / 1000) % 100;
    if thousands > 0 {
        parts.push(format!("{} Thousand", hundreds_in_words(thousands)));
    }
    let rest = n % 1000;
    if rest > 0 {
        parts.push(hundreds_in_words(rest));
    }

    parts.join(" ")
}

/// Convert a rupee amount to words: `"<words> Rupees[ and <words> Paise]"`
///
/// Paise are rounded to the nearest whole paisa and carried into rupees when
/// they round up to a full rupee. The Paise clause only appears for a
/// non-zero paisa part; zero yields "Zero Rupees".
///
/// # Examples
/// ```
/// use indic_text::amount_in_words;
/// assert_eq!(amount_in_words(0.0), "Zero Rupees");
/// assert_eq!(amount_in_words(1500.50), "One Thousand Five Hundred Rupees and Fifty Paise");
/// ```
pub fn amount_in_words(amount: f64) -> String {
    let total_paise = (amount.abs() * 100.0).round() as u64;
    let rupees = total_paise / 100;
    let paise = total_paise % 100;

    if paise > 0 {
        format!(
            "{} Rupees and {} Paise",
            number_in_words(rupees),
            number_in_words(paise)
        )
    } else {
        format!("{} Rupees", number_in_words(rupees))
    }
}
