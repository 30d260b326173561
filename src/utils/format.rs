/// Dollar amount with a B/M/K suffix: `$1.23M`, `$4.5K`, `$12.00`.
pub fn format_number(num: f64) -> String {
    if num >= 1e9 {
        format!("${:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("${:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("${:.1}K", num / 1e3)
    } else {
        format!("${:.2}", num)
    }
}

pub fn format_compact(num: u64) -> String {
    if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1e3)
    } else {
        num.to_string()
    }
}

/// Price with precision scaled to its magnitude.
pub fn format_price(price: f64) -> String {
    if price < 0.000001 {
        format!("${:.9}", price)
    } else if price < 0.01 {
        format!("${:.6}", price)
    } else if price < 1.0 {
        format!("${:.4}", price)
    } else {
        format!("${:.2}", price)
    }
}
