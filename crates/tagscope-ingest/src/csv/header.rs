//! Header and cell normalization.

/// Trims whitespace and a stray BOM, and collapses inner whitespace runs.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Unwraps a line that is enclosed in one pair of double quotes as a whole,
/// e.g. `"r1,EC2,us-east-1,100"`. Some billing exports quote every line
/// this way. Lines with embedded quotes are left for the CSV parser.
pub fn unwrap_quoted_line(line: &str) -> &str {
    let trimmed = line.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
        return line;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    if inner.contains('"') || !inner.contains(',') {
        return line;
    }
    inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Monthly   Cost  "), "Monthly Cost");
        assert_eq!(normalize_header("\u{feff}ResourceID"), "ResourceID");
    }

    #[test]
    fn test_unwrap_whole_line_quotes() {
        assert_eq!(unwrap_quoted_line("\"r1,EC2,100\""), "r1,EC2,100");
        assert_eq!(unwrap_quoted_line("  \"a,b\"  "), "a,b");
    }

    #[test]
    fn test_unwrap_keeps_regular_quoting() {
        let line = "\"a,b\",\"c\"";
        assert_eq!(unwrap_quoted_line(line), line);
        assert_eq!(unwrap_quoted_line("\"single\""), "\"single\"");
        assert_eq!(unwrap_quoted_line("r1,EC2"), "r1,EC2");
    }
}
