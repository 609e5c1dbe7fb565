//! Rendering helpers for CLI surfaces.
//!
//! Keeps command output bounded and readable while preserving signal.

use crate::core::model::Park;
use colored::Colorize;

/// Movement marker for a park's rank change since the last recompute:
/// `↑n` green, `↓n` red, `–` dimmed for no movement.
pub fn movement_marker(park: &Park) -> String {
    let delta = park.rank_delta();
    if delta > 0 {
        format!("↑{}", delta).green().to_string()
    } else if delta < 0 {
        format!("↓{}", -delta).red().to_string()
    } else {
        "–".dimmed().to_string()
    }
}

/// Collapse whitespace and bound length for one-line terminal display.
pub fn one_line(input: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(max_chars);
    let mut count = 0usize;
    for word in input.split_whitespace() {
        for ch in word.chars().chain(std::iter::once(' ')) {
            if count >= max_chars {
                out.truncate(out.trim_end().len());
                out.push_str("...");
                return out;
            }
            out.push(ch);
            count += 1;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn park_with_ranks(previous_rank: i64, current_rank: i64) -> Park {
        Park {
            id: 1,
            name: "Arches".to_string(),
            state: "Utah".to_string(),
            description: String::new(),
            image: "arches.jpg".to_string(),
            visitors: 0,
            established: 1971,
            size: 76_679,
            tag: None,
            rating: 1500,
            previous_rank,
            current_rank,
        }
    }

    #[test]
    fn marker_reflects_direction() {
        colored::control::set_override(false);
        assert_eq!(movement_marker(&park_with_ranks(5, 3)), "↑2");
        assert_eq!(movement_marker(&park_with_ranks(3, 5)), "↓2");
        assert_eq!(movement_marker(&park_with_ranks(4, 4)), "–");
    }

    #[test]
    fn one_line_collapses_and_bounds() {
        assert_eq!(one_line("red  rock\ncanyon", 40), "red rock canyon");
        let bounded = one_line("a very long description of a very scenic place", 10);
        assert!(bounded.len() <= 13);
        assert!(bounded.ends_with("..."));
    }

    #[test]
    fn one_line_exact_fit_has_no_ellipsis() {
        assert_eq!(one_line("short", 40), "short");
    }
}
