use placeholdr::{Outcome, PlaceholderEvent, ResolutionReport};

/// Terminal styling keyed by what a piece of text *is* rather than by color.
mod style {
    use placeholdr::Outcome;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Role {
        Title,
        Section,
        Index,
        Key,
        Resolved,
        Defaulted,
        Unresolved,
        Note,
    }

    impl Role {
        fn sgr(self) -> &'static str {
            match self {
                Role::Title => "1;36",
                Role::Section => "90",
                Role::Index => "90",
                Role::Key => "34",
                Role::Resolved => "1;32",
                Role::Defaulted => "1;35",
                Role::Unresolved => "33",
                Role::Note => "2",
            }
        }

        /// The role used to show a placeholder's value.
        pub fn for_outcome(outcome: Outcome) -> Role {
            if outcome.contains(Outcome::LEFT_UNRESOLVED) {
                Role::Unresolved
            } else if outcome.contains(Outcome::DEFAULT_USED) {
                Role::Defaulted
            } else {
                Role::Resolved
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn apply(&self, role: Role, s: impl AsRef<str>) -> String {
            match self.enabled {
                true => format!("\x1b[{}m{}\x1b[0m", role.sgr(), s.as_ref()),
                false => s.as_ref().to_string(),
            }
        }

        pub fn section(&self, title: &str) -> String {
            self.apply(Role::Section, format!("━━━ {title} ━━━"))
        }
    }
}

use style::{Palette, Role};

/// Labels for each outcome flag, in display order.
const OUTCOME_LABELS: &[(Outcome, &str)] = &[
    (Outcome::LOOKUP_HIT, "lookup"),
    (Outcome::FALLBACK_KEY_HIT, "lookup (key before separator)"),
    (Outcome::DEFAULT_USED, "inline default"),
    (Outcome::LEFT_UNRESOLVED, "unresolved"),
    (Outcome::NESTED_KEY, "nested key"),
    (Outcome::NESTED_VALUE, "nested value"),
];

pub fn print_report(report: &ResolutionReport, color: bool) {
    let palette = Palette::new(color);
    println!("\n{}", palette.apply(Role::Title, format!("⚙  Resolving: {:?}", report.text)));

    println!("\n{}", palette.section("Placeholders"));
    if report.details.events.is_empty() {
        println!("  {}", palette.apply(Role::Note, "No placeholders found"));
    }
    for (idx, event) in report.details.events.iter().enumerate() {
        print_event(idx, event, &palette);
    }

    println!("\n{}", palette.section("Output"));
    println!("  {}", palette.apply(Role::Resolved, &report.output));

    let metrics = &report.details.metrics;
    println!("\n{}", palette.section("Summary"));
    println!(
        "  Resolved: {}  │  Defaults: {}  │  Unresolved: {}  │  Lookups: {}  │  Depth: {}",
        palette.apply(Role::Resolved, metrics.resolved.to_string()),
        palette.apply(Role::Defaulted, metrics.defaults_applied.to_string()),
        palette.apply(Role::Unresolved, metrics.left_unresolved.to_string()),
        palette.apply(Role::Note, metrics.lookups.to_string()),
        palette.apply(Role::Note, metrics.max_depth_reached.to_string()),
    );
    println!("  Total: {}", palette.apply(Role::Note, format!("{:?}", report.elapsed)));
    println!();
}

fn print_event(idx: usize, event: &PlaceholderEvent, palette: &Palette) {
    let indent = "  ".repeat(event.depth + 1);
    let value = match &event.value {
        Some(value) => format!("{value:?}"),
        None => "(left in place)".to_string(),
    };

    println!(
        "{indent}{} {} → {}",
        palette.apply(Role::Index, format!("[{idx}]")),
        palette.apply(Role::Key, &event.key),
        palette.apply(Role::for_outcome(event.outcome), value),
    );
    if event.placeholder != event.key {
        println!("{indent}    {}", palette.apply(Role::Note, format!("written as: {}", event.placeholder)));
    }
    println!("{indent}    {}", palette.apply(Role::Note, format!("via: {}", describe(event.outcome))));
}

fn describe(outcome: Outcome) -> String {
    let labels: Vec<&str> =
        OUTCOME_LABELS.iter().filter(|(flag, _)| outcome.contains(*flag)).map(|(_, label)| *label).collect();
    labels.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_flags_in_display_order() {
        assert_eq!(describe(Outcome::NESTED_VALUE | Outcome::LOOKUP_HIT), "lookup, nested value");
        assert_eq!(describe(Outcome::empty()), "");
    }

    #[test]
    fn value_role_follows_outcome() {
        assert_eq!(Role::for_outcome(Outcome::LOOKUP_HIT), Role::Resolved);
        assert_eq!(Role::for_outcome(Outcome::DEFAULT_USED | Outcome::NESTED_KEY), Role::Defaulted);
        assert_eq!(Role::for_outcome(Outcome::LEFT_UNRESOLVED), Role::Unresolved);
    }

    #[test]
    fn disabled_palette_emits_plain_text() {
        assert_eq!(Palette::new(false).apply(Role::Key, "k"), "k");
        assert_eq!(Palette::new(true).apply(Role::Key, "k"), "\x1b[34mk\x1b[0m");
    }
}
