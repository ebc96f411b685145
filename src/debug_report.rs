use groupling::{ComponentValue, Event, GroupingComponent, GroupingVariant, get_hashes};
use indexmap::IndexMap;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_report(event: &Event, variants: &IndexMap<String, GroupingVariant>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint("⚙  Grouping report", ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Event ━━━", ansi::GRAY));
    println!("  fingerprint: {}", palette.paint(format!("{:?}", event.fingerprint), ansi::YELLOW));
    if let Some(checksum) = &event.checksum {
        println!("  checksum:    {}", palette.paint(checksum, ansi::YELLOW));
    }
    if let Some(message) = &event.message {
        println!("  message:     {}", palette.dim(message));
    }

    println!("\n{}", palette.paint("━━━ Variants ━━━", ansi::GRAY));
    for (name, variant) in variants {
        let marker = if variant.contributes() {
            palette.paint("✓", ansi::GREEN)
        } else {
            palette.dim("✗")
        };
        println!(
            "  {} {} {} {}",
            marker,
            palette.bold(palette.paint(name, ansi::BLUE)),
            palette.dim("│"),
            palette.dim(variant.description()),
        );
        match variant.hash() {
            Some(hash) => println!("      {} {}", palette.dim("hash:"), palette.paint(hash, ansi::GREEN)),
            None => println!("      {} {}", palette.dim("hash:"), palette.dim("(none)")),
        }
        if let Some(component) = variant.component() {
            print_component(component, 6, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Hashes ━━━", ansi::GRAY));
    let hashes = get_hashes(variants);
    if hashes.is_empty() {
        println!("{}", palette.dim("  No contributing variants"));
    } else {
        for (idx, hash) in hashes.iter().enumerate() {
            println!(
                "  {} {}",
                palette.paint(format!("[{idx}]"), ansi::GRAY),
                palette.bold(palette.paint(hash, ansi::GREEN)),
            );
        }
    }
    println!();
}

fn print_component(component: &GroupingComponent, indent: usize, palette: &ansi::Palette) {
    let pad = " ".repeat(indent);
    let marker = if component.contributes() { palette.paint("+", ansi::GREEN) } else { palette.dim("-") };
    let hint = match component.hint() {
        Some(hint) => palette.dim(format!("  ({hint})")),
        None => String::new(),
    };
    println!("{pad}{marker} {}{hint}", palette.paint(component.id(), ansi::CYAN));

    for value in component.values() {
        match value {
            ComponentValue::Token(token) => {
                println!("{pad}    {}", palette.dim(format!("\"{token}\"")));
            }
            ComponentValue::Component(child) => print_component(child, indent + 2, palette),
        }
    }
}
