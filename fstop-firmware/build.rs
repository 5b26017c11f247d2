//! Build script for fstop-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates timer.toml at compile time and emits it as a `TimerConfig`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Settings read from timer.toml
struct Settings {
    kind: &'static str,
    brightness: i64,
    intensity: i64,
    digits: i64,
    default_seconds: i64,
    tick_ms: i64,
    interval_hundredths: i64,
}

/// Validate timer.toml and write `timer_config.rs` into OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=timer.toml");

    let config_path = Path::new("timer.toml");
    if !config_path.exists() {
        fail("timer.toml not found", &["Create one in the fstop-firmware directory."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read timer.toml", &[&e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in timer.toml", &lines);
        }
    };

    let settings = validate(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("timer_config.rs")).unwrap();
    write!(
        f,
        "/// Board settings from timer.toml\n\
         pub const TIMER_CONFIG: TimerConfig = TimerConfig {{\n\
         \x20   display: DisplayKind::{},\n\
         \x20   brightness: {},\n\
         \x20   intensity: {},\n\
         \x20   digits: {},\n\
         \x20   default_seconds: {},\n\
         \x20   tick_ms: {},\n\
         \x20   fstop_interval_hundredths: {},\n\
         }};\n",
        settings.kind,
        settings.brightness,
        settings.intensity,
        settings.digits,
        settings.default_seconds,
        settings.tick_ms,
        settings.interval_hundredths,
    )
    .unwrap();

    println!("cargo:warning=timer.toml validated successfully");
}

fn validate(config: &toml::Value) -> Settings {
    let mut errors = Vec::new();

    let display = config.get("display").and_then(|d| d.as_table());
    let timer = config.get("timer").and_then(|t| t.as_table());

    if display.is_none() {
        errors.push("Missing [display] section".to_string());
    }
    if timer.is_none() {
        errors.push("Missing [timer] section".to_string());
    }

    let kind = match display.and_then(|d| d.get("kind")) {
        Some(toml::Value::String(kind)) if kind == "tm1637" => "Tm1637",
        Some(toml::Value::String(kind)) if kind == "max7219" => "Max7219",
        Some(_) => {
            errors.push("[display] kind must be 'tm1637' or 'max7219'".to_string());
            "Max7219"
        }
        None => {
            errors.push("[display] missing 'kind'".to_string());
            "Max7219"
        }
    };

    let mut int = |table: Option<&toml::Table>, section: &str, key: &str, default: i64, min: i64, max: i64| {
        match table.and_then(|t| t.get(key)) {
            None => default,
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
            Some(_) => {
                errors.push(format!("[{}] {} must be an integer {}-{}", section, key, min, max));
                default
            }
        }
    };

    let brightness = int(display, "display", "brightness", 4, 0, 7);
    let intensity = int(display, "display", "intensity", 4, 0, 15);
    let digits = int(display, "display", "digits", 4, 1, 8);
    let default_seconds = int(timer, "timer", "default_seconds", 10, 0, 255);
    // Countdown frames cannot come faster than the 8 ms input poll
    let tick_ms = int(timer, "timer", "tick_ms", 100, 8, 65_535);

    let interval_hundredths = match timer.and_then(|t| t.get("fstop_interval")) {
        None => 50,
        Some(toml::Value::Float(stops)) if *stops >= 0.01 && *stops <= 2.55 => {
            (stops * 100.0).round() as i64
        }
        Some(_) => {
            errors.push("[timer] fstop_interval must be a number 0.01-2.55".to_string());
            50
        }
    };

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid timer.toml configuration", &lines);
    }

    Settings {
        kind,
        brightness,
        intensity,
        digits,
        default_seconds,
        tick_ms,
        interval_hundredths,
    }
}

/// Shorten `line` to at most `max` characters, ending in `...` if cut
fn truncate(line: &str, max: usize) -> String {
    if line.chars().count() > max {
        let kept: String = line.chars().take(max - 3).collect();
        format!("{}...", kept)
    } else {
        line.to_string()
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            format!("║  • {:<62} ║", truncate(line, 62))
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
