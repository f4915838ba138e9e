//! Lint: engine code must not create its own randomness or read the clock.
//!
//! Every weekly roll goes through the `RngCore` the caller passes in, so a
//! seeded session replays exactly. Only `career/mod.rs` (the `Session`)
//! may construct an RNG; the other files under `src/career/` take one as a
//! parameter.
//!
//! Test modules (everything after `#[cfg(test)]`) are not checked.

use std::fs;
use std::path::Path;

const FORBIDDEN: [&str; 6] = [
    "SimpleRng::new",
    "SimpleRng::from_clock",
    "thread_rng",
    "SystemTime::now",
    "Date::now",
    "from_entropy",
];

/// Scan non-test source for forbidden calls.
fn find_ambient_randomness(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        if FORBIDDEN.iter().any(|f| line.contains(f)) {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn engine_takes_rng_as_parameter() {
    let career_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/career");
    let mut all_violations = Vec::new();

    let Ok(entries) = fs::read_dir(&career_dir) else {
        panic!("missing {}", career_dir.display());
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_engine_file = path.extension().map(|e| e == "rs").unwrap_or(false)
            && path.file_name().map(|n| n != "mod.rs").unwrap_or(false);
        if !is_engine_file {
            continue;
        }
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        let display_path = path.display().to_string();
        for (line_num, line) in find_ambient_randomness(&source) {
            all_violations.push((display_path.clone(), line_num, line));
        }
    }

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found RNG construction or clock reads in engine code.\n\
             Take `rng: &mut R` where `R: RngCore + ?Sized` instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_seeded_rng_in_engine() {
        let source = "fn roll() {\n    let mut rng = SimpleRng::new(4);\n}\n";
        let violations = find_ambient_randomness(source);
        assert_eq!(violations, vec![(2, "let mut rng = SimpleRng::new(4);".to_string())]);
    }

    #[test]
    fn ignores_comments() {
        let source = "// SimpleRng::from_clock() lives in the session\nfn f() {}\n";
        assert!(find_ambient_randomness(source).is_empty());
    }

    #[test]
    fn ignores_test_modules() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests {\n    let r = SimpleRng::new(1);\n}\n";
        assert!(find_ambient_randomness(source).is_empty());
    }

    #[test]
    fn allows_injected_rng() {
        let source = "pub fn tick<R: RngCore + ?Sized>(rng: &mut R) {}\n";
        assert!(find_ambient_randomness(source).is_empty());
    }
}
