//! Procedural knowledge galaxy.
//!
//! Topic clusters, their solar systems and the notes orbiting them are
//! generated by [`universe`], filtered and faded by [`visibility`], explored
//! through [`proximity`] queries and navigated with the [`viewport`]
//! controller. Everything here is synchronous and single-threaded.

pub mod config;
pub mod error;
pub mod proximity;
pub mod universe;
pub mod util;
pub mod viewport;
pub mod visibility;

pub use error::{GalaxyError, Result};

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    const MAX_WIDTH: usize = 100;

    fn overlong_lines(dir: &Path, found: &mut Vec<String>) {
        let entries = fs::read_dir(dir).expect("source directory is readable");
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                overlong_lines(&path, found);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let source = fs::read_to_string(&path).expect("source file is readable");
                for (number, line) in source.lines().enumerate() {
                    if line.chars().count() > MAX_WIDTH {
                        found.push(format!("{}:{}", path.display(), number + 1));
                    }
                }
            }
        }
    }

    #[test]
    fn sources_fit_the_formatter_width() {
        let mut found = Vec::new();
        overlong_lines(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut found);
        assert!(found.is_empty(), "lines wider than {MAX_WIDTH} columns: {found:?}");
    }
}
