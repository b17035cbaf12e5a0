use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::ConfigMap;
use crate::style::color::{is_hex_literal, normalize_color};

/// Non-fatal problems met while merging configuration sources
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{path}:{line}: could not parse '{text}'")]
    Malformed {
        path: PathBuf,
        line: usize,
        text: String,
    },
    #[error("{path}: include cycle, skipped")]
    IncludeCycle { path: PathBuf },
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
}

/// Where the cascade looks for configuration files
#[derive(Debug, Clone)]
pub struct Cascade {
    pub system_dir: PathBuf,
    pub home: Option<PathBuf>,
    pub cwd: PathBuf,
}

impl Cascade {
    /// `/etc`, `$HOME` and the current directory
    pub fn from_env() -> io::Result<Cascade> {
        Ok(Cascade {
            system_dir: PathBuf::from("/etc"),
            home: std::env::var_os("HOME").map(PathBuf::from),
            cwd: std::env::current_dir()?,
        })
    }

    /// Candidate paths for `name`, lowest precedence first: `/etc/<name>`,
    /// `$HOME/.<name>`, then every ancestor of the working directory from the
    /// root down to the working directory itself.
    pub fn paths(&self, name: &str) -> Vec<PathBuf> {
        let dotted = format!(".{name}");
        let mut paths = vec![self.system_dir.join(name)];
        if let Some(home) = &self.home {
            paths.push(home.join(&dotted));
        }
        // ancestors() yields the nearest first; stack them so it comes out last
        let mut ancestors: Vec<PathBuf> = self.cwd.ancestors().map(|dir| dir.join(&dotted)).collect();
        while let Some(path) = ancestors.pop() {
            paths.push(path);
        }
        paths
    }
}

/// Merge every existing `name` source of the cascade over `seed`.
///
/// Missing files are skipped silently; malformed lines are logged and skipped.
pub fn load(name: &str, seed: ConfigMap, cascade: &Cascade) -> ConfigMap {
    let mut map = seed;
    for path in cascade.paths(name) {
        if !path.is_file() {
            continue;
        }
        tracing::debug!(path = %path.display(), "merging configuration");
        for problem in merge_file(&path, &mut map, cascade.home.as_deref()) {
            tracing::warn!("{problem}");
        }
    }
    map
}

/// Merge one file (and its includes) into `map`, returning the problems met.
pub fn merge_file(path: &Path, map: &mut ConfigMap, home: Option<&Path>) -> Vec<ConfigError> {
    let mut merger = Merger {
        home,
        stack: Vec::new(),
        problems: Vec::new(),
    };
    merger.merge_file(path, map);
    merger.problems
}

/// Merge configuration text as if read from `origin`.
pub fn merge_str(
    text: &str,
    origin: &Path,
    map: &mut ConfigMap,
    home: Option<&Path>,
) -> Vec<ConfigError> {
    let mut merger = Merger {
        home,
        stack: vec![identity(origin)],
        problems: Vec::new(),
    };
    merger.merge_text(text, origin, map);
    merger.problems
}

struct Merger<'a> {
    home: Option<&'a Path>,
    /// Files currently being merged, to detect include cycles
    stack: Vec<PathBuf>,
    problems: Vec<ConfigError>,
}

impl Merger<'_> {
    fn merge_file(&mut self, path: &Path, map: &mut ConfigMap) {
        let id = identity(path);
        if self.stack.contains(&id) {
            self.problems.push(ConfigError::IncludeCycle {
                path: path.to_path_buf(),
            });
            return;
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                self.problems.push(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                });
                return;
            }
        };
        self.stack.push(id);
        self.merge_text(&text, path, map);
        self.stack.pop();
    }

    fn merge_text(&mut self, text: &str, origin: &Path, map: &mut ConfigMap) {
        for (i, raw) in text.lines().enumerate() {
            match parse_line(raw) {
                ParsedLine::Blank => {}
                ParsedLine::Include(target) => {
                    let target = self.resolve_include(target, origin);
                    self.merge_file(&target, map);
                }
                ParsedLine::Entry(key, value) => {
                    if key.contains("color") {
                        map.insert(key, normalize_color(value));
                    } else {
                        map.insert(key, value);
                    }
                }
                ParsedLine::Malformed => self.problems.push(ConfigError::Malformed {
                    path: origin.to_path_buf(),
                    line: i + 1,
                    text: raw.trim().to_string(),
                }),
            }
        }
    }

    fn resolve_include(&self, target: &str, origin: &Path) -> PathBuf {
        if let (Some(rest), Some(home)) = (target.strip_prefix("~/"), self.home) {
            return home.join(rest);
        }
        let target = Path::new(target);
        if target.is_absolute() {
            return target.to_path_buf();
        }
        match origin.parent() {
            Some(dir) => dir.join(target),
            None => target.to_path_buf(),
        }
    }
}

fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Debug, PartialEq, Eq)]
enum ParsedLine<'a> {
    Blank,
    Include(&'a str),
    Entry(&'a str, &'a str),
    Malformed,
}

fn parse_line(raw: &str) -> ParsedLine<'_> {
    let line = strip_comment(raw).trim();
    if line.is_empty() {
        return ParsedLine::Blank;
    }
    if let Some(rest) = line.strip_prefix("include") {
        if rest.starts_with(char::is_whitespace) && !rest.trim().is_empty() {
            return ParsedLine::Include(rest.trim());
        }
    }
    match line.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                ParsedLine::Malformed
            } else {
                ParsedLine::Entry(key, value.trim())
            }
        }
        None => ParsedLine::Malformed,
    }
}

/// Cut a trailing `# comment`. A `#` opens a comment at line start or after
/// whitespace, unless it starts a hex color literal like `#4E9A06`.
fn strip_comment(raw: &str) -> &str {
    let mut prev_ws = true;
    for (i, c) in raw.char_indices() {
        if c == '#' && prev_ws {
            let word = raw[i + 1..].split_whitespace().next().unwrap_or("");
            let glued = raw[i + 1..].starts_with(|c: char| !c.is_whitespace());
            if !(glued && is_hex_literal(word)) {
                return &raw[..i];
            }
        }
        prev_ws = c.is_whitespace();
    }
    raw
}
