use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Punch-row labels marked in one column, top to bottom.
pub type PunchPattern = Vec<u8>;

/// Errors raised while loading definitions or resolving columns.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no definition for punch pattern {}", PatternDisplay(.0))]
    DefinitionNotFound(PunchPattern),

    #[error("definition line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("cannot read definition file: {0}")]
    Io(#[from] std::io::Error),
}

struct PatternDisplay<'a>(&'a [u8]);

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{row}")?;
        }
        write!(f, ")")
    }
}

/// One line of a definition file: the punch rows, top to bottom, and the
/// text they stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub pattern: PunchPattern,
    pub text: String,
}

/// Character lookup keyed by pattern length.
///
/// Within one length, entries keep file order and the first exact match wins.
/// Patterns compare position by position, so `12,1` and `1,12` are different
/// entries.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    by_len: HashMap<usize, Vec<Definition>>,
}

impl DefinitionTable {
    /// Parses tab-separated definitions: `rows\ttext` per line, where `rows`
    /// is a single label or a comma-separated list. Blank lines are skipped.
    pub fn parse(source: &str) -> Result<Self, DecodeError> {
        let mut table = Self::default();
        for (i, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            table.push(parse_line(line, i + 1)?);
        }
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn push(&mut self, definition: Definition) {
        self.by_len
            .entry(definition.pattern.len())
            .or_default()
            .push(definition);
    }

    /// Number of definitions across all lengths.
    pub fn len(&self) -> usize {
        self.by_len.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_len.is_empty()
    }

    /// Text for one column. Blank columns read as a space.
    pub fn resolve(&self, pattern: &[u8]) -> Result<&str, DecodeError> {
        if pattern.is_empty() {
            return Ok(" ");
        }
        self.by_len
            .get(&pattern.len())
            .and_then(|bucket| bucket.iter().find(|d| d.pattern == pattern))
            .map(|d| d.text.as_str())
            .ok_or_else(|| DecodeError::DefinitionNotFound(pattern.to_vec()))
    }

    /// Concatenates the text of every column, failing on the first unknown
    /// pattern.
    pub fn decode_patterns(&self, patterns: &[PunchPattern]) -> Result<String, DecodeError> {
        patterns
            .iter()
            .map(|p| self.resolve(p))
            .collect::<Result<String, _>>()
    }

    /// First pattern whose text is `text`, searching shorter patterns first.
    pub fn pattern_for(&self, text: &str) -> Option<&[u8]> {
        if text == " " {
            return Some(&[]);
        }
        let mut lens: Vec<usize> = self.by_len.keys().copied().collect();
        lens.sort_unstable();
        lens.into_iter()
            .flat_map(|len| &self.by_len[&len])
            .find(|d| d.text == text)
            .map(|d| d.pattern.as_slice())
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<Definition, DecodeError> {
    let parse_err = |reason: String| DecodeError::Parse {
        line: line_no,
        reason,
    };

    let mut fields = line.split('\t');
    let rows = fields.next().unwrap_or_default();
    let text = fields
        .next()
        .ok_or_else(|| parse_err("missing tab separator".to_string()))?;

    let pattern = rows
        .split(',')
        .map(|r| {
            r.trim()
                .parse::<u8>()
                .map_err(|e| parse_err(format!("bad row label {r:?}: {e}")))
        })
        .collect::<Result<PunchPattern, _>>()?;

    Ok(Definition {
        pattern,
        text: text.trim_end().to_string(),
    })
}
