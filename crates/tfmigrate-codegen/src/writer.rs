//! Indenting line writer for Go source.
//!
//! Consecutive single-line `key: value,` entries are aligned the way gofmt
//! aligns them; a multi-line entry or any other line ends the run.

pub(crate) struct GoWriter {
    output: String,
    indent: usize,
    pending: Vec<(String, String)>,
}

impl GoWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            pending: Vec::new(),
        }
    }

    /// Append text verbatim at the current position.
    pub fn raw(&mut self, text: &str) {
        self.flush();
        self.output.push_str(text);
    }

    /// One indented line. An empty line carries no indentation.
    pub fn line(&mut self, text: &str) {
        self.flush();
        if !text.is_empty() {
            self.write_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    /// A line ending in an opening brace; indents what follows.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedent, then write the closing line.
    pub fn close(&mut self, text: &str) {
        self.flush();
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Queue a single-line `key: value,` entry for alignment.
    pub fn field(&mut self, key: &str, value: &str) {
        self.pending.push((format!("{key}:"), value.to_string()));
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.output
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let width = pending
            .iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0);
        for (key, value) in pending {
            self.write_indent();
            let pad = width - key.chars().count();
            self.output.push_str(&key);
            self.output.extend(std::iter::repeat_n(' ', pad + 1));
            self.output.push_str(&value);
            self.output.push_str(",\n");
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }
}
