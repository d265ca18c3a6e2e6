//! Indentation-aware line writer.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    level: usize,
    /// A blank line was requested and not yet written.
    pending_blank: bool,
}

impl SourceWriter {
    pub fn new() -> Self { Self::default() }

    pub fn line(&mut self, text: impl AsRef<str>) {
        self.flush_blank();
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Request a separating blank line. Consecutive requests collapse and a
    /// request right before a closing brace is dropped.
    pub fn blank(&mut self) {
        if !self.out.is_empty() {
            self.pending_blank = true;
        }
    }

    /// Run `f` one level deeper. The level is restored when `f` returns.
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.level += 1;
        let result = f(self);
        self.level -= 1;
        result
    }

    /// `header`, then `{`, the indented body and `}` on their own lines.
    pub fn block<R>(&mut self, header: impl AsRef<str>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.line(header);
        self.line("{");
        let result = self.indented(f);
        self.pending_blank = false;
        self.line("}");
        result
    }

    fn flush_blank(&mut self) {
        if std::mem::take(&mut self.pending_blank) {
            self.out.push('\n');
        }
    }

    pub fn into_string(self) -> String { self.out }
}
