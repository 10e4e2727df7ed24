//! Render - ステータス表を表示用マークアップへ変換
//!
//! # 学習ポイント
//! - 副作用のない純粋関数としてのレンダリング
//! - 出力前のエスケープ（マークアップ注入の防止）

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{StatusRecord, StatusTable};

const TABLE_OPEN: &str =
    r#"<div class="rendered_html"><table style="margin: 0; border: 1px solid black;">"#;
const TABLE_CLOSE: &str = "</table></div>";
const ROW_SEPARATOR: &str = "\n";
const LINE_BREAK: &str = "<br>";

/// Rendering variant, fixed when the view is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One row per record, one cell per field.
    #[default]
    Tabular,
    /// One label per record, joined with line breaks.
    Plain,
}

/// What a record is reduced to in plain mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlainLabel {
    #[default]
    Name,
    /// `"<status> <name>"`, or just the name when the status is empty.
    StatusName,
}

impl PlainLabel {
    fn label(self, record: &StatusRecord) -> String {
        match self {
            PlainLabel::Name => record.name().to_string(),
            PlainLabel::StatusName => match record.status().as_str() {
                "" => record.name().to_string(),
                status => format!("{status} {}", record.name()),
            },
        }
    }
}

/// One escaped table row, cells in `status, name, stats, flags` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: [String; 4],
}

impl TableRow {
    fn from_record(record: &StatusRecord) -> Self {
        Self {
            cells: record.columns().map(escape_html),
        }
    }

    pub fn cells(&self) -> &[String; 4] {
        &self.cells
    }
}

/// Display-ready result of rendering a [`StatusTable`].
///
/// Every string held here is already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    Table(Vec<TableRow>),
    Plain(Vec<String>),
}

impl RenderedOutput {
    /// Rows (tabular) or labels (plain).
    pub fn row_count(&self) -> usize {
        match self {
            RenderedOutput::Table(rows) => rows.len(),
            RenderedOutput::Plain(labels) => labels.len(),
        }
    }

    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RenderedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedOutput::Table(rows) => {
                f.write_str(TABLE_OPEN)?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(ROW_SEPARATOR)?;
                    }
                    f.write_str("<tr>")?;
                    for cell in row.cells() {
                        write!(f, "<td>{cell}</td>")?;
                    }
                    f.write_str("</tr>")?;
                }
                f.write_str(TABLE_CLOSE)
            }
            RenderedOutput::Plain(labels) => f.write_str(&labels.join(LINE_BREAK)),
        }
    }
}

/// Pure table renderer.
///
/// Same table in, byte-identical output out; no state besides the
/// configuration chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Renderer {
    mode: RenderMode,
    plain_label: PlainLabel,
}

impl Renderer {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            plain_label: PlainLabel::default(),
        }
    }

    pub fn tabular() -> Self {
        Self::new(RenderMode::Tabular)
    }

    pub fn plain() -> Self {
        Self::new(RenderMode::Plain)
    }

    pub fn with_plain_label(mut self, plain_label: PlainLabel) -> Self {
        self.plain_label = plain_label;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn render(&self, table: &StatusTable) -> RenderedOutput {
        match self.mode {
            RenderMode::Tabular => {
                RenderedOutput::Table(table.iter().map(TableRow::from_record).collect())
            }
            RenderMode::Plain => RenderedOutput::Plain(
                table
                    .iter()
                    .map(|record| escape_html(&self.plain_label.label(record)))
                    .collect(),
            ),
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn two_steps() -> StatusTable {
        StatusTable::new(vec![
            StatusRecord::new("ok", "step-1").with_stats("3/3"),
            StatusRecord::new("fail", "step-2")
                .with_stats("1/2")
                .with_flags("retry"),
        ])
    }

    #[test]
    fn tabular_rows_follow_fixed_column_order() {
        let output = Renderer::tabular().render(&two_steps());

        let RenderedOutput::Table(rows) = &output else {
            panic!("expected tabular output");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells(), &["ok", "step-1", "3/3", ""].map(String::from));
        assert_eq!(
            rows[1].cells(),
            &["fail", "step-2", "1/2", "retry"].map(String::from)
        );
    }

    #[test]
    fn tabular_markup() {
        let markup = Renderer::tabular().render(&two_steps()).to_markup();
        assert_eq!(
            markup,
            concat!(
                r#"<div class="rendered_html"><table style="margin: 0; border: 1px solid black;">"#,
                "<tr><td>ok</td><td>step-1</td><td>3/3</td><td></td></tr>\n",
                "<tr><td>fail</td><td>step-2</td><td>1/2</td><td>retry</td></tr>",
                "</table></div>",
            )
        );
    }

    #[test]
    fn plain_joins_names_with_single_line_break() {
        let output = Renderer::plain().render(&two_steps());
        assert_eq!(output.to_markup(), "step-1<br>step-2");
        assert_eq!(output.row_count(), 2);
    }

    #[test]
    fn plain_status_name_label() {
        let table = StatusTable::new(vec![
            StatusRecord::new("done", "load"),
            StatusRecord::new("", "orphan"),
        ]);
        let output = Renderer::plain()
            .with_plain_label(PlainLabel::StatusName)
            .render(&table);
        assert_eq!(output.to_markup(), "done load<br>orphan");
    }

    #[rstest]
    #[case::tabular(Renderer::tabular(), 0)]
    #[case::plain(Renderer::plain(), 0)]
    fn empty_table_renders_no_rows(#[case] renderer: Renderer, #[case] expected: usize) {
        let output = renderer.render(&StatusTable::empty());
        assert_eq!(output.row_count(), expected);
    }

    #[test]
    fn empty_table_markup_has_no_placeholder() {
        assert_eq!(
            Renderer::tabular().render(&StatusTable::empty()).to_markup(),
            format!("{TABLE_OPEN}{TABLE_CLOSE}")
        );
        assert_eq!(Renderer::plain().render(&StatusTable::empty()).to_markup(), "");
    }

    #[rstest]
    #[case::tabular(Renderer::tabular())]
    #[case::plain(Renderer::plain())]
    fn markup_in_fields_is_escaped(#[case] renderer: Renderer) {
        let table = StatusTable::new(vec![
            StatusRecord::new("<b>", "<script>alert('x')</script>")
                .with_stats("a & b")
                .with_flags("\"q\""),
        ]);

        let markup = renderer.render(&table).to_markup();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn escapes_every_tabular_cell() {
        let table = StatusTable::new(vec![
            StatusRecord::new("<b>", "n").with_stats("a & b").with_flags("\"q\""),
        ]);
        let RenderedOutput::Table(rows) = Renderer::tabular().render(&table) else {
            panic!("expected tabular output");
        };
        assert_eq!(
            rows[0].cells(),
            &["&lt;b&gt;", "n", "a &amp; b", "&quot;q&quot;"].map(String::from)
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = Renderer::tabular();
        let table = two_steps();
        let first = renderer.render(&table).to_markup();
        for _ in 0..3 {
            assert_eq!(renderer.render(&table).to_markup(), first);
        }
    }

    #[test]
    fn preserves_record_order() {
        let table: StatusTable = (0..5)
            .rev()
            .map(|i| StatusRecord::new("running", format!("node-{i}")))
            .collect();
        let RenderedOutput::Table(rows) = Renderer::tabular().render(&table) else {
            panic!("expected tabular output");
        };
        let names: Vec<&str> = rows.iter().map(|row| row.cells()[1].as_str()).collect();
        assert_eq!(names, vec!["node-4", "node-3", "node-2", "node-1", "node-0"]);
    }
}
