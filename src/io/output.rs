use crate::aggregation::{AveragedMetrics, ConfusionMatrix};
use crate::benchmark::BenchmarkReport;
use crate::formatting::{score_band, OutputFormatter, PlainFormatter};
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Rendering knobs shared by the table writers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub decimals: usize,
    pub per_instance: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decimals: 4,
            per_instance: false,
        }
    }
}

impl RenderOptions {
    fn fixed(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    fn ace(&self, metrics: &AveragedMetrics) -> Option<String> {
        metrics.ace.map(|ace| self.fixed(ace))
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &BenchmarkReport) -> anyhow::Result<()>;
    fn write_confusion(&mut self, matrix: &ConfusionMatrix) -> anyhow::Result<()>;
    /// Push buffered output to the sink. Must be called before the writer is
    /// dropped, or write failures go unreported.
    fn flush(&mut self) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_value<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &BenchmarkReport) -> anyhow::Result<()> {
        self.write_value(report)
    }

    fn write_confusion(&mut self, matrix: &ConfusionMatrix) -> anyhow::Result<()> {
        self.write_value(matrix)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
    options: RenderOptions,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self { writer, options }
    }

    fn write_row(&mut self, cells: &[String]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    fn write_header_row(&mut self, cells: &[&str]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        let rule: Vec<&str> = cells.iter().map(|_| "---").collect();
        writeln!(self.writer, "| {} |", rule.join(" | "))?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &BenchmarkReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Cluster Evaluation Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Strategy: `{}`", report.strategy)?;
        writeln!(self.writer)?;

        let with_ace = report.overall.ace.is_some() && report.overall.count > 0;
        writeln!(self.writer, "## Averages")?;
        writeln!(self.writer)?;
        let mut header = vec!["Group", "Instances", "Precision", "Recall", "F1-score"];
        if with_ace {
            header.push("ACE");
        }
        self.write_header_row(&header)?;

        let opts = self.options;
        let rows: Vec<(String, AveragedMetrics)> = report
            .groups
            .iter()
            .map(|(group, m)| (group.clone(), *m))
            .chain(std::iter::once(("**overall**".to_string(), report.overall)))
            .collect();
        for (group, m) in rows {
            let mut cells = vec![
                group,
                m.count.to_string(),
                opts.fixed(m.precision),
                opts.fixed(m.recall),
                opts.fixed(m.f1),
            ];
            if with_ace {
                cells.push(opts.ace(&m).unwrap_or_else(|| "-".into()));
            }
            self.write_row(&cells)?;
        }

        if opts.per_instance && !report.instances.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "## Instances")?;
            writeln!(self.writer)?;
            self.write_header_row(&["Instance", "Group", "Precision", "Recall", "F1-score"])?;
            for result in &report.instances {
                self.write_row(&[
                    result.name.clone(),
                    result.group.clone(),
                    opts.fixed(result.metrics.precision),
                    opts.fixed(result.metrics.recall),
                    opts.fixed(result.metrics.f1),
                ])?;
            }
        }
        Ok(())
    }

    fn write_confusion(&mut self, matrix: &ConfusionMatrix) -> anyhow::Result<()> {
        writeln!(self.writer, "# Label Confusion")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Rows are ground truth, columns are predictions.")?;
        writeln!(self.writer)?;

        let columns: Vec<&str> = matrix.predicted_labels().into_iter().collect();
        let mut header = vec![""];
        header.extend(&columns);
        self.write_header_row(&header)?;

        for (truth, _) in matrix.rows() {
            let mut cells = vec![format!("**{truth}**")];
            cells.extend(columns.iter().map(|guess| matrix.get(truth, guess).to_string()));
            self.write_row(&cells)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    options: RenderOptions,
    formatter: Box<dyn OutputFormatter>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self::with_formatter(writer, options, Box::new(PlainFormatter))
    }

    pub fn with_formatter(
        writer: W,
        options: RenderOptions,
        formatter: Box<dyn OutputFormatter>,
    ) -> Self {
        Self {
            writer,
            options,
            formatter,
        }
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn numeric(text: String) -> Cell {
        Cell::new(text).set_alignment(CellAlignment::Right)
    }

    fn averages_table(&self, report: &BenchmarkReport) -> Table {
        let opts = self.options;
        let with_ace = report.overall.ace.is_some() && report.overall.count > 0;

        let mut table = Self::new_table();
        let mut header = vec!["Group", "Instances", "Precision", "Recall", "F1-score"];
        if with_ace {
            header.push("ACE");
        }
        table.set_header(header);

        let rows = report
            .groups
            .iter()
            .map(|(group, m)| (group.as_str(), m))
            .chain(std::iter::once(("overall", &report.overall)));
        for (group, m) in rows {
            let mut cells = vec![
                Cell::new(group),
                Self::numeric(m.count.to_string()),
                Self::numeric(opts.fixed(m.precision)),
                Self::numeric(opts.fixed(m.recall)),
                Self::numeric(opts.fixed(m.f1)),
            ];
            if with_ace {
                cells.push(Self::numeric(opts.ace(m).unwrap_or_else(|| "-".into())));
            }
            table.add_row(cells);
        }
        table
    }

    fn instances_table(&self, report: &BenchmarkReport) -> Table {
        let opts = self.options;
        let mut table = Self::new_table();
        table.set_header(vec!["Instance", "Group", "Precision", "Recall", "F1-score", "Dropped"]);
        for result in &report.instances {
            table.add_row(vec![
                Cell::new(&result.name),
                Cell::new(&result.group),
                Self::numeric(opts.fixed(result.metrics.precision)),
                Self::numeric(opts.fixed(result.metrics.recall)),
                Self::numeric(opts.fixed(result.metrics.f1)),
                Self::numeric(result.rejected.to_string()),
            ]);
        }
        table
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &BenchmarkReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{}",
            self.formatter.header("Cluster Evaluation Report")
        )?;
        writeln!(
            self.writer,
            "{}",
            self.formatter
                .dim(&format!("strategy: {}", report.strategy))
        )?;
        writeln!(self.writer)?;

        if self.options.per_instance && !report.instances.is_empty() {
            writeln!(self.writer, "{}", self.instances_table(report))?;
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "{}", self.averages_table(report))?;

        let f1 = self.options.fixed(report.overall.f1);
        writeln!(
            self.writer,
            "Overall F1: {}",
            score_band(self.formatter.as_ref(), report.overall.f1, &f1)
        )?;
        Ok(())
    }

    fn write_confusion(&mut self, matrix: &ConfusionMatrix) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.formatter.header("Label Confusion"))?;
        writeln!(
            self.writer,
            "{}",
            self.formatter
                .dim("rows: ground truth, columns: predicted")
        )?;
        writeln!(self.writer)?;

        if matrix.is_empty() {
            writeln!(self.writer, "No overlapping clusters.")?;
            return Ok(());
        }

        let columns: Vec<&str> = matrix.predicted_labels().into_iter().collect();
        let mut table = Self::new_table();
        let mut header = vec![Cell::new("")];
        header.extend(columns.iter().map(Cell::new));
        table.set_header(header);

        for (truth, _) in matrix.rows() {
            let mut cells = vec![Cell::new(truth)];
            cells.extend(
                columns
                    .iter()
                    .map(|guess| Self::numeric(matrix.get(truth, guess).to_string())),
            );
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;

        let total = matrix.total();
        let agreeing = matrix.diagonal_total();
        writeln!(
            self.writer,
            "Label agreement: {agreeing}/{total} overlapping members"
        )?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    options: RenderOptions,
    formatter: Box<dyn OutputFormatter>,
    sink: Box<dyn Write + 'a>,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink, options)),
        OutputFormat::Terminal => Box::new(TerminalWriter::with_formatter(sink, options, formatter)),
    }
}
