use crate::application::summary::Summary;
use crate::error::Result;
use std::io::Write;

/// Writes a summary as `label,value` rows.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        // the header is written by `write_summary`, ahead of the Service row
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Header, a `Service` row, then the summary rows in order.
    pub fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        self.writer.write_record(["label", "value"])?;
        self.writer.write_record(["Service", summary.title.as_str()])?;
        for row in &summary.rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
