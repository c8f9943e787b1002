use crate::error::Result;
use crate::types::RunReport;
use std::path::Path;

/// Write one `country,url` row per harvested URL.
pub fn write_report_csv(report: &RunReport, path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["Country", "URL"])?;

    for entry in report.entries() {
        let code = &entry.harvest.country().code;
        for url in entry.harvest.urls() {
            wtr.write_record([code.as_str(), url.as_str()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Country, HarvestResult};

    #[test]
    fn test_write_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut report = RunReport::new();
        report.record(
            HarvestResult::new(
                Country {
                    code: "IT".into(),
                    name: "Italy".into(),
                },
                vec!["https://a/1.jpg".into(), "https://a/2.jpg".into()],
                false,
            ),
            None,
        );
        write_report_csv(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Country,URL\nIT,https://a/1.jpg\nIT,https://a/2.jpg\n"
        );
    }
}
