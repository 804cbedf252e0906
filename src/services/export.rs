use std::path::Path;

use csv_async::AsyncSerializer;
use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::core::{Report, ReportRow};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize report rows as CSV, header included
pub async fn write_rows<W>(rows: &[ReportRow], writer: W) -> Result<(), ExportError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut serializer = AsyncSerializer::from_writer(writer);
    for row in rows {
        serializer.serialize(row).await?;
    }
    serializer.flush().await?;
    Ok(())
}

/// CSV bytes of the report's main rows
pub async fn report_to_csv(report: &Report) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_rows(&report.rows, &mut buffer).await?;
    Ok(buffer)
}

/// Write the report's main rows to `path`, replacing any previous file
pub async fn write_report_file(path: &Path, report: &Report) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let file = tokio::fs::File::create(path).await?;
    write_rows(&report.rows, file).await?;

    tracing::info!("Wrote {} report rows to {}", report.rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amenities, Candidate};

    fn create_report() -> Report {
        let candidates = vec![Candidate {
            name: "Bouillon Pigalle".to_string(),
            address: Some("22 Bd de Clichy, 75018 Paris".to_string()),
            rating: 4.3,
            price_tier: 1,
            amenities: Amenities {
                vegetarian_options: true,
                ..Amenities::default()
            },
            latitude: 48.8823,
            longitude: 2.3376,
            distance_km: Some(2.9),
            score: Some(0.61),
        }];
        Report::weighted_sum(candidates, 5)
    }

    #[tokio::test]
    async fn test_report_to_csv() {
        let bytes = report_to_csv(&create_report()).await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("name,address,rating,priceTier,acceptsPets"));
        assert!(header.ends_with("distanceKm,score"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("Bouillon Pigalle,\"22 Bd de Clichy, 75018 Paris\",4.3,1,false"));
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn test_write_report_file() {
        let dir = std::env::temp_dir().join(format!("resto-rank-{}", uuid::Uuid::new_v4()));
        let path = dir.join("report.csv");

        write_report_file(&path, &create_report()).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("Bouillon Pigalle"));
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
