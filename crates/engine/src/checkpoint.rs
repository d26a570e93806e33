//! Checkpoint output

use contracts::TargetError;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Write the checkpoint as one JSON line and flush
///
/// Nothing is written when there is no checkpoint. Returns whether a line was written.
pub async fn emit_checkpoint<W>(writer: &mut W, checkpoint: Option<&Value>) -> Result<bool, TargetError>
where
    W: AsyncWrite + Unpin,
{
    let Some(value) = checkpoint else {
        debug!("No checkpoint to emit");
        return Ok(false);
    };

    let mut line = serde_json::to_vec(value)
        .map_err(|e| TargetError::Io(std::io::Error::other(e)))?;
    line.push(b'\n');

    writer.write_all(&line).await?;
    writer.flush().await?;

    debug!(bytes = line.len(), "Checkpoint emitted");
    Ok(true)
}
