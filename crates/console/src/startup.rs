use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::shell::Console;

pub const PROMPT: &str = "(hbnb) ";

/// Read commands line by line until `quit` or end of input. Errors are
/// printed and the loop keeps going.
pub async fn run<R, W>(console: &Console, reader: R, mut writer: W, prompt: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        if prompt {
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;
        }
        let Some(line) = lines.next_line().await? else {
            if prompt {
                writer.write_all(b"\n").await?;
            }
            break;
        };
        match console.execute(&line).await {
            Ok(reply) => {
                for out in &reply.lines {
                    writer.write_all(out.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
                if reply.quit {
                    break;
                }
            }
            Err(e) => {
                debug!(%line, error = %e, "command failed");
                writer.write_all(format!("{e}\n").as_bytes()).await?;
            }
        }
    }
    writer.flush().await?;
    Ok(())
}
