//! Line-delimited JSON-RPC over stdio

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use track_reward_core::RewardEvaluator;
use tracing::{debug, info, warn};

use crate::RewardServer;
use crate::error::{Result, ServerError};
use crate::methods::handle_request;
use crate::protocol::{INVALID_REQUEST, PARSE_ERROR, Request, Response};

/// Run the server on the process's stdin and stdout
pub async fn run(server: RewardServer) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    info!(
        "track-reward server starting on stdio ({})",
        server.evaluator.variant()
    );
    serve(&server.evaluator, reader, writer).await
}

/// Serve requests from `reader` until EOF, one response line per request.
///
/// Blank lines are skipped. Every other line gets exactly one reply, with a
/// `null` id when the line is not JSON or not a request object. Only I/O
/// failures end the loop.
pub async fn serve<R, W>(evaluator: &RewardEvaluator, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut handled: u64 = 0;

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(ServerError::Read)?;

        if bytes_read == 0 {
            info!("Client disconnected (EOF) after {} requests", handled);
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = respond(evaluator, trimmed);
        let response_json = serde_json::to_string(&response)?;
        debug!("Sending: {}", response_json);

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(ServerError::Write)?;
        writer.write_all(b"\n").await.map_err(ServerError::Write)?;
        writer.flush().await.map_err(ServerError::Write)?;
        handled += 1;
    }

    Ok(())
}

fn respond(evaluator: &RewardEvaluator, line: &str) -> Response {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!("Unparseable line: {}", e);
            return Response::unidentified_error(PARSE_ERROR, format!("Parse error: {}", e));
        }
    };

    match serde_json::from_value::<Request>(value) {
        Ok(request) => handle_request(evaluator, &request),
        Err(e) => {
            warn!("Malformed request: {}", e);
            Response::unidentified_error(INVALID_REQUEST, format!("Invalid request: {}", e))
        }
    }
}
