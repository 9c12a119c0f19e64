mod aggregate;
mod badges;
mod display;
mod ipc;
mod labels;
mod model;
mod normalize;
mod ranking;
mod trend;

use std::io::{self, BufRead, Write};

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock())
}

/// One JSON request per line in, one JSON response per line out. The whole
/// process state is the currently loaded dataset; requests are handled
/// strictly in order.
fn run(input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    let mut state = ipc::AppState { dataset: None };

    for line in input.lines() {
        let line = line.context("read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't echo an id we never parsed; report and move on.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() },
                });
                writeln!(output, "{}", resp).context("write response")?;
                output.flush().context("flush response")?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        writeln!(
            output,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        )
        .context("write response")?;
        output.flush().context("flush response")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn run_answers_each_request_line() {
        let input = Cursor::new(
            "{\"id\":\"1\",\"method\":\"health\",\"params\":{}}\n\
             not json\n\
             {\"id\":\"2\",\"method\":\"no.such.method\",\"params\":{}}\n",
        );
        let mut output = Vec::new();
        run(input, &mut output).expect("run");

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .expect("utf8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("response json"))
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[1]["error"]["code"], "bad_json");
        assert_eq!(lines[2]["error"]["code"], "not_implemented");
    }
}
