//! Commands typed on the simulator console.
//!
//! Each stdin line is one command:
//!
//! ```text
//! 123#4567#        press keys in order
//! d=20             object 20 cm from the rangefinder
//! d=none           nothing in range
//! door=open        open the door (door=closed to shut it)
//! host=MATCH       inject a host reply (only without a serial port)
//! status           print lock state and entry stage
//! quit             exit
//! ```
//!
//! A key line longer than the keypad buffer is rejected whole.

use doorlock_hardware::mock::KEY_BUFFER;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Keys(String),
    Distance(Option<f32>),
    Door { closed: bool },
    HostReply(String),
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

/// Parse one console line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let command = match line.split_once('=') {
        Some(("d", "none")) => Command::Distance(None),
        Some(("d", value)) => {
            let cm: f32 = value
                .parse()
                .map_err(|_| ParseError(format!("not a distance: {value:?}")))?;
            if !cm.is_finite() || cm < 0.0 {
                return Err(ParseError(format!("distance must be >= 0, got {cm}")));
            }
            Command::Distance(Some(cm))
        }
        Some(("door", "open")) => Command::Door { closed: false },
        Some(("door", "closed")) => Command::Door { closed: true },
        Some(("host", reply)) if !reply.is_empty() => Command::HostReply(reply.to_string()),
        Some((name, _)) => return Err(ParseError(format!("unknown setting {name:?}"))),
        None => match line {
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            keys if keys.len() > KEY_BUFFER => {
                return Err(ParseError(format!(
                    "at most {KEY_BUFFER} keys per line, got {}",
                    keys.len()
                )));
            }
            keys if keys.chars().all(|c| c.is_ascii_graphic()) => {
                Command::Keys(keys.to_string())
            }
            other => return Err(ParseError(format!("not a key sequence: {other:?}"))),
        },
    };

    Ok(Some(command))
}
