use anyhow::{Context, Result, bail};

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Raw inbound protocol message, delivered as-is.
    Message(String),
    /// Advance this many frames.
    Tick(u32),
    /// Pointer-drag look sample.
    Look { dx: f32, dy: f32 },
}

/// Parse a replay script.
///
/// ```text
/// # comment
/// move|forward|true
/// tick 30
/// look -120 15
/// get_time
/// ```
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("script line {}", n + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("tick") => {
            let frames = match words.next() {
                Some(w) => w.parse().with_context(|| format!("bad frame count `{w}`"))?,
                None => 1,
            };
            Ok(ScriptStep::Tick(frames))
        }
        Some("look") => {
            let (Some(dx), Some(dy), None) = (words.next(), words.next(), words.next()) else {
                bail!("`look` takes exactly two numbers");
            };
            Ok(ScriptStep::Look {
                dx: dx.parse().with_context(|| format!("bad dx `{dx}`"))?,
                dy: dy.parse().with_context(|| format!("bad dy `{dy}`"))?,
            })
        }
        _ => Ok(ScriptStep::Message(line.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_step_kinds() {
        let steps = parse_script(
            "# warm up\nmove|forward|true\n\ntick 30\ntick\nlook -120 15.5\nget_time\n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Message("move|forward|true".into()),
                ScriptStep::Tick(30),
                ScriptStep::Tick(1),
                ScriptStep::Look {
                    dx: -120.0,
                    dy: 15.5
                },
                ScriptStep::Message("get_time".into()),
            ]
        );
    }

    #[test]
    fn protocol_lines_pass_through_unchecked() {
        // Malformed protocol messages are the session's business, not the script's.
        let steps = parse_script("bogus|thing").unwrap();
        assert_eq!(steps, vec![ScriptStep::Message("bogus|thing".into())]);
    }

    #[test]
    fn bad_directives_report_the_line() {
        let err = parse_script("tick 1\ntick many\n").unwrap_err();
        assert!(format!("{err:#}").contains("script line 2"));
        assert!(parse_script("look 1").is_err());
        assert!(parse_script("look 1 2 3").is_err());
    }
}
