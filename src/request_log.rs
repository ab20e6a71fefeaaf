use crate::io_struct::{ChatReqInput, Reference, ReferencePayload, Turn};
use clap::ValueEnum;

/// Console presentation mode for inbound chat requests.
///
/// Chosen once at process start and carried by value in the relay state;
/// purely cosmetic, no bearing on what is forwarded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogMode {
    /// No per-request output.
    Off,
    /// One summary line per request.
    Compact,
    /// Summary line plus every turn and reference.
    Full,
    /// The parsed request as a single JSON line.
    Json,
}

pub fn log_request(mode: LogMode, req: &ChatReqInput) {
    match mode {
        LogMode::Off => {}
        LogMode::Compact => log::info!("{}", summary_line(req)),
        LogMode::Full => {
            log::info!("{}", summary_line(req));
            for turn in &req.messages {
                for line in turn_lines(turn) {
                    log::info!("{}", line);
                }
            }
        }
        LogMode::Json => match serde_json::to_string(req) {
            Ok(line) => log::info!("{}", line),
            Err(e) => log::warn!("could not render request as json: {}", e),
        },
    }
}

fn summary_line(req: &ChatReqInput) -> String {
    let mut line = format!("chat request: {} turn(s)", req.messages.len());
    if let Some(temperature) = req.temperature {
        line.push_str(&format!(", temperature={}", temperature));
    }
    if let Some(top_p) = req.top_p {
        line.push_str(&format!(", top_p={}", top_p));
    }
    if let Some(max_tokens) = req.max_tokens {
        line.push_str(&format!(", max_tokens={}", max_tokens));
    }
    if let Some(thread) = &req.copilot_thread_id {
        line.push_str(&format!(", thread={}", thread));
    }
    if let Some(agent) = &req.agent {
        line.push_str(&format!(", agent={}", agent));
    }
    line
}

fn turn_lines(turn: &Turn) -> Vec<String> {
    let mut lines = vec![format!("  [{}] {}", turn.role, preview(&turn.content))];
    if let Some(references) = &turn.copilot_references {
        for reference in references {
            lines.push(format!("    ref: {}", render_reference(reference)));
        }
    }
    lines
}

fn render_reference(reference: &Reference) -> String {
    let implicit = if reference.is_implicit { " (implicit)" } else { "" };
    match &reference.payload {
        ReferencePayload::Repository(repo) => match &repo.owner_login {
            Some(owner) => format!("repository {}/{}{}", owner, repo.name, implicit),
            None => format!("repository {}{}", repo.name, implicit),
        },
        ReferencePayload::File(file) => match &file.language {
            Some(language) => format!("file {} [{}]{}", file.filename, language, implicit),
            None => format!("file {}{}", file.filename, implicit),
        },
        ReferencePayload::Selection(selection) => {
            let location = match (&selection.filename, selection.start_line, selection.end_line) {
                (Some(name), Some(start), Some(end)) => format!("{}:{}-{}", name, start, end),
                (Some(name), _, _) => name.clone(),
                (None, _, _) => "<buffer>".to_string(),
            };
            format!(
                "selection {} ({} chars){}",
                location,
                selection.content.len(),
                implicit
            )
        }
    }
}

fn preview(content: &str) -> String {
    const MAX_CHARS: usize = 120;
    if content.chars().count() <= MAX_CHARS {
        content.to_string()
    } else {
        let cut: String = content.chars().take(MAX_CHARS).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_struct::{FileRef, RepositoryRef, SelectionRef};

    fn reference(payload: ReferencePayload) -> Reference {
        Reference {
            id: "r-1".to_string(),
            is_implicit: false,
            payload,
        }
    }

    #[test]
    fn mode_names_parse() {
        for (name, mode) in [
            ("off", LogMode::Off),
            ("compact", LogMode::Compact),
            ("full", LogMode::Full),
            ("json", LogMode::Json),
        ] {
            assert_eq!(LogMode::from_str(name, false).unwrap(), mode);
        }
        assert!(LogMode::from_str("fancy", false).is_err());
    }

    #[test]
    fn renders_every_reference_variant() {
        let repo = reference(ReferencePayload::Repository(RepositoryRef {
            name: "widget".to_string(),
            owner_login: Some("octocat".to_string()),
            description: None,
        }));
        assert_eq!(render_reference(&repo), "repository octocat/widget");

        let file = reference(ReferencePayload::File(FileRef {
            filename: "src/lib.rs".to_string(),
            language: Some("rust".to_string()),
            content: None,
        }));
        assert_eq!(render_reference(&file), "file src/lib.rs [rust]");

        let mut selection = reference(ReferencePayload::Selection(SelectionRef {
            filename: Some("src/lib.rs".to_string()),
            content: "fn main() {}".to_string(),
            start_line: Some(3),
            end_line: Some(5),
        }));
        selection.is_implicit = true;
        assert_eq!(
            render_reference(&selection),
            "selection src/lib.rs:3-5 (12 chars) (implicit)"
        );
    }

    #[test]
    fn long_content_is_truncated_in_previews() {
        let long = "x".repeat(500);
        let line = preview(&long);
        assert!(line.ends_with("..."));
        assert_eq!(line.chars().count(), 123);
    }
}
