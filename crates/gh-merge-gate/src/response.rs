//! Reply comment template

const ABOUT_THIS_BOT: &str =
    "Instructions for interacting with me using PR comments are available in the repository's contributor guide.";

/// Format a reply to a triggering comment
///
/// Mentions the actor, states the reason, and quotes the triggering body with
/// a link back to it inside a collapsed details block.
pub fn format_response(body: &str, html_url: &str, actor: &str, reason: &str) -> String {
    let quoted = body
        .replace("\r\n", "\n")
        .lines()
        .map(|line| format!(">{line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "@{actor}: {reason}\n\n<details>\n\nIn response to [this]({html_url}):\n\n{quoted}\n\n{ABOUT_THIS_BOT}\n</details>"
    )
}
