//! Recognizes `/merge` and `/merge cancel` command lines

use regex::Regex;
use std::sync::OnceLock;

/// A merge-gate command found in a comment or review body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `/merge` (optionally `/merge no-issue`): add the gate label
    Grant,
    /// `/merge cancel`: remove the gate label
    Revoke,
}

impl Directive {
    /// Find a directive in a (possibly multi-line) body
    ///
    /// The command must be a whole line on its own; case is ignored and
    /// trailing whitespace is allowed. A body holding both commands is a grant.
    pub fn parse(body: &str) -> Option<Directive> {
        static GRANT_REGEX: OnceLock<Regex> = OnceLock::new();
        static REVOKE_REGEX: OnceLock<Regex> = OnceLock::new();

        let grant = GRANT_REGEX
            .get_or_init(|| Regex::new(r"(?mi)^/merge(?: no-issue)?\s*$").unwrap());
        let revoke =
            REVOKE_REGEX.get_or_init(|| Regex::new(r"(?mi)^/merge cancel\s*$").unwrap());

        let body = body.replace("\r\n", "\n");
        if grant.is_match(&body) {
            Some(Directive::Grant)
        } else if revoke.is_match(&body) {
            Some(Directive::Revoke)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grant_variations() {
        for body in [
            "/merge",
            "/MERGE",
            "/Merge  ",
            "/merge\t",
            "/merge\r\n",
            "/merge no-issue",
            "/merge No-Issue \r\n",
            "LGTM, thanks!\n/merge\nsee you",
            "first line\r\n/merge\r\nlast line",
        ] {
            assert_eq!(Directive::parse(body), Some(Directive::Grant), "{body:?}");
        }
    }

    #[test]
    fn test_revoke_variations() {
        for body in [
            "/merge cancel",
            "/MERGE CANCEL",
            "/merge cancel   \r\n",
            "oops, wrong PR\r\n/merge cancel\r\n",
        ] {
            assert_eq!(Directive::parse(body), Some(Directive::Revoke), "{body:?}");
        }
    }

    #[test]
    fn test_no_match() {
        for body in [
            "",
            "merge",
            " /merge",
            "please /merge",
            "/merged",
            "/merge now",
            "/merge cancelled",
            "/merge  cancel",
            "/mergecancel",
            "`/merge`",
            "/lgtm",
        ] {
            assert_eq!(Directive::parse(body), None, "{body:?}");
        }
    }

    #[test]
    fn test_grant_wins_over_revoke() {
        assert_eq!(
            Directive::parse("/merge cancel\n/merge"),
            Some(Directive::Grant)
        );
    }

    /// A command line with random letter case
    fn command(text: &'static str) -> impl Strategy<Value = String> {
        prop::collection::vec(any::<bool>(), text.len()).prop_map(move |upper| {
            text.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    /// Text lines that never start with a slash
    fn filler() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-zA-Z0-9][a-zA-Z0-9 ,.!/]{0,30}", 0..4)
    }

    fn body(
        before: Vec<String>,
        line: String,
        after: Vec<String>,
        newline: &str,
    ) -> String {
        before
            .into_iter()
            .chain(std::iter::once(line))
            .chain(after)
            .collect::<Vec<_>>()
            .join(newline)
    }

    proptest! {
        #[test]
        fn prop_grant_line_is_recognized(
            cmd in prop_oneof![command("/merge"), command("/merge no-issue")],
            trailing in "[ \t]{0,4}",
            crlf in any::<bool>(),
            before in filler(),
            after in filler(),
        ) {
            let newline = if crlf { "\r\n" } else { "\n" };
            let text = body(before, format!("{cmd}{trailing}"), after, newline);
            prop_assert_eq!(Directive::parse(&text), Some(Directive::Grant));
        }

        #[test]
        fn prop_revoke_line_is_recognized(
            cmd in command("/merge cancel"),
            trailing in "[ \t]{0,4}",
            crlf in any::<bool>(),
            before in filler(),
            after in filler(),
        ) {
            let newline = if crlf { "\r\n" } else { "\n" };
            let text = body(before, format!("{cmd}{trailing}"), after, newline);
            prop_assert_eq!(Directive::parse(&text), Some(Directive::Revoke));
        }

        #[test]
        fn prop_command_inside_a_line_is_ignored(
            cmd in prop_oneof![command("/merge"), command("/merge cancel")],
            prefix in "[a-z]{1,8} ",
            before in filler(),
        ) {
            let text = body(before, format!("{prefix}{cmd}"), Vec::new(), "\n");
            prop_assert_eq!(Directive::parse(&text), None);
        }
    }
}
