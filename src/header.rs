/// Cookie-header string codec and submit planning
///
/// The single exchange format between the UI and the gateway is a
/// cookie-header string: `name1=value1; name2=value2; ...`.

use crate::cookies::Cookie;

/// Format cookies for display, `name=value` entries joined by `"; "`.
pub fn format_cookie_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|cookie| format!("{}={}", cookie.name, cookie.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a user-edited cookie-header string into name/value pairs.
///
/// Naive splitting by design: segments are separated by `;` with
/// surrounding whitespace allowed, each segment splits once on `=`, and
/// a segment with no `=` becomes a pair with an empty value. Empty
/// segments are dropped, so the empty string parses to no pairs.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}

/// What one press of the submit button will do, decided before any host
/// call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPlan {
    /// Remove every existing cookie before applying the pairs.
    pub clear_existing: bool,
    pub pairs: Vec<(String, String)>,
}

/// One host operation of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    ClearAll,
    Set { name: String, value: String },
}

impl SubmitPlan {
    /// The host operations this plan performs, in execution order: the
    /// clear, when requested, strictly precedes every set; without the
    /// clear flag no remove operation appears at all.
    pub fn operations(&self) -> Vec<Op> {
        let mut ops = Vec::with_capacity(self.pairs.len() + 1);
        if self.clear_existing {
            ops.push(Op::ClearAll);
        }
        ops.extend(
            self.pairs
                .iter()
                .cloned()
                .map(|(name, value)| Op::Set { name, value }),
        );
        ops
    }
}

pub fn plan_submit(clear_existing: bool, draft: &str) -> SubmitPlan {
    SubmitPlan {
        clear_existing,
        pairs: parse_cookie_header(draft),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, value: &str) -> Cookie {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_cookie_header(&[]), "");
    }

    #[test]
    fn test_format_joins_with_semicolon_space() {
        let cookies = vec![cookie("foo", "bar"), cookie("bat", "baz")];
        assert_eq!(format_cookie_header(&cookies), "foo=bar; bat=baz");
    }

    #[test]
    fn test_parse_example_header() {
        let pairs = parse_cookie_header("foo=bar; bat=baz; oof=rab");
        assert_eq!(
            pairs,
            vec![
                ("foo".to_string(), "bar".to_string()),
                ("bat".to_string(), "baz".to_string()),
                ("oof".to_string(), "rab".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_segment_without_equals() {
        assert_eq!(
            parse_cookie_header("standalone"),
            vec![("standalone".to_string(), String::new())]
        );
    }

    #[test]
    fn test_parse_empty_string_yields_no_pairs() {
        assert!(parse_cookie_header("").is_empty());
        assert!(parse_cookie_header("  ;  ; ").is_empty());
    }

    #[test]
    fn test_parse_tolerates_irregular_whitespace() {
        let pairs = parse_cookie_header("foo=bar;bat=baz ;  oof=rab");
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1], ("bat".to_string(), "baz".to_string()));
    }

    #[test]
    fn test_parse_splits_once_on_equals() {
        // Values may themselves contain '='
        assert_eq!(
            parse_cookie_header("token=a=b=c"),
            vec![("token".to_string(), "a=b=c".to_string())]
        );
    }

    #[test]
    fn test_round_trip() {
        let cookies = vec![cookie("sid", "abc123"), cookie("theme", "dark"), cookie("flag", "")];
        let header = format_cookie_header(&cookies);
        let pairs = parse_cookie_header(&header);
        let expected: Vec<(String, String)> = cookies
            .iter()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_plan_submit_keeps_clear_flag() {
        let plan = plan_submit(true, "foo=bar");
        assert!(plan.clear_existing);
        assert_eq!(plan.pairs, vec![("foo".to_string(), "bar".to_string())]);

        let plan = plan_submit(false, "foo=bar");
        assert!(!plan.clear_existing);
    }

    #[test]
    fn test_operations_clear_strictly_precedes_sets() {
        let ops = plan_submit(true, "foo=bar; bat=baz; oof=rab").operations();
        assert_eq!(ops[0], Op::ClearAll);
        assert!(ops[1..].iter().all(|op| matches!(op, Op::Set { .. })));
        assert_eq!(ops.len(), 4);
    }

    #[test]
    fn test_operations_without_clear_flag_never_remove() {
        let ops = plan_submit(false, "foo=bar; bat=baz").operations();
        assert!(!ops.contains(&Op::ClearAll));
        assert_eq!(
            ops,
            vec![
                Op::Set {
                    name: "foo".to_string(),
                    value: "bar".to_string(),
                },
                Op::Set {
                    name: "bat".to_string(),
                    value: "baz".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_operations_clear_only_submission() {
        // Clearing with an empty draft is a valid way to wipe the jar
        assert_eq!(plan_submit(true, "").operations(), vec![Op::ClearAll]);
        assert!(plan_submit(false, "").operations().is_empty());
    }
}
