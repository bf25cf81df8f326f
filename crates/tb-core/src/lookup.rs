//! Name resolution for commands and sheets.
//!
//! A user-supplied name resolves to an exact match if there is one, and
//! otherwise to the single candidate it is a prefix of.

use thiserror::Error;

/// Failure to resolve a name to exactly one candidate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No candidate starts with the name.
    #[error("no such {kind} \"{name}\"")]
    NoMatch { kind: &'static str, name: String },

    /// Several candidates start with the name.
    #[error("ambiguous {kind} \"{name}\":\n    {}", .candidates.join(" "))]
    AmbiguousLookup {
        kind: &'static str,
        name: String,
        /// Matching candidate names, sorted.
        candidates: Vec<String>,
    },
}

/// Resolves `name` against `(canonical name, value)` pairs.
///
/// `kind` names what is being looked up ("command", "timesheet") for error
/// messages.
pub fn complete<'a, T, I>(candidates: I, name: &str, kind: &'static str) -> Result<T, LookupError>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut matches: Vec<(&str, T)> = Vec::new();
    for (candidate, value) in candidates {
        if candidate == name {
            return Ok(value);
        }
        if candidate.starts_with(name) {
            matches.push((candidate, value));
        }
    }

    if matches.len() > 1 {
        let mut names: Vec<String> = matches.iter().map(|(n, _)| (*n).to_string()).collect();
        names.sort();
        return Err(LookupError::AmbiguousLookup {
            kind,
            name: name.to_string(),
            candidates: names,
        });
    }

    matches
        .pop()
        .map(|(_, value)| value)
        .ok_or_else(|| LookupError::NoMatch {
            kind,
            name: name.to_string(),
        })
}

/// Resolves `name` against a plain list of names, returning the canonical one.
pub fn complete_name<S: AsRef<str>>(
    names: &[S],
    name: &str,
    kind: &'static str,
) -> Result<String, LookupError> {
    complete(
        names.iter().map(|n| (n.as_ref(), n.as_ref())),
        name,
        kind,
    )
    .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: [(&str, u8); 5] = [
        ("in", 1),
        ("info", 2),
        ("start", 1),
        ("stop", 3),
        ("switch", 4),
    ];

    #[test]
    fn exact_match_wins_over_longer_prefixes() {
        assert_eq!(complete(COMMANDS, "in", "command"), Ok(1));
    }

    #[test]
    fn unique_prefix_resolves() {
        assert_eq!(complete(COMMANDS, "sw", "command"), Ok(4));
        assert_eq!(complete(COMMANDS, "inf", "command"), Ok(2));
    }

    #[test]
    fn shared_prefix_is_ambiguous_with_sorted_candidates() {
        let err = complete(COMMANDS, "st", "command").unwrap_err();
        assert_eq!(
            err,
            LookupError::AmbiguousLookup {
                kind: "command",
                name: "st".to_string(),
                candidates: vec!["start".to_string(), "stop".to_string()],
            }
        );
        assert_eq!(err.to_string(), "ambiguous command \"st\":\n    start stop");
    }

    #[test]
    fn unknown_name_is_no_match() {
        let err = complete(COMMANDS, "zz", "command").unwrap_err();
        assert_eq!(err.to_string(), "no such command \"zz\"");
    }

    #[test]
    fn complete_name_returns_canonical_sheet() {
        let sheets = vec!["default".to_string(), "project-x".to_string()];
        assert_eq!(
            complete_name(&sheets, "proj", "timesheet").unwrap(),
            "project-x"
        );
        assert!(matches!(
            complete_name(&sheets, "nope", "timesheet"),
            Err(LookupError::NoMatch { .. })
        ));
    }
}
