use shipgate_core::CategoryLabel;

use crate::error::{ParseError, TitleError};
use crate::policy::{TitlePolicy, is_type_token};

/// A change-request title split into `type(scope)!: subject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequestTitle {
    pub raw_type: String,
    pub scope: Option<String>,
    pub subject: String,
    pub breaking: bool,
}

struct Header<'a> {
    change_type: &'a str,
    scope: Option<&'a str>,
    breaking: bool,
}

fn split_header(header: &str) -> Result<Header<'_>, ParseError> {
    let (header, breaking) = match header.strip_suffix('!') {
        Some(rest) => (rest, true),
        None => (header, false),
    };

    let Some(open) = header.find('(') else {
        if header.contains(')') {
            return Err(ParseError::InvalidType {
                found: header.to_string(),
            });
        }
        return Ok(Header {
            change_type: header,
            scope: None,
            breaking,
        });
    };

    let change_type = &header[..open];
    let Some(inner) = header[open + 1..].strip_suffix(')') else {
        return Err(ParseError::UnclosedScope);
    };

    if inner.trim().is_empty() {
        return Err(ParseError::EmptyScope);
    }
    if !is_scope_token(inner) {
        return Err(ParseError::InvalidScope {
            found: inner.to_string(),
        });
    }

    Ok(Header {
        change_type,
        scope: Some(inner),
        breaking,
    })
}

fn is_scope_token(scope: &str) -> bool {
    scope
        .chars()
        .all(|c| !c.is_whitespace() && !matches!(c, ':' | '(' | ')'))
}

/// Byte offset of the `:` that ends the header.
///
/// A `(` before the first colon opens a scope, so the separator is the first
/// colon after the scope's closing `)`.
fn find_separator(title: &str) -> Result<usize, ParseError> {
    let first_colon = title.find(':').ok_or(ParseError::MissingSeparator)?;
    let open = match title.find('(') {
        Some(open) if open < first_colon => open,
        _ => return Ok(first_colon),
    };

    let close = title[open..]
        .find(')')
        .map(|offset| open + offset)
        .ok_or(ParseError::UnclosedScope)?;

    title[close..]
        .find(':')
        .map(|offset| close + offset)
        .ok_or(ParseError::MissingSeparator)
}

/// Parses the title grammar without consulting a vocabulary.
///
/// # Errors
///
/// Returns `ParseError` if the title does not have the shape
/// `type[(scope)][!]: subject`.
pub fn parse_title(title: &str) -> Result<ChangeRequestTitle, ParseError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ParseError::Empty);
    }

    let separator = find_separator(title)?;
    let (header, rest) = (&title[..separator], &title[separator + 1..]);

    if !rest.starts_with(char::is_whitespace) {
        if rest.is_empty() {
            return Err(ParseError::EmptySubject);
        }
        return Err(ParseError::MissingSpaceAfterSeparator);
    }

    let subject = rest.trim();
    if subject.is_empty() {
        return Err(ParseError::EmptySubject);
    }

    let header = split_header(header)?;
    if !is_type_token(header.change_type) {
        return Err(ParseError::InvalidType {
            found: header.change_type.to_string(),
        });
    }

    Ok(ChangeRequestTitle {
        raw_type: header.change_type.to_string(),
        scope: header.scope.map(ToString::to_string),
        subject: subject.to_string(),
        breaking: header.breaking,
    })
}

/// Parses `title` and validates it against `policy`.
///
/// # Errors
///
/// Returns `TitleError::Parse` for structural problems, including a type
/// outside the allowed vocabulary, and `TitleError::Policy` when a
/// well-formed title breaks a scope or subject rule.
#[must_use = "classification result should be handled"]
pub fn classify(title: &str, policy: &TitlePolicy) -> Result<ChangeRequestTitle, TitleError> {
    let parsed = parse_title(title)?;

    if !policy.is_allowed(&parsed.raw_type) {
        return Err(ParseError::UnknownType {
            found: parsed.raw_type,
            allowed: policy.allowed_types().collect::<Vec<_>>().join(", "),
        }
        .into());
    }

    policy.check(&parsed)?;

    Ok(parsed)
}

#[must_use]
pub fn label_for(title: &ChangeRequestTitle, policy: &TitlePolicy) -> CategoryLabel {
    policy.label_for_type(&title.raw_type)
}
