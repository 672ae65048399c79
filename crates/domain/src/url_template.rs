//! Rendering of endpoint URL templates.
//!
//! Placeholders are written `{name}` and replaced by the matching parameter.
//! `{{` and `}}` produce literal braces.

use crate::{DomainError, Parameters};

pub fn render_url(template: &str, params: &Parameters) -> Result<String, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidTemplate {
        url: template.to_string(),
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(template.len() + 16);
    let mut missing: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut key = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(invalid("nested '{' in placeholder")),
                        _ => key.push(c),
                    }
                }

                if !closed {
                    return Err(invalid("unterminated placeholder"));
                }
                if key.is_empty() {
                    return Err(invalid("empty placeholder"));
                }

                match params.get(&key) {
                    Some(value) => out.push_str(value),
                    None => {
                        if !missing.contains(&key) {
                            missing.push(key);
                        }
                    }
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(invalid("single '}' encountered"));
                }
            }
            _ => out.push(c),
        }
    }

    if !missing.is_empty() {
        return Err(DomainError::MissingParameter {
            missing,
            url: template.to_string(),
            params: describe(params),
        });
    }

    Ok(out)
}

fn describe(params: &Parameters) -> String {
    let pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}
