//! Locating method calls in PHP configuration source

use regex::Regex;

use crate::ImportError;

/// A method call found in the source, with the raw text between its
/// parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub args: String,
}

/// Remove `//`, `#` and `/* */` comments, leaving string literals and
/// attributes (`#[...]`) intact. Commented-out code never reaches the
/// call scanner.
pub fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
            '#' if chars.peek() != Some(&'[') => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(&next) = chars.peek() {
        if next == '\n' {
            break;
        }
        chars.next();
    }
}

/// Find every `->method(...)` or `::method(...)` call to one of `methods`,
/// in source order
pub fn find_calls(content: &str, methods: &[&str]) -> Result<Vec<Call>, ImportError> {
    let re = Regex::new(&format!(r"(?:->|::)\s*({})\s*\(", methods.join("|")))?;

    let mut calls = Vec::new();
    for caps in re.captures_iter(content) {
        let (Some(whole), Some(method)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let args = balanced_arguments(&content[whole.end()..]).ok_or_else(|| {
            ImportError::InvalidFormat(format!("unbalanced parentheses in {}()", method.as_str()))
        })?;
        calls.push(Call {
            method: method.as_str().to_string(),
            args: args.to_string(),
        });
    }

    Ok(calls)
}

/// Text up to the parenthesis closing an already opened one
fn balanced_arguments(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (c == ')').then(|| &rest[..i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comments() {
        let content = "$a->sets([\n    // LevelSetList::UP_TO_PHP_81,\n    X::Y, # trailing\n]);";
        let stripped = strip_comments(content);
        assert!(!stripped.contains("UP_TO_PHP_81"));
        assert!(!stripped.contains("trailing"));
        assert!(stripped.contains("X::Y,"));
    }

    #[test]
    fn test_strip_block_comments() {
        let content = "/**\n * Usage: ./vendor/bin/rector process\n */\nreturn 1;";
        assert_eq!(strip_comments(content).trim(), "return 1;");
    }

    #[test]
    fn test_strings_keep_comment_markers() {
        let content = r#"$x = 'https://example.org/#top'; // gone"#;
        assert_eq!(
            strip_comments(content).trim_end(),
            r#"$x = 'https://example.org/#top';"#
        );
    }

    #[test]
    fn test_attributes_survive() {
        let content = "#[AsCommand]\nfinal class A {}";
        assert!(strip_comments(content).contains("#[AsCommand]"));
    }

    #[test]
    fn test_find_calls_in_order() {
        let content = "$c->paths(['a', 'b'])->skip([X::class])->paths([foo('c')]);";
        let calls = find_calls(content, &["paths", "skip"]).unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].method, "paths");
        assert_eq!(calls[0].args, "['a', 'b']");
        assert_eq!(calls[1].args, "[X::class]");
        assert_eq!(calls[2].args, "[foo('c')]");
    }

    #[test]
    fn test_find_calls_ignores_parens_in_strings() {
        let content = "->name('*.php (legacy)')";
        let calls = find_calls(content, &["name"]).unwrap();
        assert_eq!(calls[0].args, "'*.php (legacy)'");
    }

    #[test]
    fn test_unbalanced_call() {
        let err = find_calls("->paths(['a'", &["paths"]).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }

    #[test]
    fn test_static_call() {
        let calls = find_calls("FractorConfiguration::configure()", &["configure"]).unwrap();
        assert_eq!(calls[0].args, "");
    }
}
