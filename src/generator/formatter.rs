use thiserror::Error;

const INDENT: &str = "    ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected `}}` on line {line}")]
    UnexpectedClose { line: usize },
    #[error("{depth} unclosed `{{` at end of input")]
    Unclosed { depth: usize },
    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },
}

/// Re-indents generated source by brace depth and tidies spacing in code
/// lines. Comments are copied through untouched.
pub fn format(source: &str) -> Result<String, FormatError> {
    let mut output = String::with_capacity(source.len());
    let mut depth = 0usize;
    let mut comment_start: Option<usize> = None;
    let mut last_blank = true;

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;

        if comment_start.is_some() {
            output.push_str(raw);
            output.push('\n');
            if raw.contains("*/") {
                comment_start = None;
            }
            last_blank = false;
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            if !last_blank {
                output.push('\n');
                last_blank = true;
            }
            continue;
        }
        last_blank = false;

        if line.starts_with("//") {
            push_line(&mut output, depth, line);
            continue;
        }
        if let Some(rest) = line.strip_prefix("/*") {
            push_line(&mut output, depth, line);
            if !rest.contains("*/") {
                comment_start = Some(line_number);
            }
            continue;
        }

        let code = normalize_spacing(line);
        let opens = code.matches('{').count();
        let closes = code.matches('}').count();
        let leading_closes = code.chars().take_while(|c| *c == '}').count();
        if leading_closes > depth || closes > depth + opens {
            return Err(FormatError::UnexpectedClose { line: line_number });
        }

        push_line(&mut output, depth - leading_closes, &code);
        depth = depth + opens - closes;
    }

    if let Some(line) = comment_start {
        return Err(FormatError::UnterminatedComment { line });
    }
    if depth > 0 {
        return Err(FormatError::Unclosed { depth });
    }
    Ok(output)
}

fn push_line(output: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        output.push_str(INDENT);
    }
    output.push_str(line);
    output.push('\n');
}

fn normalize_spacing(line: &str) -> String {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut output = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if matches!(c, ';' | ',' | ')') && output.ends_with(' ') {
            output.pop();
        }
        if c == ' ' && output.ends_with('(') {
            continue;
        }
        if c != ' ' && output.ends_with(',') {
            output.push(' ');
        }
        output.push(c);
    }
    output
}
