use crate::comparator::ComparisonFailure;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_HEADER: &str = "\x1b[38;5;220m";
const COLOR_DETAIL: &str = "\x1b[38;5;203m";
const COLOR_REMOVED: &str = "\x1b[38;5;196m";
const COLOR_ADDED: &str = "\x1b[38;5;114m";
const COLOR_CONTEXT: &str = "\x1b[38;5;250m";
const COLOR_HINT: &str = "\x1b[38;5;111m";

/// Boxed failure report: message, then the diff when there is one.
pub fn render_failure_box(failure: &ComparisonFailure, color: bool) -> String {
    let mut lines: Vec<(String, &str)> = vec![(format!("❌  {}", failure.message), COLOR_DETAIL)];

    let diff = failure.diff();
    if diff.is_empty() {
        lines.push((String::new(), COLOR_RESET));
        lines.push((format!("💡  {}", hint(failure)), COLOR_HINT));
    } else {
        lines.push((String::new(), COLOR_RESET));
        for line in diff.lines() {
            let c = if line.starts_with("---") || line.starts_with("+++") || line.starts_with("@@") {
                COLOR_CONTEXT
            } else if line.starts_with('-') {
                COLOR_REMOVED
            } else if line.starts_with('+') {
                COLOR_ADDED
            } else {
                COLOR_CONTEXT
            };
            lines.push((line.to_string(), c));
        }
    }

    let inner_width = lines
        .iter()
        .map(|(line, _)| content_width(line))
        .max()
        .unwrap_or(0);

    let header = format!("╭─{:─^width$}─╮", " Comparison Failed ", width = inner_width);
    let footer = format!("╰{:─^width$}╯", "", width = inner_width + 2);

    let mut out = String::new();
    out.push_str(&paint(&header, COLOR_HEADER, color));
    out.push('\n');
    for (line, c) in &lines {
        out.push_str(&paint(&pad_line(line, inner_width), c, color));
        out.push('\n');
    }
    out.push_str(&paint(&footer, COLOR_HEADER, color));
    out
}

fn hint(failure: &ComparisonFailure) -> String {
    let (e, a) = (failure.expected.kind(), failure.actual.kind());
    if e != a {
        format!("expected {} but got {}; kinds are never converted", e.name(), a.name())
    } else {
        format!("both values are {}s", e.name())
    }
}

fn content_width(s: &str) -> usize {
    s.chars().count()
}

fn pad_line(content: &str, width: usize) -> String {
    let mut line = String::from(content);
    let used = content_width(content);
    if used < width {
        line.push_str(&" ".repeat(width - used));
    }
    line
}

fn paint(line: &str, c: &str, color: bool) -> String {
    if color { format!("{c}{line}{COLOR_RESET}") } else { line.to_string() }
}
