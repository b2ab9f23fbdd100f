use crate::kernel::values::{Handle, Object, Value};

/// Turns a value into the text shown in failure messages and diffs.
pub trait Render: Send + Sync {
    fn export(&self, v: &Value) -> String;
}

/// Default renderer: quoted strings, literal `true`/`false`/`null`,
/// numeric literals, and indented blocks for containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exporter;

const INDENT: &str = "    ";

impl Render for Exporter {
    fn export(&self, v: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, v, 0);
        out
    }
}

fn write_value(out: &mut String, v: &Value, depth: usize) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&export_float(*f)),
        Value::Str(s) => out.push_str(&quote(s)),
        Value::List(items) => {
            let entries: Vec<(String, &Value)> =
                items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect();
            write_block(out, "Array", &entries, depth);
        }
        Value::Map(pairs) => {
            let entries: Vec<(String, &Value)> = pairs.iter().map(|(k, v)| (quote(k), v)).collect();
            write_block(out, "Array", &entries, depth);
        }
        Value::Object(Object { class, props }) => {
            let entries: Vec<(String, &Value)> = props.iter().map(|(k, v)| (quote(k), v)).collect();
            write_block(out, &format!("{class} Object"), &entries, depth);
        }
        Value::Handle(Handle { id, kind }) => {
            out.push_str(&format!("resource({id}) of type ({kind})"));
        }
    }
}

fn write_block(out: &mut String, head: &str, entries: &[(String, &Value)], depth: usize) {
    out.push_str(head);
    if entries.is_empty() {
        out.push_str(" []");
        return;
    }
    out.push_str(" [\n");
    for (key, v) in entries {
        out.push_str(&INDENT.repeat(depth + 1));
        out.push_str(key);
        out.push_str(" => ");
        write_value(out, v, depth + 1);
        out.push_str(",\n");
    }
    out.push_str(&INDENT.repeat(depth));
    out.push(']');
}

// Contents go out verbatim, quotes and backslashes included.
fn quote(s: &str) -> String {
    format!("'{s}'")
}

// Shortest round-trip digits. Integral values keep a trailing ".0" so a
// float never renders like an int; large and tiny magnitudes use E notation.
fn export_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let sci = format!("{f:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };
    if f == 0.0 || (-4..15).contains(&exp) {
        let plain = format!("{f}");
        if plain.contains('.') { plain } else { format!("{plain}.0") }
    } else {
        let mantissa = if mantissa.contains('.') { mantissa } else { format!("{mantissa}.0") };
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{}", exp.abs())
    }
}
