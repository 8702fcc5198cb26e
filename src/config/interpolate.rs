//! `${path.to.field}` interpolation inside manifest strings.
//!
//! `main = "src/${name}.cpp"` picks up the project name. `$${...}` produces a
//! literal `${...}`, which matters for flags passed through to a shell or make.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use log::trace;
use toml::{Table, Value};

use super::ConfigError;

/// Upper bound on one expanded string; repeated references grow exponentially.
pub(crate) const MAX_EXPANDED_LEN: usize = 64 * 1024;

/// Replaces every `${...}` reference in `table` with the scalar it names.
///
/// Referenced strings are expanded depth-first and memoized by path, so chains
/// settle in one walk. A path met again while it is still being expanded is a
/// cycle. Output is never rescanned, so an escaped `$${X}` stays literal.
pub fn interpolate(table: &mut Table) -> Result<(), ConfigError> {
    let root = table.clone();
    let mut expander = Expander {
        root: &root,
        resolved: HashMap::new(),
        visiting: Vec::new(),
    };
    expander.expand_table(table, &mut Vec::new())?;
    trace!("interpolated {} addressable string(s)", expander.resolved.len());
    Ok(())
}

struct Expander<'a> {
    /// The table as written, before any expansion.
    root: &'a Table,
    resolved: HashMap<Vec<String>, String>,
    visiting: Vec<Vec<String>>,
}

impl<'a> Expander<'a> {
    /// Walks values reachable by a dotted path.
    fn expand_table(&mut self, table: &mut Table, path: &mut Vec<String>) -> Result<(), ConfigError> {
        for (key, value) in table.iter_mut() {
            path.push(key.clone());
            match value {
                Value::String(s) => *s = self.expand_at(path, s)?,
                Value::Table(t) => self.expand_table(t, path)?,
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        self.expand_loose(item)?;
                    }
                }
                _ => {}
            }
            path.pop();
        }
        Ok(())
    }

    /// Walks values inside arrays, which references cannot address.
    fn expand_loose(&mut self, value: &mut Value) -> Result<(), ConfigError> {
        match value {
            Value::String(s) => *s = self.expand_str(s)?,
            Value::Table(t) => {
                for (_, item) in t.iter_mut() {
                    self.expand_loose(item)?;
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.expand_loose(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn expand_at(&mut self, path: &[String], raw: &str) -> Result<String, ConfigError> {
        if let Some(done) = self.resolved.get(path) {
            return Ok(done.clone());
        }
        if self.visiting.iter().any(|p| p.as_slice() == path) {
            return Err(ConfigError::CircularReference);
        }

        self.visiting.push(path.to_vec());
        let expanded = self.expand_str(raw);
        self.visiting.pop();

        let expanded = expanded?;
        self.resolved.insert(path.to_vec(), expanded.clone());
        Ok(expanded)
    }

    fn expand_str(&mut self, raw: &str) -> Result<String, ConfigError> {
        if !raw.contains('$') {
            return Ok(raw.to_string());
        }

        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '$' {
                result.push(ch);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let reference =
                        consume_until(&mut chars, '}').ok_or(ConfigError::UnclosedReference)?;
                    result.push_str(&self.lookup(&reference)?);
                    if result.len() > MAX_EXPANDED_LEN {
                        return Err(ConfigError::ExpansionTooLarge(reference));
                    }
                }
                _ => result.push('$'),
            }
        }

        Ok(result)
    }

    fn lookup(&mut self, reference: &str) -> Result<String, ConfigError> {
        let parts: Vec<String> = reference.split('.').map(str::to_string).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::InvalidReferencePath(reference.to_string()));
        }

        let not_found = || ConfigError::ReferenceNotFound(reference.to_string());

        let root: &'a Table = self.root;
        let (first, rest) = parts.split_first().ok_or_else(not_found)?;
        let mut current = root.get(first.as_str()).ok_or_else(not_found)?;
        for part in rest {
            current = current
                .as_table()
                .and_then(|t| t.get(part.as_str()))
                .ok_or_else(not_found)?;
        }

        match current {
            Value::String(s) => self.expand_at(&parts, s),
            other => scalar_to_string(other, reference),
        }
    }
}

fn consume_until(chars: &mut Peekable<Chars<'_>>, delim: char) -> Option<String> {
    let mut result = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(result);
        }
        result.push(ch);
    }
    None
}

fn scalar_to_string(value: &Value, path: &str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigError::NonScalarReference(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(toml_str: &str) -> Table {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_entry_file_from_name() {
        let mut table = make_table(
            r#"
            name = "ray_tracing"
            main = "src/${name}.cpp"
            "#,
        );
        interpolate(&mut table).unwrap();
        assert_eq!(table["main"].as_str().unwrap(), "src/ray_tracing.cpp");
    }

    #[test]
    fn test_nested_path() {
        let mut table = make_table(
            r#"
            [cc]
            cmd = "avr-gcc"
            dbg = "${cc.cmd}-gdb"
            "#,
        );
        interpolate(&mut table).unwrap();
        assert_eq!(table["cc"]["dbg"].as_str().unwrap(), "avr-gcc-gdb");
    }

    #[test]
    fn test_chained_references() {
        let mut table = make_table(
            r#"
            std = "c++11"
            std_flag = "-std=${std}"
            flags = ["${std_flag}", "-Wall"]
            "#,
        );
        interpolate(&mut table).unwrap();
        let flags = table["flags"].as_array().unwrap();
        assert_eq!(flags[0].as_str().unwrap(), "-std=c++11");
        assert_eq!(flags[1].as_str().unwrap(), "-Wall");
    }

    #[test]
    fn test_escape_sequence() {
        let mut table = make_table(
            r#"
            flags = ["-DOUT=$${OUT_DIR}"]
            "#,
        );
        interpolate(&mut table).unwrap();
        assert_eq!(
            table["flags"][0].as_str().unwrap(),
            "-DOUT=${OUT_DIR}"
        );
    }

    #[test]
    fn test_escape_inside_chained_reference() {
        let mut table = make_table(
            r#"
            std = "c++11"
            std_flag = "-std=${std}"
            flags = ["${std_flag}", "-DOUT=$${OUT_DIR}"]
            "#,
        );
        interpolate(&mut table).unwrap();
        assert_eq!(table["flags"][0].as_str().unwrap(), "-std=c++11");
        assert_eq!(table["flags"][1].as_str().unwrap(), "-DOUT=${OUT_DIR}");
    }

    #[test]
    fn test_integer_coercion() {
        let mut table = make_table(
            r#"
            level = 2
            flags = ["-O${level}"]
            "#,
        );
        interpolate(&mut table).unwrap();
        assert_eq!(table["flags"][0].as_str().unwrap(), "-O2");
    }

    #[test]
    fn test_circular_reference() {
        let mut table = make_table(
            r#"
            name = "${main}"
            main = "${name}"
            "#,
        );
        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::CircularReference)));
    }

    #[test]
    fn test_missing_reference() {
        let mut table = make_table(r#"main = "${project.entry}""#);
        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::ReferenceNotFound(_))));
    }

    #[test]
    fn test_non_scalar_reference() {
        let mut table = make_table(
            r#"
            libs = ["m"]
            main = "${libs}"
            "#,
        );
        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::NonScalarReference(_))));
    }

    #[test]
    fn test_unclosed_and_invalid_references() {
        let mut unclosed = make_table(r#"main = "${name""#);
        assert!(matches!(
            interpolate(&mut unclosed),
            Err(ConfigError::UnclosedReference)
        ));

        let mut invalid = make_table(r#"main = "${cc..cmd}""#);
        assert!(matches!(
            interpolate(&mut invalid),
            Err(ConfigError::InvalidReferencePath(_))
        ));
    }

    #[test]
    fn test_lone_dollar_kept() {
        let mut table = make_table(r#"flags = ["-DPRICE=$5"]"#);
        interpolate(&mut table).unwrap();
        assert_eq!(table["flags"][0].as_str().unwrap(), "-DPRICE=$5");
    }

    #[test]
    fn test_repeated_self_reference_is_circular() {
        let mut table = make_table(r#"name = "${name}${name}""#);
        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::CircularReference)));
    }

    #[test]
    fn test_self_reference_through_array_is_circular() {
        let mut table = make_table(
            r#"
            std = "${std_flag}"
            std_flag = "-std=${std}"
            flags = ["${std_flag}"]
            "#,
        );
        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::CircularReference)));
    }

    #[test]
    fn test_doubling_chain_is_bounded() {
        let mut manifest = format!("k0 = \"{}\"\n", "x".repeat(64));
        for i in 1..32 {
            manifest.push_str(&format!("k{i} = \"${{k{prev}}}${{k{prev}}}\"\n", prev = i - 1));
        }
        let mut table = make_table(&manifest);

        let result = interpolate(&mut table);
        assert!(matches!(result, Err(ConfigError::ExpansionTooLarge(_))));
    }

    #[test]
    fn test_shared_reference_expanded_once_per_path() {
        let mut table = make_table(
            r#"
            name = "tracer"
            main = "${name}.cpp"
            flags = ["-DNAME=${name}", "-DMAIN=${main}"]

            [[targets]]
            out = "${name}-a"

            [[targets]]
            out = "${name}-b"
            "#,
        );
        interpolate(&mut table).unwrap();

        assert_eq!(table["flags"][1].as_str().unwrap(), "-DMAIN=tracer.cpp");
        assert_eq!(table["targets"][0]["out"].as_str().unwrap(), "tracer-a");
        assert_eq!(table["targets"][1]["out"].as_str().unwrap(), "tracer-b");
    }
}
