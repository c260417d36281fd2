use std::collections::HashMap;

use crate::error::ParseError;

/// One attribute value of a STEP entity instance.
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    Null,
    Derived,
}

/// An entity instance from the DATA section: `#12=IFCWALL('guid',...);`
#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    /// Attribute at `index` as a string, if it is one.
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<&str> {
        match self.values.get(index) {
            Some(StepValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Attribute at `index` as a real; integers widen, since STEP writers
    /// drop the decimal point on whole numbers.
    #[must_use]
    pub fn real_at(&self, index: usize) -> Option<f64> {
        match self.values.get(index) {
            Some(StepValue::Real(f)) => Some(*f),
            Some(StepValue::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attribute at `index` as an entity reference.
    #[must_use]
    pub fn reference_at(&self, index: usize) -> Option<u64> {
        match self.values.get(index) {
            Some(StepValue::Reference(id)) => Some(*id),
            _ => None,
        }
    }

    /// All entity references inside the list attribute at `index`.
    #[must_use]
    pub fn references_at(&self, index: usize) -> Vec<u64> {
        match self.values.get(index) {
            Some(StepValue::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    StepValue::Reference(id) => Some(*id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A parsed STEP file: entity instances by id, with a type index for the
/// class-based lookups the import does all the time.
#[derive(Debug)]
pub struct StepFile {
    entities: HashMap<u64, StepEntity>,
    by_type: HashMap<String, Vec<u64>>,
    pub schema: String,
}

impl StepFile {
    /// Parses the content of a STEP physical file.
    ///
    /// Only the FILE_SCHEMA header and the DATA section are interpreted.
    /// Entity statements may span multiple lines; each is terminated by `;`.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entities = HashMap::new();
        let mut by_type: HashMap<String, Vec<u64>> = HashMap::new();
        let mut schema = String::new();
        let mut in_data = false;
        let mut pending = String::new();

        for line in content.lines() {
            let line = line.trim();

            if line.starts_with("FILE_SCHEMA") {
                schema = extract_schema(line).unwrap_or_default();
                continue;
            }
            if line == "DATA;" {
                in_data = true;
                continue;
            }
            if line == "ENDSEC;" {
                in_data = false;
                continue;
            }
            if !in_data {
                continue;
            }

            // Accumulate until the statement terminator; writers are free to
            // wrap long attribute lists.
            pending.push_str(line);
            if !pending.ends_with(';') {
                pending.push(' ');
                continue;
            }
            let statement = std::mem::take(&mut pending);
            if statement.starts_with('#') {
                let entity = parse_statement(statement.trim_end_matches(';'))?;
                by_type
                    .entry(entity.entity_type.clone())
                    .or_default()
                    .push(entity.id);
                entities.insert(entity.id, entity);
            }
        }

        Ok(StepFile {
            entities,
            by_type,
            schema,
        })
    }

    #[must_use]
    pub fn entity(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    /// Entity instances of one type, in instance-id order.
    #[must_use]
    pub fn entities_of(&self, entity_type: &str) -> Vec<&StepEntity> {
        let mut ids = self.by_type.get(entity_type).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids.iter().filter_map(|id| self.entities.get(id)).collect()
    }
}

fn extract_schema(line: &str) -> Option<String> {
    let start = line.find("('")? + 2;
    let len = line[start..].find('\'')?;
    Some(line[start..start + len].to_string())
}

/// Parses `#id=TYPE(values)` with the terminator already stripped.
fn parse_statement(statement: &str) -> Result<StepEntity, ParseError> {
    let invalid = |message: String| ParseError::InvalidStep { message };

    let eq_pos = statement
        .find('=')
        .ok_or_else(|| invalid(format!("missing '=' in '{statement}'")))?;
    let id: u64 = statement[1..eq_pos]
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad instance id in '{statement}'")))?;

    let body = statement[eq_pos + 1..].trim();
    let paren_pos = body
        .find('(')
        .ok_or_else(|| invalid(format!("missing '(' in '{statement}'")))?;
    if !body.ends_with(')') {
        return Err(invalid(format!("missing ')' in '{statement}'")));
    }
    let entity_type = body[..paren_pos].trim().to_string();
    let values = split_values(&body[paren_pos + 1..body.len() - 1])
        .iter()
        .map(|raw| parse_value(raw))
        .collect();

    Ok(StepEntity {
        id,
        entity_type,
        values,
    })
}

/// Splits a comma-separated attribute list, respecting quoted strings and
/// nested parentheses.
fn split_values(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut in_string = false;
    let mut start = 0;

    for (pos, ch) in s.char_indices() {
        match ch {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                parts.push(s[start..pos].trim());
                start = pos + 1;
            }
            _ => {}
        }
    }
    let tail = s[start..].trim();
    if !tail.is_empty() || !parts.is_empty() {
        parts.push(tail);
    }
    parts
}

fn parse_value(raw: &str) -> StepValue {
    let raw = raw.trim();

    match raw {
        "$" => return StepValue::Null,
        "*" => return StepValue::Derived,
        _ => {}
    }
    if let Some(id) = raw.strip_prefix('#') {
        if let Ok(id) = id.parse::<u64>() {
            return StepValue::Reference(id);
        }
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return StepValue::String(decode_step_string(&raw[1..raw.len() - 1]));
    }
    if raw.len() >= 2 && raw.starts_with('.') && raw.ends_with('.') {
        return match &raw[1..raw.len() - 1] {
            "T" => StepValue::Boolean(true),
            "F" => StepValue::Boolean(false),
            name => StepValue::Enum(name.to_string()),
        };
    }
    if raw.starts_with('(') && raw.ends_with(')') {
        let inner = split_values(&raw[1..raw.len() - 1]);
        return StepValue::List(inner.iter().map(|item| parse_value(item)).collect());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return StepValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return StepValue::Real(f);
    }
    // Typed value wrapper like IFCLABEL('x') or IFCBOOLEAN(.T.)
    if let Some(paren_pos) = raw.find('(') {
        if raw.ends_with(')') {
            return parse_value(&raw[paren_pos + 1..raw.len() - 1]);
        }
    }

    StepValue::String(raw.to_string())
}

/// Decode STEP string escapes: `''` apostrophes, `\\` backslashes, and the
/// `\X2\..\X0\` / `\X\..` / `\S\.` Unicode forms.
fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\'' {
            // '' is an escaped apostrophe
            if chars.peek() == Some(&'\'') {
                chars.next();
            }
            result.push('\'');
            continue;
        }
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                result.push('\\');
            }
            Some('S') => {
                // \S\X - ISO 8859-1 high-bit shift
                chars.next();
                chars.next();
                if let Some(c) = chars.next() {
                    result.push(((c as u8).wrapping_add(128)) as char);
                }
            }
            Some('X') => {
                chars.next();
                decode_x_escape(&mut chars, &mut result);
            }
            _ => result.push('\\'),
        }
    }

    result
}

fn decode_x_escape(chars: &mut std::iter::Peekable<std::str::Chars>, result: &mut String) {
    match chars.peek() {
        Some('2') => {
            // \X2\XXXX...\X0\ - one BMP char per 4 hex digits
            chars.next();
            chars.next();
            let mut hex = String::new();
            while let Some(&c) = chars.peek() {
                if c == '\\' {
                    break;
                }
                hex.push(c);
                chars.next();
            }
            for _ in 0..4 {
                chars.next(); // \X0\
            }
            for chunk in hex.as_bytes().chunks(4) {
                let code = std::str::from_utf8(chunk)
                    .ok()
                    .and_then(|s| u32::from_str_radix(s, 16).ok());
                if let Some(c) = code.and_then(char::from_u32) {
                    result.push(c);
                }
            }
        }
        Some('\\') => {
            // \X\XX - ISO 8859-1 byte
            chars.next();
            let mut hex = String::new();
            for _ in 0..2 {
                if let Some(c) = chars.next() {
                    hex.push(c);
                }
            }
            if let Ok(code) = u8::from_str_radix(&hex, 16) {
                result.push(code as char);
            }
        }
        _ => {
            result.push('\\');
            result.push('X');
        }
    }
}
